//! Shared test doubles: a scripted I2C bus and canned event sinks.

use core::convert::Infallible;

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation, SevenBitAddress};

use crate::{
    common::{I2C_ADDR, REPORT_REG},
    Delivery, EventSink, InputEvent, REPORT_LEN,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FakeBusError;

impl embedded_hal::i2c::Error for FakeBusError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Scripted I2C bus: serves one canned response per transaction, in order.
pub(crate) struct FakeBus {
    responses: Vec<Result<[u8; REPORT_LEN], FakeBusError>>,
    pub(crate) transactions: usize,
}

impl FakeBus {
    pub(crate) fn new(
        responses: impl IntoIterator<Item = Result<[u8; REPORT_LEN], FakeBusError>>,
    ) -> Self {
        Self {
            responses: responses.into_iter().collect(),
            transactions: 0,
        }
    }

    pub(crate) fn ok(report: [u8; REPORT_LEN]) -> Self {
        Self::new([Ok(report)])
    }
}

impl ErrorType for FakeBus {
    type Error = FakeBusError;
}

impl I2c for FakeBus {
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        assert_eq!(address, I2C_ADDR);
        assert!(
            self.transactions < self.responses.len(),
            "unexpected bus transaction"
        );
        let response = self.responses[self.transactions];
        self.transactions += 1;
        let report = response?;
        for op in operations {
            match op {
                Operation::Write(bytes) => assert_eq!(*bytes, &[REPORT_REG][..]),
                Operation::Read(buf) => buf.copy_from_slice(&report),
            }
        }
        Ok(())
    }
}

/// Press at raw (256, 512) by the primary contact.
pub(crate) const PRESS_REPORT: [u8; REPORT_LEN] =
    [0x04, 0x01, 0x00, 0x10, 0x00, 0x20, 0, 0, 0, 0];

/// Release by the primary contact.
pub(crate) const RELEASE_REPORT: [u8; REPORT_LEN] =
    [0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0, 0, 0, 0];

/// Sink that accepts and records everything.
pub(crate) struct RecordingSink {
    pub(crate) events: Vec<(InputEvent, bool, Delivery)>,
}

impl RecordingSink {
    pub(crate) fn new() -> Self {
        Self { events: Vec::new() }
    }
}

impl EventSink for RecordingSink {
    type Error = Infallible;

    fn report(
        &mut self,
        event: InputEvent,
        sync: bool,
        delivery: Delivery,
    ) -> Result<(), Self::Error> {
        self.events.push((event, sync, delivery));
        Ok(())
    }
}

/// Sink with a full consumer queue: refuses best-effort events, still
/// accepts blocking ones.
pub(crate) struct CongestedSink {
    pub(crate) events: Vec<(InputEvent, bool, Delivery)>,
}

impl CongestedSink {
    pub(crate) fn new() -> Self {
        Self { events: Vec::new() }
    }
}

impl EventSink for CongestedSink {
    type Error = ();

    fn report(
        &mut self,
        event: InputEvent,
        sync: bool,
        delivery: Delivery,
    ) -> Result<(), Self::Error> {
        match delivery {
            Delivery::BestEffort => Err(()),
            Delivery::Blocking => {
                self.events.push((event, sync, delivery));
                Ok(())
            }
        }
    }
}
