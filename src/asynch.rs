use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::{
    common::{self, I2C_ADDR, REPORT_REG},
    Error, TouchSample, REPORT_LEN,
};

/// An EXC7200 device.
///
/// This struct contains the async interface to the controller, for targets
/// that drive the poll period from an async timer instead of the
/// [`PollSlot`](crate::poll::PollSlot) handoff. Pair it with
/// [`poll::dispatch`](crate::poll::dispatch) to emit input events.
pub struct Exc7200Async<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c<SevenBitAddress>> Exc7200Async<I2C> {
    /// Create a driver using the controller's default I2C address (`0x04`).
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, I2C_ADDR)
    }

    /// Create a driver for a board with a remapped controller address.
    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Check that the controller answers on the bus.
    ///
    /// Reads one report and discards it. Call this once before starting to
    /// poll; a controller that does not answer yields [`Error::NotReady`].
    pub async fn probe(&mut self) -> Result<(), Error<I2C::Error>> {
        let mut buf = [0u8; REPORT_LEN];
        self.i2c
            .write_read(self.address, &[REPORT_REG], &mut buf)
            .await
            .map_err(Error::NotReady)
    }

    /// Read and decode one touch report.
    ///
    /// Returns `Ok(None)` for reports that carry no usable touch data: a
    /// foreign report type or a non-primary contact.
    pub async fn read_report(&mut self) -> Result<Option<TouchSample>, Error<I2C::Error>> {
        let mut buf = [0u8; REPORT_LEN];
        self.i2c
            .write_read(self.address, &[REPORT_REG], &mut buf)
            .await?;
        Ok(common::decode(&buf))
    }

    /// Safely clean up the device, returning any owned peripherals.
    pub fn destroy(self) -> I2C {
        self.i2c
    }
}
