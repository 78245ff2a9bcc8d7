use embedded_hal::i2c::{I2c, SevenBitAddress};

use crate::{
    common::{self, I2C_ADDR, REPORT_REG},
    Error, TouchSample, REPORT_LEN,
};

/// An EXC7200 device.
///
/// This struct contains the blocking interface to the controller. The
/// controller is poll-only: the single operation it supports is reading the
/// current touch report.
pub struct Exc7200<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c<SevenBitAddress>> Exc7200<I2C> {
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
    /// poll; a controller that does not answer yields [`Error::NotReady`]
    /// and no poll timer should be armed.
    pub fn probe(&mut self) -> Result<(), Error<I2C::Error>> {
        let mut buf = [0u8; REPORT_LEN];
        self.i2c
            .write_read(self.address, &[REPORT_REG], &mut buf)
            .map_err(Error::NotReady)
    }

    /// Read and decode one touch report.
    ///
    /// Returns `Ok(None)` for reports that carry no usable touch data: a
    /// foreign report type or a non-primary contact.
    pub fn read_report(&mut self) -> Result<Option<TouchSample>, Error<I2C::Error>> {
        let mut buf = [0u8; REPORT_LEN];
        self.i2c.write_read(self.address, &[REPORT_REG], &mut buf)?;
        Ok(common::decode(&buf))
    }

    /// Safely clean up the device, returning any owned peripherals.
    pub fn destroy(self) -> I2C {
        self.i2c
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{FakeBus, FakeBusError, PRESS_REPORT, RELEASE_REPORT};

    #[test]
    fn reads_and_decodes_one_report() {
        let mut touch = Exc7200::new(FakeBus::ok(PRESS_REPORT));
        let sample = touch.read_report().unwrap().unwrap();
        assert!(sample.pressed);
        assert_eq!((sample.x, sample.y), (256, 512));
        assert_eq!(touch.destroy().transactions, 1);
    }

    #[test]
    fn foreign_report_is_not_an_error() {
        let mut touch = Exc7200::new(FakeBus::ok([0x05, 0x01, 0, 0, 0, 0, 0, 0, 0, 0]));
        assert_eq!(touch.read_report().unwrap(), None);
    }

    #[test]
    fn bus_failure_maps_to_bus_error() {
        let mut touch = Exc7200::new(FakeBus::new([Err(FakeBusError)]));
        assert_eq!(touch.read_report(), Err(Error::Bus(FakeBusError)));
    }

    #[test]
    fn probe_failure_maps_to_not_ready() {
        let mut touch = Exc7200::new(FakeBus::new([Err(FakeBusError)]));
        assert_eq!(touch.probe(), Err(Error::NotReady(FakeBusError)));
    }

    #[test]
    fn probe_succeeds_when_controller_answers() {
        let mut touch = Exc7200::new(FakeBus::ok(RELEASE_REPORT));
        assert!(touch.probe().is_ok());
    }
}
