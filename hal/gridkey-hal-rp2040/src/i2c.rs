//! Blocking I2C for the touch controller
//!
//! Goes through the `embedded-hal` I2C trait rather than embassy-rp's
//! inherent methods, so the wrapper only depends on the stable trait
//! surface. The combined write-then-read uses a repeated start, which the
//! CST328 requires for register reads.

use embassy_rp::i2c::{Blocking, I2c};
use embedded_hal::i2c::I2c as _;

use gridkey_hal::I2cConfig;

/// Blocking I2C bus for the CST328 controller
pub struct TouchI2c<'d> {
    i2c: I2c<'d, Blocking>,
}

impl<'d> TouchI2c<'d> {
    pub fn new(i2c: I2c<'d, Blocking>) -> Self {
        Self { i2c }
    }

    /// Translate the shared bus configuration into embassy-rp's
    pub fn config(config: &I2cConfig) -> embassy_rp::i2c::Config {
        let mut cfg = embassy_rp::i2c::Config::default();
        cfg.frequency = config.frequency;
        cfg
    }
}

impl gridkey_hal::I2cBus for TouchI2c<'_> {
    type Error = embassy_rp::i2c::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.i2c.write(address, data)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.i2c.write_read(address, write_data, read_buf)
    }
}
