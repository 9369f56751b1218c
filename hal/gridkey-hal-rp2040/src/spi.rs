//! Blocking SPI for the display link
//!
//! The panel bus is transmit-only; chip-select and data/command framing
//! are driven by the display driver through separate GPIOs, so this
//! wrapper is a plain bus with no device state.

use embassy_rp::spi::{Blocking, Phase, Polarity, Spi};

use gridkey_hal::SpiConfig;

/// Blocking SPI bus for the ST7789 panel
pub struct DisplaySpi<'d> {
    spi: Spi<'d, Blocking>,
}

impl<'d> DisplaySpi<'d> {
    pub fn new(spi: Spi<'d, Blocking>) -> Self {
        Self { spi }
    }

    /// Translate the shared bus configuration into embassy-rp's
    pub fn config(config: &SpiConfig) -> embassy_rp::spi::Config {
        let mut cfg = embassy_rp::spi::Config::default();
        cfg.frequency = config.frequency;
        cfg.polarity = match config.polarity {
            gridkey_hal::Polarity::IdleLow => Polarity::IdleLow,
            gridkey_hal::Polarity::IdleHigh => Polarity::IdleHigh,
        };
        cfg.phase = match config.phase {
            gridkey_hal::Phase::CaptureOnFirstTransition => Phase::CaptureOnFirstTransition,
            gridkey_hal::Phase::CaptureOnSecondTransition => Phase::CaptureOnSecondTransition,
        };
        cfg
    }
}

impl gridkey_hal::SpiBus for DisplaySpi<'_> {
    type Error = embassy_rp::spi::Error;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.spi.blocking_write(data)
    }
}
