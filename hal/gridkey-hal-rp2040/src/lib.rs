//! RP2040-specific HAL for the Gridkey configurator
//!
//! This crate provides RP2040-specific implementations of the shared
//! `gridkey-hal` traits:
//!
//! - GPIO output/input wrappers over embassy-rp pins
//! - Blocking SPI for the display link
//! - Blocking I2C for the touch controller
//! - Flash storage driver (implements `gridkey_hal::FlashStorage`)

#![no_std]

pub mod flash;
pub mod gpio;
pub mod i2c;
pub mod spi;

pub use gpio::{Rp2040Input, Rp2040Output};
pub use i2c::TouchI2c;
pub use spi::DisplaySpi;

// Re-export shared traits from gridkey-hal for convenience
pub use gridkey_hal::{FlashStorage as FlashStorageTrait, StorageKey};
