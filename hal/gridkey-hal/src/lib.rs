//! Gridkey Hardware Abstraction Layer
//!
//! This crate defines the bus and pin traits the peripheral drivers are
//! written against, so the same driver code runs on the RP2040 board and
//! against recording mocks in host tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (gridkey-firmware)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  gridkey-drivers (ST7789 / CST328)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  gridkey-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ gridkey-hal-  │       │  test mocks   │
//! │    rp2040     │       │  (host only)  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O (CS, D/C, reset, IRQ)
//! - [`spi::SpiBus`] - Display bus
//! - [`i2c::I2cBus`] - Touch controller bus
//! - [`flash::FlashStorage`] - Keymap persistence

#![no_std]
#![deny(unsafe_code)]

pub mod flash;
pub mod gpio;
pub mod i2c;
pub mod spi;

// Re-export key traits and config types at crate root for convenience
pub use flash::{FlashError, FlashStorage, StorageKey};
pub use gpio::{InputPin, OutputPin};
pub use i2c::{I2cBus, I2cConfig};
pub use spi::{Phase, Polarity, SpiBus, SpiConfig};
