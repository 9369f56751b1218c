//! Peripheral drivers for the Gridkey board
//!
//! This crate implements the two bus protocols the configurator depends on:
//!
//! - Display: ST7789-class panel controller over SPI with separate
//!   chip-select and data/command lines, windowed partial updates from an
//!   owned RGB565 framebuffer
//! - Touch: CST328 capacitive multi-touch controller over I2C, device
//!   handshake plus multi-point acquisition and decode
//!
//! Drivers are generic over the `gridkey-hal` bus/pin traits so the same
//! code runs on the RP2040 board and against recording mocks in host tests.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod display;
pub mod touch;
