//! GPIO wrappers implementing the shared pin traits
//!
//! embassy-rp pin writes are infallible, which is what the shared traits
//! assume. The wrappers exist so the driver crates never name embassy-rp
//! types directly.

use embassy_rp::gpio::{Input, Output};

/// Push-pull output pin
pub struct Rp2040Output<'d> {
    pin: Output<'d>,
}

impl<'d> Rp2040Output<'d> {
    pub fn new(pin: Output<'d>) -> Self {
        Self { pin }
    }
}

impl gridkey_hal::OutputPin for Rp2040Output<'_> {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}

/// Input pin
pub struct Rp2040Input<'d> {
    pin: Input<'d>,
}

impl<'d> Rp2040Input<'d> {
    pub fn new(pin: Input<'d>) -> Self {
        Self { pin }
    }
}

impl gridkey_hal::InputPin for Rp2040Input<'_> {
    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}
