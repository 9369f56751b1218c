//! Board-agnostic core logic for the Gridkey keybind configurator
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Touch data model (points, frames, the producer/consumer handoff state)
//! - Coordinate transform between sensor and screen space
//! - Grid geometry and hit-testing for the configurator screens
//! - Keymap model, serialization and firmware export

#![no_std]
#![deny(unsafe_code)]

pub mod grid;
pub mod keymap;
pub mod touch;
pub mod transform;
