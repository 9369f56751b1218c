//! Inter-task communication state
//!
//! The acquisition task and the UI loop share exactly one piece of state:
//! the latest touch frame, behind a critical-section mutex. Delivery is
//! edge-triggered and last-write-wins; see `gridkey_core::touch`.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use gridkey_core::touch::{TouchFrame, TouchState};

/// The single touch handoff point between acquisition and the UI loop
pub static TOUCH_STATE: Mutex<CriticalSectionRawMutex, RefCell<TouchState>> =
    Mutex::new(RefCell::new(TouchState::new()));

/// Publish a decoded frame (acquisition side)
pub fn publish_touch(frame: TouchFrame) {
    TOUCH_STATE.lock(|state| state.borrow_mut().publish(frame));
}

/// Take the latest frame if one arrived since the last call (UI side)
pub fn take_touch() -> Option<TouchFrame> {
    TOUCH_STATE.lock(|state| state.borrow_mut().take_if_new())
}
