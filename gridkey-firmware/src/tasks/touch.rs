//! Touch acquisition task
//!
//! Waits for the controller's interrupt line to fall, then reads and
//! decodes the report in task context and publishes the frame in screen
//! coordinates. The interrupt edge itself does no bus I/O.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::Delay;

use gridkey_core::transform::to_screen;
use gridkey_drivers::display::PANEL_HEIGHT;
use gridkey_drivers::touch::Cst328;
use gridkey_hal_rp2040::{Rp2040Output, TouchI2c};

use crate::channels::publish_touch;

/// The concrete touch driver type on this board
pub type TouchController = Cst328<TouchI2c<'static>, Rp2040Output<'static>, Delay>;

/// Touch acquisition task
///
/// A failed read is logged and dropped; the next interrupt edge retries
/// naturally. No frame is published for failed reads, so the UI never
/// sees a partial acquisition.
#[embassy_executor::task]
pub async fn touch_task(mut touch: TouchController, mut irq: Input<'static>) {
    info!("Touch task started");

    loop {
        irq.wait_for_falling_edge().await;

        match touch.read_frame() {
            Ok(frame) => {
                let frame = frame.map_points(|p| to_screen(p, PANEL_HEIGHT));
                if let Some(primary) = frame.primary() {
                    trace!("Touch at ({}, {})", primary.x, primary.y);
                }
                publish_touch(frame);
            }
            Err(e) => warn!("Touch read failed: {}", e),
        }
    }
}
