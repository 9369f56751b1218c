//! Hardware bring-up diagnostic
//!
//! Cycles the panel through solid red, green and blue, paints four
//! swatches through the partial-window path, then verifies the touch
//! controller handshake and logs ten decoded touch reports with their
//! raw and screen coordinates. Useful when wiring up a new board: wrong
//! D/C or CS wiring shows up as a blank or noisy panel, a broken window
//! address path shows up as misplaced swatches, and a wrong touch
//! orientation shows up in the coordinate pairs.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::I2c;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::spi::Spi;
use embassy_time::{Delay, Timer};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use static_cell::ConstStaticCell;
use {defmt_rtt as _, panic_probe as _};

use gridkey_core::transform::to_screen;
use gridkey_drivers::display::{Framebuffer, St7789, Window, FRAME_BYTES, PANEL_HEIGHT};
use gridkey_drivers::touch::cst328::DEFAULT_ADDRESS;
use gridkey_drivers::touch::Cst328;
use gridkey_hal::{I2cConfig, InputPin, SpiConfig};
use gridkey_hal_rp2040::{DisplaySpi, Rp2040Input, Rp2040Output, TouchI2c};

static FRAME: ConstStaticCell<[u8; FRAME_BYTES]> = ConstStaticCell::new([0u8; FRAME_BYTES]);

/// Reports to capture before the diagnostic finishes
const REPORT_TARGET: u32 = 10;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Gridkey hardware diagnostic");

    let p = embassy_rp::init(Default::default());

    // Same pinout as the main firmware
    let spi = Spi::new_blocking_txonly(
        p.SPI1,
        p.PIN_10,
        p.PIN_11,
        DisplaySpi::config(&SpiConfig::default()),
    );
    let dc = Rp2040Output::new(Output::new(p.PIN_14, Level::High));
    let cs = Rp2040Output::new(Output::new(p.PIN_9, Level::High));
    let rst = Rp2040Output::new(Output::new(p.PIN_13, Level::High));
    let mut backlight_config = PwmConfig::default();
    backlight_config.top = u16::MAX;
    backlight_config.compare_b = 0;
    let mut backlight = Pwm::new_output_b(p.PWM_SLICE7, p.PIN_15, backlight_config.clone());

    let fb = Framebuffer::new(FRAME.take());
    let mut display = St7789::new(DisplaySpi::new(spi), dc, cs, rst, Delay, fb);
    if display.init().is_err() {
        error!("Display init failed");
    }
    backlight_config.compare_b = u16::MAX;
    backlight.set_config(&backlight_config);

    for (name, color) in [
        ("red", Rgb565::RED),
        ("green", Rgb565::GREEN),
        ("blue", Rgb565::BLUE),
    ] {
        info!("Panel fill: {}", name);
        display.framebuffer().fill(color);
        if display.flush().is_err() {
            error!("Display flush failed");
        }
        Timer::after_millis(700).await;
    }
    display.framebuffer().fill(Rgb565::WHITE);
    display.flush().ok();

    // Four swatches through the partial-window path; a broken window
    // address calculation leaves them overlapping or off-screen
    info!("Panel window check");
    for (i, color) in [
        Rgb565::CYAN,
        Rgb565::MAGENTA,
        Rgb565::YELLOW,
        Rgb565::BLACK,
    ]
    .into_iter()
    .enumerate()
    {
        let x0 = 20 + i as u16 * 72;
        display.framebuffer().fill_rect(x0, 60, 60, 120, color);
        if display
            .flush_window(Window::new(x0, 60, x0 + 60, 180))
            .is_err()
        {
            error!("Window flush failed");
        }
        Timer::after_millis(350).await;
    }
    info!("Panel check done");

    let i2c = I2c::new_blocking(
        p.I2C1,
        p.PIN_7,
        p.PIN_6,
        TouchI2c::config(&I2cConfig::default()),
    );
    let touch_rst = Rp2040Output::new(Output::new(p.PIN_16, Level::High));
    let irq = Rp2040Input::new(Input::new(p.PIN_17, Pull::Up));

    let mut touch = match Cst328::new(TouchI2c::new(i2c), touch_rst, Delay, DEFAULT_ADDRESS) {
        Ok(touch) => {
            info!("Touch handshake OK");
            touch
        }
        Err(e) => {
            error!("Touch handshake failed: {}", e);
            loop {
                Timer::after_secs(1).await;
            }
        }
    };

    info!("Touch the panel ({} reports)...", REPORT_TARGET);
    let mut reports = 0u32;
    while reports < REPORT_TARGET {
        if irq.is_low() {
            match touch.read_frame() {
                Ok(frame) if frame.is_active() => {
                    reports += 1;
                    for pt in frame.points() {
                        let screen = to_screen(*pt, PANEL_HEIGHT);
                        info!(
                            "contact raw=({}, {}) screen=({}, {}) strength={}",
                            pt.x, pt.y, screen.x, screen.y, pt.strength
                        );
                    }
                }
                Ok(_) => {}
                Err(e) => warn!("Touch read failed: {}", e),
            }
        }
        Timer::after_millis(10).await;
    }

    info!("Diagnostic complete");
    loop {
        Timer::after_secs(60).await;
    }
}
