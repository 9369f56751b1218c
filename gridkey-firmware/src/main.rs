//! Gridkey - Touchscreen Keybind Configurator
//!
//! Main firmware binary for RP2040 boards with a 320x240 SPI LCD and a
//! CST328 capacitive touch controller. Presents an 11x11 assignment grid;
//! tapping a cell opens a key picker, and the resulting keymap is
//! persisted to flash together with a flattened export the keyboard
//! firmware reads back.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::I2c;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::spi::Spi;
use embassy_time::{Delay, Duration, Instant, Timer};
use static_cell::ConstStaticCell;
use {defmt_rtt as _, panic_probe as _};

use gridkey_core::grid::{self, GridHit, PickerHit};
use gridkey_core::keymap::{Keymap, KEY_CHOICES};
use gridkey_drivers::display::{Framebuffer, St7789, FRAME_BYTES};
use gridkey_drivers::touch::cst328::DEFAULT_ADDRESS;
use gridkey_drivers::touch::Cst328;
use gridkey_hal::{I2cConfig, SpiConfig};
use gridkey_hal_rp2040::flash::FlashStorage;
use gridkey_hal_rp2040::{DisplaySpi, Rp2040Output, TouchI2c};

use crate::channels::take_touch;
use crate::config::ConfigPersistence;
use crate::ui::Screen;

mod channels;
mod config;
mod tasks;
mod ui;

// The pixel buffer lives in .bss; it does not fit on any stack
static FRAME: ConstStaticCell<[u8; FRAME_BYTES]> = ConstStaticCell::new([0u8; FRAME_BYTES]);

/// Minimum time between accepted taps
const TAP_DEBOUNCE: Duration = Duration::from_millis(300);

/// UI poll period in milliseconds
const POLL_PERIOD_MS: u64 = 20;

/// Backlight brightness out of `u16::MAX`
const BACKLIGHT_LEVEL: u16 = 0xCCCC;

/// PWM configuration for the backlight pin at the given duty level
fn backlight_config(level: u16) -> PwmConfig {
    let mut config = PwmConfig::default();
    config.top = u16::MAX;
    config.compare_b = level;
    config
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Gridkey configurator starting...");

    let p = embassy_rp::init(Default::default());

    // Display link: SPI1 with SCK=GPIO10, MOSI=GPIO11; control lines
    // CS=GPIO9, RST=GPIO13, DC=GPIO14; backlight on GPIO15
    let spi = Spi::new_blocking_txonly(
        p.SPI1,
        p.PIN_10,
        p.PIN_11,
        DisplaySpi::config(&SpiConfig::default()),
    );
    let dc = Rp2040Output::new(Output::new(p.PIN_14, Level::High));
    let cs = Rp2040Output::new(Output::new(p.PIN_9, Level::High));
    let rst = Rp2040Output::new(Output::new(p.PIN_13, Level::High));
    // Backlight stays dark until the first frame is on the panel
    let mut backlight = Pwm::new_output_b(p.PWM_SLICE7, p.PIN_15, backlight_config(0));

    let fb = Framebuffer::new(FRAME.take());
    let mut display = St7789::new(DisplaySpi::new(spi), dc, cs, rst, Delay, fb);
    if display.init().is_err() {
        error!("Display init failed");
    }
    info!("Display initialized");

    // Keymap from flash; an empty map if nothing is stored yet
    let storage = FlashStorage::new(p.FLASH, p.DMA_CH0);
    let mut persistence = ConfigPersistence::new(storage);
    let mut keymap = match persistence.load().await {
        Ok(map) => map,
        Err(e) => {
            info!("No stored keymap ({}), starting empty", e);
            Keymap::new()
        }
    };

    // Touch controller: I2C1 with SDA=GPIO6, SCL=GPIO7; RST=GPIO16,
    // interrupt on GPIO17
    let i2c = I2c::new_blocking(
        p.I2C1,
        p.PIN_7,
        p.PIN_6,
        TouchI2c::config(&I2cConfig::default()),
    );
    let touch_rst = Rp2040Output::new(Output::new(p.PIN_16, Level::High));
    let touch_irq = Input::new(p.PIN_17, Pull::Up);

    match Cst328::new(TouchI2c::new(i2c), touch_rst, Delay, DEFAULT_ADDRESS) {
        Ok(touch) => {
            spawner.spawn(tasks::touch_task(touch, touch_irq)).unwrap();
            info!("Touch controller online");
        }
        // The grid still renders without touch; nothing ever polls a bus
        // with the wrong device on it
        Err(e) => error!("Touch controller offline: {}", e),
    }

    let mut screen = Screen::Grid;
    let mut status = "READY";
    ui::draw_grid_screen(display.framebuffer(), &keymap, status).ok();
    if display.flush().is_err() {
        warn!("Display flush failed");
    }
    backlight.set_config(&backlight_config(BACKLIGHT_LEVEL));

    info!("UI running");

    let mut last_tap: Option<Instant> = None;
    loop {
        Timer::after_millis(POLL_PERIOD_MS).await;

        let Some(frame) = take_touch() else { continue };
        let Some(point) = frame.primary() else { continue };

        let now = Instant::now();
        if last_tap.is_some_and(|t| now - t < TAP_DEBOUNCE) {
            continue;
        }
        last_tap = Some(now);

        let next = match screen {
            Screen::Grid => {
                handle_grid_tap(point.x, point.y, &mut keymap, &mut persistence, &mut status).await
            }
            Screen::Picker { row, col } => {
                handle_picker_tap(point.x, point.y, row, col, &mut keymap, &mut status)
            }
        };
        let Some(next_screen) = next else { continue };
        screen = next_screen;

        match screen {
            Screen::Grid => ui::draw_grid_screen(display.framebuffer(), &keymap, status).ok(),
            Screen::Picker { row, col } => {
                ui::draw_picker_screen(display.framebuffer(), &keymap, row, col).ok()
            }
        };
        if display.flush().is_err() {
            warn!("Display flush failed");
        }
    }
}

/// Handle a tap on the grid screen; `None` means nothing changed
async fn handle_grid_tap<F>(
    x: u16,
    y: u16,
    keymap: &mut Keymap,
    persistence: &mut ConfigPersistence<F>,
    status: &mut &'static str,
) -> Option<Screen>
where
    F: gridkey_hal::FlashStorage,
{
    match grid::hit_test(x, y)? {
        GridHit::Cell { row, col } => Some(Screen::Picker { row, col }),
        GridHit::Save => {
            *status = match persistence.save(keymap).await {
                Ok(()) => "SAVED",
                Err(e) => {
                    warn!("Save failed: {}", e);
                    "SAVE ERR"
                }
            };
            Some(Screen::Grid)
        }
        GridHit::Load => {
            match persistence.load().await {
                Ok(map) => {
                    *keymap = map;
                    *status = "LOADED";
                }
                Err(e) => {
                    warn!("Load failed: {}", e);
                    *status = "NO DATA";
                }
            }
            Some(Screen::Grid)
        }
        GridHit::Clear => {
            keymap.clear_all();
            *status = "CLEARED";
            Some(Screen::Grid)
        }
    }
}

/// Handle a tap on the key picker screen
fn handle_picker_tap(
    x: u16,
    y: u16,
    row: u8,
    col: u8,
    keymap: &mut Keymap,
    status: &mut &'static str,
) -> Option<Screen> {
    match grid::picker_hit_test(x, y, KEY_CHOICES.len())? {
        PickerHit::Key(index) => {
            let key = KEY_CHOICES[index];
            // Hidden on screen, so a tap there is dead space
            if keymap.is_key_assigned(key) {
                return None;
            }
            keymap.assign(row as usize, col as usize, key);
            *status = "EDITED";
            Some(Screen::Grid)
        }
        PickerHit::Back => Some(Screen::Grid),
    }
}
