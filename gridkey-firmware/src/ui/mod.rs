//! Configurator UI
//!
//! Two screens drawn into the display's framebuffer with
//! embedded-graphics: the assignment grid and the key picker. Geometry
//! and hit-testing live in `gridkey_core::grid`; this layer only draws.

pub mod grid;
pub mod picker;

pub use grid::draw_grid_screen;
pub use picker::draw_picker_screen;

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use gridkey_core::grid::Rect;

/// Which screen is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Screen {
    /// The assignment grid
    Grid,
    /// The key picker, assigning into one cell
    Picker { row: u8, col: u8 },
}

/// Screen colors
pub mod palette {
    use embedded_graphics::pixelcolor::Rgb565;
    use embedded_graphics::prelude::*;

    pub const BACKGROUND: Rgb565 = Rgb565::WHITE;
    pub const TEXT: Rgb565 = Rgb565::BLACK;
    pub const GRID_LINE: Rgb565 = Rgb565::CSS_GRAY;
    pub const BUTTON: Rgb565 = Rgb565::CSS_STEEL_BLUE;
    pub const DANGER: Rgb565 = Rgb565::CSS_FIREBRICK;
    pub const BUTTON_TEXT: Rgb565 = Rgb565::WHITE;
}

/// Translate core screen geometry into an embedded-graphics rectangle
pub(crate) fn to_rectangle(rect: Rect) -> Rectangle {
    Rectangle::new(
        Point::new(rect.x as i32, rect.y as i32),
        Size::new(rect.w as u32, rect.h as u32),
    )
}

pub(crate) fn draw_text<D>(
    target: &mut D,
    text: &str,
    x: i32,
    y: i32,
    color: Rgb565,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let style = MonoTextStyle::new(&FONT_6X10, color);
    Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(target)?;
    Ok(())
}

/// Filled button with a centered label
pub(crate) fn draw_button<D>(
    target: &mut D,
    rect: Rect,
    label: &str,
    fill: Rgb565,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    to_rectangle(rect)
        .into_styled(PrimitiveStyle::with_fill(fill))
        .draw(target)?;

    let text_width = 6 * label.len() as u16;
    let x = rect.x + rect.w.saturating_sub(text_width) / 2;
    let y = rect.y + rect.h.saturating_sub(10) / 2;
    draw_text(target, label, x as i32, y as i32, palette::BUTTON_TEXT)
}
