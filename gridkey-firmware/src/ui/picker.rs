//! Key picker screen
//!
//! Shows the key choices 12 per row; keys already assigned somewhere in
//! the grid are hidden. The title names the cell being assigned.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::PrimitiveStyle;
use heapless::String;

use gridkey_core::grid::{
    picker_key_rect, BACK_BUTTON, COL_LABELS, PICKER_LABEL_CHARS, ROW_LABELS,
};
use gridkey_core::keymap::{Keymap, KEY_CHOICES};

use super::{draw_button, draw_text, palette, to_rectangle};

/// Draw the full key picker screen for the given target cell
pub fn draw_picker_screen<D>(
    target: &mut D,
    keymap: &Keymap,
    row: u8,
    col: u8,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    target.clear(palette::BACKGROUND)?;

    let mut title: String<24> = String::new();
    let _ = title.push_str("ASSIGN ");
    let _ = title.push_str(ROW_LABELS[row as usize]);
    let _ = title.push_str(COL_LABELS[col as usize]);
    draw_text(target, &title, 5, 2, palette::TEXT)?;

    let outline = PrimitiveStyle::with_stroke(palette::GRID_LINE, 1);
    for (index, key) in KEY_CHOICES.iter().enumerate() {
        let Some(rect) = picker_key_rect(index) else {
            continue;
        };
        if keymap.is_key_assigned(key) {
            continue;
        }

        to_rectangle(rect).into_styled(outline).draw(target)?;

        let label = &key[..key.len().min(PICKER_LABEL_CHARS)];
        let text_width = 6 * label.len() as u16;
        let x = rect.x + rect.w.saturating_sub(text_width) / 2;
        let y = rect.y + rect.h.saturating_sub(10) / 2;
        draw_text(target, label, x as i32, y as i32, palette::TEXT)?;
    }

    draw_button(target, BACK_BUTTON, "BACK", palette::BUTTON)
}
