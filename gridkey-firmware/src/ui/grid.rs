//! Assignment grid screen
//!
//! Header band with title and status, labeled 11x11 grid with the
//! current assignments, and the SAVE/LOAD/CLR buttons.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

use gridkey_core::grid::{
    cell_rect, CELL_HEIGHT, CELL_WIDTH, CLEAR_BUTTON, COL_LABELS, GRID_COLS, GRID_ORIGIN_X,
    GRID_ORIGIN_Y, GRID_ROWS, LOAD_BUTTON, ROW_LABELS, SAVE_BUTTON,
};
use gridkey_core::keymap::Keymap;

use super::{draw_button, draw_text, palette};

/// Longest label drawn inside a cell; anything longer is cut so it
/// cannot bleed into the neighbor cell
const CELL_LABEL_CHARS: usize = 3;

/// Draw the full grid screen
pub fn draw_grid_screen<D>(target: &mut D, keymap: &Keymap, status: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    target.clear(palette::BACKGROUND)?;

    draw_text(target, "GRIDKEY", 5, 2, palette::TEXT)?;
    draw_text(target, status, 240, 2, palette::TEXT)?;

    // Column headers above the grid, row headers to its left
    for (col, label) in COL_LABELS.iter().enumerate() {
        let x = GRID_ORIGIN_X + col as u16 * CELL_WIDTH + 4;
        draw_text(target, label, x as i32, (GRID_ORIGIN_Y - 12) as i32, palette::TEXT)?;
    }
    for (row, label) in ROW_LABELS.iter().enumerate() {
        let y = GRID_ORIGIN_Y + row as u16 * CELL_HEIGHT + 3;
        draw_text(target, label, 14, y as i32, palette::TEXT)?;
    }

    draw_grid_lines(target)?;

    for (row, col, key) in keymap.iter_assigned() {
        let rect = cell_rect(row, col);
        let label = &key[..key.len().min(CELL_LABEL_CHARS)];
        draw_text(
            target,
            label,
            (rect.x + 2) as i32,
            (rect.y + 3) as i32,
            palette::TEXT,
        )?;
    }

    draw_button(target, SAVE_BUTTON, "SAVE", palette::BUTTON)?;
    draw_button(target, LOAD_BUTTON, "LOAD", palette::BUTTON)?;
    draw_button(target, CLEAR_BUTTON, "CLR", palette::DANGER)?;

    Ok(())
}

fn draw_grid_lines<D>(target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let style = PrimitiveStyle::with_fill(palette::GRID_LINE);
    let width = GRID_COLS as u32 * CELL_WIDTH as u32;
    let height = GRID_ROWS as u32 * CELL_HEIGHT as u32;

    for col in 0..=GRID_COLS {
        let x = GRID_ORIGIN_X + col as u16 * CELL_WIDTH;
        Rectangle::new(
            Point::new(x as i32, GRID_ORIGIN_Y as i32),
            Size::new(1, height + 1),
        )
        .into_styled(style)
        .draw(target)?;
    }
    for row in 0..=GRID_ROWS {
        let y = GRID_ORIGIN_Y + row as u16 * CELL_HEIGHT;
        Rectangle::new(
            Point::new(GRID_ORIGIN_X as i32, y as i32),
            Size::new(width + 1, 1),
        )
        .into_styled(style)
        .draw(target)?;
    }

    Ok(())
}
