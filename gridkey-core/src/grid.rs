//! Grid geometry and hit-testing for the configurator screens
//!
//! The main screen shows an 11x11 grid of assignable cells with labeled
//! headers plus SAVE/LOAD/CLR buttons; the key-picker screen shows the key
//! choices in a 12-per-row layout with a BACK button. All geometry is in
//! screen pixels on the 320x240 panel and fixed at compile time.
//!
//! Hit-testing here is pure math over that geometry; drawing lives in the
//! firmware UI layer.

/// Number of grid columns
pub const GRID_COLS: usize = 11;

/// Number of grid rows
pub const GRID_ROWS: usize = 11;

/// Total number of assignable cells
pub const GRID_CELLS: usize = GRID_ROWS * GRID_COLS;

/// Column header labels (input combo identifiers)
pub const COL_LABELS: [&str; GRID_COLS] = [
    "1", "12", "13", "14", "2", "23", "24", "3", "34", "4", " ",
];

/// Row header labels (input combo identifiers)
pub const ROW_LABELS: [&str; GRID_ROWS] = [
    "A", "AB", "AC", "AD", "B", "BC", "BD", "C", "CD", "D", " ",
];

/// Height of the title/header band above the grid
pub const HEADER_HEIGHT: u16 = 20;

/// Cell pitch in pixels
pub const CELL_WIDTH: u16 = 24;
/// Cell pitch in pixels
pub const CELL_HEIGHT: u16 = 16;

/// Top-left corner of cell (0, 0)
pub const GRID_ORIGIN_X: u16 = 40;
/// Top-left corner of cell (0, 0)
pub const GRID_ORIGIN_Y: u16 = HEADER_HEIGHT + 5;

/// SAVE button
pub const SAVE_BUTTON: Rect = Rect::new(180, 205, 45, 15);
/// LOAD button
pub const LOAD_BUTTON: Rect = Rect::new(230, 205, 45, 15);
/// CLR button
pub const CLEAR_BUTTON: Rect = Rect::new(280, 205, 45, 15);
/// BACK button on the key-picker screen
pub const BACK_BUTTON: Rect = Rect::new(5, 205, 50, 20);

/// Keys per row on the key-picker screen
pub const PICKER_KEYS_PER_ROW: usize = 12;
/// Key button pitch on the key-picker screen
pub const PICKER_KEY_WIDTH: u16 = 25;
/// Key button pitch on the key-picker screen
pub const PICKER_KEY_HEIGHT: u16 = 18;
/// Top-left corner of the first key button
pub const PICKER_ORIGIN_X: u16 = 5;
/// Top-left corner of the first key button
pub const PICKER_ORIGIN_Y: u16 = 20;
/// Key rows are cut off below this line (the BACK button area)
pub const PICKER_MAX_Y: u16 = 190;

/// Longest label drawn inside a picker key button; longer labels are cut
/// so they cannot bleed into the neighbor button
pub const PICKER_LABEL_CHARS: usize = 4;

/// An axis-aligned screen rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl Rect {
    /// Construct a rectangle from its top-left corner and size
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    /// True if the point lies inside the rectangle (edges inclusive)
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x <= self.x + self.w && y >= self.y && y <= self.y + self.h
    }
}

/// Result of hit-testing the main grid screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GridHit {
    /// An assignable grid cell
    Cell { row: u8, col: u8 },
    /// The SAVE button
    Save,
    /// The LOAD button
    Load,
    /// The CLR button
    Clear,
}

/// Result of hit-testing the key-picker screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PickerHit {
    /// A key choice, by index into the choice list
    Key(usize),
    /// The BACK button
    Back,
}

/// The screen rectangle of a grid cell (full pitch, including its border)
pub fn cell_rect(row: usize, col: usize) -> Rect {
    Rect::new(
        GRID_ORIGIN_X + col as u16 * CELL_WIDTH,
        GRID_ORIGIN_Y + row as u16 * CELL_HEIGHT,
        CELL_WIDTH,
        CELL_HEIGHT,
    )
}

/// Hit-test a touch on the main grid screen
pub fn hit_test(x: u16, y: u16) -> Option<GridHit> {
    if SAVE_BUTTON.contains(x, y) {
        return Some(GridHit::Save);
    }
    if LOAD_BUTTON.contains(x, y) {
        return Some(GridHit::Load);
    }
    if CLEAR_BUTTON.contains(x, y) {
        return Some(GridHit::Clear);
    }

    let grid_right = GRID_ORIGIN_X + GRID_COLS as u16 * CELL_WIDTH;
    let grid_bottom = GRID_ORIGIN_Y + GRID_ROWS as u16 * CELL_HEIGHT;
    if x < GRID_ORIGIN_X || x > grid_right || y < GRID_ORIGIN_Y || y > grid_bottom {
        return None;
    }

    let col = ((x - GRID_ORIGIN_X) / CELL_WIDTH) as usize;
    let row = ((y - GRID_ORIGIN_Y) / CELL_HEIGHT) as usize;
    if row < GRID_ROWS && col < GRID_COLS {
        Some(GridHit::Cell {
            row: row as u8,
            col: col as u8,
        })
    } else {
        None
    }
}

/// The screen rectangle of a key-picker button, or `None` if that index
/// falls below the visible cutoff line
pub fn picker_key_rect(index: usize) -> Option<Rect> {
    let row = (index / PICKER_KEYS_PER_ROW) as u16;
    let col = (index % PICKER_KEYS_PER_ROW) as u16;
    let x = PICKER_ORIGIN_X + col * PICKER_KEY_WIDTH;
    let y = PICKER_ORIGIN_Y + row * PICKER_KEY_HEIGHT;
    if y + PICKER_KEY_HEIGHT > PICKER_MAX_Y {
        return None;
    }
    Some(Rect::new(x, y, PICKER_KEY_WIDTH, PICKER_KEY_HEIGHT))
}

/// Hit-test a touch on the key-picker screen
///
/// `key_count` is the number of key choices currently offered; indices
/// beyond it do not hit anything.
pub fn picker_hit_test(x: u16, y: u16, key_count: usize) -> Option<PickerHit> {
    if BACK_BUTTON.contains(x, y) {
        return Some(PickerHit::Back);
    }

    let right = PICKER_ORIGIN_X + PICKER_KEYS_PER_ROW as u16 * PICKER_KEY_WIDTH;
    if x < PICKER_ORIGIN_X || x > right || y < PICKER_ORIGIN_Y || y > PICKER_MAX_Y {
        return None;
    }

    let col = ((x - PICKER_ORIGIN_X) / PICKER_KEY_WIDTH) as usize;
    let row = ((y - PICKER_ORIGIN_Y) / PICKER_KEY_HEIGHT) as usize;
    let index = row * PICKER_KEYS_PER_ROW + col;
    if col < PICKER_KEYS_PER_ROW && index < key_count && picker_key_rect(index).is_some() {
        Some(PickerHit::Key(index))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_hit_inside_their_rects() {
        assert_eq!(hit_test(180, 205), Some(GridHit::Save));
        assert_eq!(hit_test(225, 220), Some(GridHit::Save));
        assert_eq!(hit_test(240, 210), Some(GridHit::Load));
        assert_eq!(hit_test(290, 212), Some(GridHit::Clear));
        // Gap between SAVE and LOAD
        assert_eq!(hit_test(227, 210), None);
    }

    #[test]
    fn first_cell_and_boundaries() {
        assert_eq!(hit_test(GRID_ORIGIN_X, GRID_ORIGIN_Y), Some(GridHit::Cell { row: 0, col: 0 }));
        // One pixel left of the grid is a miss
        assert_eq!(hit_test(GRID_ORIGIN_X - 1, GRID_ORIGIN_Y), None);
        // Last pixel inside cell (0, 0)
        assert_eq!(
            hit_test(GRID_ORIGIN_X + CELL_WIDTH - 1, GRID_ORIGIN_Y + CELL_HEIGHT - 1),
            Some(GridHit::Cell { row: 0, col: 0 })
        );
        // First pixel of cell (1, 1)
        assert_eq!(
            hit_test(GRID_ORIGIN_X + CELL_WIDTH, GRID_ORIGIN_Y + CELL_HEIGHT),
            Some(GridHit::Cell { row: 1, col: 1 })
        );
    }

    #[test]
    fn last_cell_hits() {
        let x = GRID_ORIGIN_X + (GRID_COLS as u16 - 1) * CELL_WIDTH + 1;
        let y = GRID_ORIGIN_Y + (GRID_ROWS as u16 - 1) * CELL_HEIGHT + 1;
        assert_eq!(
            hit_test(x, y),
            Some(GridHit::Cell {
                row: GRID_ROWS as u8 - 1,
                col: GRID_COLS as u8 - 1
            })
        );
    }

    #[test]
    fn beyond_grid_misses() {
        let x = GRID_ORIGIN_X + GRID_COLS as u16 * CELL_WIDTH + 1;
        assert_eq!(hit_test(x, GRID_ORIGIN_Y + 1), None);
        assert_eq!(hit_test(0, 0), None);
    }

    #[test]
    fn cell_rect_matches_hit_test() {
        for (row, col) in [(0usize, 0usize), (3, 7), (10, 10)] {
            let rect = cell_rect(row, col);
            assert_eq!(
                hit_test(rect.x + 1, rect.y + 1),
                Some(GridHit::Cell {
                    row: row as u8,
                    col: col as u8
                })
            );
        }
    }

    #[test]
    fn picker_back_button() {
        assert_eq!(picker_hit_test(10, 210, 97), Some(PickerHit::Back));
        assert_eq!(picker_hit_test(55, 225, 97), Some(PickerHit::Back));
    }

    #[test]
    fn picker_first_and_second_row() {
        assert_eq!(picker_hit_test(5, 20, 97), Some(PickerHit::Key(0)));
        assert_eq!(
            picker_hit_test(5 + PICKER_KEY_WIDTH, 20, 97),
            Some(PickerHit::Key(1))
        );
        assert_eq!(
            picker_hit_test(5, 20 + PICKER_KEY_HEIGHT, 97),
            Some(PickerHit::Key(12))
        );
    }

    #[test]
    fn picker_respects_key_count() {
        // Index 13 would be in-bounds geometrically but only 10 keys offered
        assert_eq!(
            picker_hit_test(5 + PICKER_KEY_WIDTH, 20 + PICKER_KEY_HEIGHT, 10),
            None
        );
    }

    #[test]
    fn picker_label_budget_fits_the_button() {
        // 6px glyphs: the truncated label must stay inside the button pitch
        assert!(PICKER_LABEL_CHARS as u16 * 6 < PICKER_KEY_WIDTH);
    }

    #[test]
    fn picker_cutoff_row_not_drawn_or_hit() {
        // Rows that would cross the 190px line are cut off
        let last_full_row = ((PICKER_MAX_Y - PICKER_ORIGIN_Y) / PICKER_KEY_HEIGHT) as usize;
        let cut_index = last_full_row * PICKER_KEYS_PER_ROW;
        assert_eq!(picker_key_rect(cut_index), None);
        assert!(picker_key_rect(cut_index - 1).is_some());
    }
}
