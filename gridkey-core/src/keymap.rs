//! Keymap model, serialization and firmware export
//!
//! The keymap assigns one key label to each grid cell. Assignments are
//! stored as a fixed 11x11 array so the model never allocates; persistence
//! uses postcard via [`Keymap::to_bytes`]/[`Keymap::from_bytes`] (behind
//! the `serde` feature), and [`Keymap::export`] flattens the map into the
//! ordered list the keyboard firmware consumes.

use heapless::{String, Vec};

use crate::grid::{COL_LABELS, GRID_CELLS, GRID_COLS, GRID_ROWS, ROW_LABELS};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum key label length in bytes
pub const MAX_KEY_LEN: usize = 8;

/// Maximum position label length (row label + column label)
pub const MAX_POSITION_LEN: usize = 4;

/// A key label such as `"A"`, `"F10"` or `"SHIFT"`
pub type KeyLabel = String<MAX_KEY_LEN>;

/// The keys a cell can be assigned to, in picker display order
pub const KEY_CHOICES: &[&str] = &[
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", //
    "N", "O", "P", "Q", "R", "S", "T", "U", "V", "W", "X", "Y", "Z", //
    "1", "2", "3", "4", "5", "6", "7", "8", "9", "0", //
    "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12", //
    "ESC", "TAB", "CAPS", "SHIFT", "CTRL", "ALT", "SPACE", "ENTER", "BKSP", "DEL", //
    "UP", "DOWN", "LEFT", "RIGHT", "HOME", "END", "PGUP", "PGDN", "INS", //
    "`", "-", "=", "[", "]", "\\", ";", "'", ",", ".", "/", "~", "!", "@", //
    "#", "$", "%", "^", "&", "*", "(", ")", "_", "+", "{", "}", "|", //
    ":", "\"", "<", ">", "?",
];

/// Grid cell assignments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Keymap {
    cells: [[Option<KeyLabel>; GRID_COLS]; GRID_ROWS],
}

impl Keymap {
    /// An empty keymap with no assignments
    pub fn new() -> Self {
        Self::default()
    }

    /// The key assigned to a cell, if any
    pub fn get(&self, row: usize, col: usize) -> Option<&KeyLabel> {
        self.cells.get(row)?.get(col)?.as_ref()
    }

    /// Assign a key to a cell, returning the previous assignment
    ///
    /// Out-of-bounds cells are ignored and return `None`. Labels longer
    /// than [`MAX_KEY_LEN`] are not representable and leave the cell empty.
    pub fn assign(&mut self, row: usize, col: usize, key: &str) -> Option<KeyLabel> {
        if row >= GRID_ROWS || col >= GRID_COLS {
            return None;
        }
        let mut label = KeyLabel::new();
        let _ = label.push_str(key);
        self.cells[row][col].replace(label)
    }

    /// Clear a cell, returning the key that was assigned to it
    pub fn clear(&mut self, row: usize, col: usize) -> Option<KeyLabel> {
        self.cells.get_mut(row)?.get_mut(col)?.take()
    }

    /// Remove every assignment
    pub fn clear_all(&mut self) {
        for row in self.cells.iter_mut() {
            for cell in row.iter_mut() {
                *cell = None;
            }
        }
    }

    /// Number of assigned cells
    pub fn assigned_count(&self) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|cell| cell.is_some())
            .count()
    }

    /// True if the key is already assigned to some cell
    ///
    /// The picker uses this to hide keys that are already taken.
    pub fn is_key_assigned(&self, key: &str) -> bool {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .any(|cell| cell.as_deref() == Some(key))
    }

    /// Iterate the assigned cells in row-major order
    pub fn iter_assigned(&self) -> impl Iterator<Item = (usize, usize, &KeyLabel)> {
        self.cells.iter().enumerate().flat_map(|(row, cols)| {
            cols.iter()
                .enumerate()
                .filter_map(move |(col, cell)| cell.as_ref().map(|key| (row, col, key)))
        })
    }

    /// Flatten into the export list the keyboard firmware consumes
    ///
    /// Entries are ordered row-major so the output is stable across saves.
    pub fn export(&self) -> KeymapExport {
        let mut export = KeymapExport::default();
        for (row, col, key) in self.iter_assigned() {
            let mut position: String<MAX_POSITION_LEN> = String::new();
            let _ = position.push_str(ROW_LABELS[row]);
            let _ = position.push_str(COL_LABELS[col]);
            // Capacity equals the cell count, cannot overflow
            let _ = export.entries.push(ExportEntry {
                row: row as u8,
                col: col as u8,
                position,
                key: key.clone(),
            });
        }
        export
    }

    /// Serialize into the postcard wire format used for flash persistence
    #[cfg(feature = "serde")]
    pub fn to_bytes<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], postcard::Error> {
        postcard::to_slice(self, buf)
    }

    /// Deserialize from the postcard wire format
    #[cfg(feature = "serde")]
    pub fn from_bytes(data: &[u8]) -> Result<Self, postcard::Error> {
        postcard::from_bytes(data)
    }
}

/// One exported assignment
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExportEntry {
    /// Grid row index
    pub row: u8,
    /// Grid column index
    pub col: u8,
    /// Combined position label (row label + column label), e.g. `"A12"`
    pub position: String<MAX_POSITION_LEN>,
    /// Assigned key
    pub key: KeyLabel,
}

/// Flattened keymap in the format the keyboard firmware consumes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeymapExport {
    /// Assignments in row-major order
    pub entries: Vec<ExportEntry, GRID_CELLS>,
}

impl KeymapExport {
    /// Serialize into the postcard wire format
    #[cfg(feature = "serde")]
    pub fn to_bytes<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], postcard::Error> {
        postcard::to_slice(self, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_and_get() {
        let mut map = Keymap::new();
        assert_eq!(map.get(0, 0), None);

        assert_eq!(map.assign(0, 0, "ESC"), None);
        assert_eq!(map.get(0, 0).map(|k| k.as_str()), Some("ESC"));
        assert_eq!(map.assigned_count(), 1);
    }

    #[test]
    fn assign_returns_previous_key() {
        let mut map = Keymap::new();
        map.assign(2, 3, "A");
        let previous = map.assign(2, 3, "B");
        assert_eq!(previous.as_deref(), Some("A"));
        assert_eq!(map.get(2, 3).map(|k| k.as_str()), Some("B"));
        assert_eq!(map.assigned_count(), 1);
    }

    #[test]
    fn out_of_bounds_is_ignored() {
        let mut map = Keymap::new();
        assert_eq!(map.assign(GRID_ROWS, 0, "A"), None);
        assert_eq!(map.assign(0, GRID_COLS, "A"), None);
        assert_eq!(map.assigned_count(), 0);
        assert_eq!(map.get(GRID_ROWS, GRID_COLS), None);
    }

    #[test]
    fn clear_and_clear_all() {
        let mut map = Keymap::new();
        map.assign(1, 1, "TAB");
        map.assign(4, 9, "SPACE");

        assert_eq!(map.clear(1, 1).as_deref(), Some("TAB"));
        assert_eq!(map.clear(1, 1), None);
        assert_eq!(map.assigned_count(), 1);

        map.clear_all();
        assert_eq!(map.assigned_count(), 0);
    }

    #[test]
    fn key_assignment_lookup() {
        let mut map = Keymap::new();
        map.assign(5, 5, "ENTER");
        assert!(map.is_key_assigned("ENTER"));
        assert!(!map.is_key_assigned("SPACE"));
    }

    #[test]
    fn export_is_row_major_with_position_labels() {
        let mut map = Keymap::new();
        // Inserted out of order on purpose
        map.assign(4, 1, "B");
        map.assign(0, 1, "A");
        map.assign(0, 3, "TAB");

        let export = map.export();
        assert_eq!(export.entries.len(), 3);

        assert_eq!(export.entries[0].row, 0);
        assert_eq!(export.entries[0].col, 1);
        assert_eq!(export.entries[0].position.as_str(), "A12");
        assert_eq!(export.entries[0].key.as_str(), "A");

        assert_eq!(export.entries[1].position.as_str(), "A14");
        assert_eq!(export.entries[1].key.as_str(), "TAB");

        // Row 4 label "B", col 1 label "12"
        assert_eq!(export.entries[2].position.as_str(), "B12");
        assert_eq!(export.entries[2].key.as_str(), "B");
    }

    #[test]
    fn key_choice_table_shape() {
        assert_eq!(KEY_CHOICES.len(), 97);
        assert!(KEY_CHOICES.iter().all(|k| k.len() <= MAX_KEY_LEN));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn postcard_round_trip() {
        let mut map = Keymap::new();
        map.assign(0, 0, "ESC");
        map.assign(10, 10, "?");

        let mut buf = [0u8; 512];
        let bytes = map.to_bytes(&mut buf).unwrap();
        let restored = Keymap::from_bytes(bytes).unwrap();
        assert_eq!(restored, map);
    }
}
