//! Display driver: panel geometry, update windows and the ST7789 protocol

pub mod framebuffer;
pub mod st7789;

pub use framebuffer::{Framebuffer, FRAME_BYTES};
pub use st7789::St7789;

/// Panel width in pixels (as mounted, after the rotation set at init)
pub const PANEL_WIDTH: u16 = 320;

/// Panel height in pixels
pub const PANEL_HEIGHT: u16 = 240;

/// A rectangular update region in panel pixel coordinates
///
/// `x1`/`y1` are exclusive ends at this API; the inclusive end values the
/// controller expects are derived when the window is transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Window {
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
}

impl Window {
    /// The whole panel
    pub const FULL: Self = Self {
        x0: 0,
        y0: 0,
        x1: PANEL_WIDTH,
        y1: PANEL_HEIGHT,
    };

    /// Construct a window from its corners
    pub const fn new(x0: u16, y0: u16, x1: u16, y1: u16) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Normalize for transmission
    ///
    /// Reversed corners are swapped so `x0 <= x1` and `y0 <= y1`; ends
    /// short of the panel edge are extended by one pixel (the panel drops
    /// the last column/row of a minimal window otherwise); everything is
    /// clamped to the panel bounds.
    pub fn normalized(self) -> Self {
        let (mut x0, mut x1) = if self.x0 > self.x1 {
            (self.x1, self.x0)
        } else {
            (self.x0, self.x1)
        };
        let (mut y0, mut y1) = if self.y0 > self.y1 {
            (self.y1, self.y0)
        } else {
            (self.y0, self.y1)
        };

        if x1 < PANEL_WIDTH - 1 {
            x1 += 1;
        }
        if y1 < PANEL_HEIGHT - 1 {
            y1 += 1;
        }

        x1 = x1.min(PANEL_WIDTH);
        y1 = y1.min(PANEL_HEIGHT);
        x0 = x0.min(x1);
        y0 = y0.min(y1);

        Self { x0, y0, x1, y1 }
    }

    /// Window width in pixels
    pub fn width(&self) -> u16 {
        self.x1 - self.x0
    }

    /// Window height in pixels
    pub fn height(&self) -> u16 {
        self.y1 - self.y0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversed_corners_are_swapped() {
        let win = Window::new(100, 150, 20, 30).normalized();
        assert!(win.x0 <= win.x1);
        assert!(win.y0 <= win.y1);
        assert_eq!((win.x0, win.y0), (20, 30));
        // Swapped ends still get the one-pixel extension
        assert_eq!((win.x1, win.y1), (101, 151));
    }

    #[test]
    fn short_ends_are_extended_by_one() {
        let win = Window::new(10, 10, 50, 40).normalized();
        assert_eq!(win.x1, 51);
        assert_eq!(win.y1, 41);
    }

    #[test]
    fn ends_at_panel_edge_are_not_extended() {
        let win = Window::new(0, 0, PANEL_WIDTH - 1, PANEL_HEIGHT - 1).normalized();
        assert_eq!(win.x1, PANEL_WIDTH - 1);
        assert_eq!(win.y1, PANEL_HEIGHT - 1);

        let full = Window::FULL.normalized();
        assert_eq!(full, Window::FULL);
    }

    #[test]
    fn oversized_window_is_clamped() {
        let win = Window::new(0, 0, PANEL_WIDTH + 10, PANEL_HEIGHT + 10).normalized();
        assert_eq!(win.x1, PANEL_WIDTH);
        assert_eq!(win.y1, PANEL_HEIGHT);
    }
}
