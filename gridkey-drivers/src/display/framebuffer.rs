//! RGB565 framebuffer backing the display driver
//!
//! One fixed-size pixel buffer, allocated once (a static cell on the
//! board, a boxed array in host tests), row-major with a stride of
//! `PANEL_WIDTH * 2` bytes. Pixels are stored big-endian because that is
//! the byte order the panel shifts in; the buffer can therefore be
//! streamed to the bus without conversion.
//!
//! Implements `embedded-graphics`' `DrawTarget` so the UI layer can draw
//! with its primitives and fonts.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::{PANEL_HEIGHT, PANEL_WIDTH};

/// Size of the pixel buffer in bytes
pub const FRAME_BYTES: usize = PANEL_WIDTH as usize * PANEL_HEIGHT as usize * 2;

/// The panel framebuffer
pub struct Framebuffer<'b> {
    buf: &'b mut [u8; FRAME_BYTES],
}

impl<'b> Framebuffer<'b> {
    /// Wrap a pixel buffer
    ///
    /// The fixed-size reference makes a wrongly sized buffer a compile
    /// error rather than a runtime one.
    pub fn new(buf: &'b mut [u8; FRAME_BYTES]) -> Self {
        Self { buf }
    }

    /// Set a single pixel; out-of-bounds coordinates are ignored
    pub fn set_pixel(&mut self, x: u16, y: u16, color: Rgb565) {
        if x >= PANEL_WIDTH || y >= PANEL_HEIGHT {
            return;
        }
        let idx = (y as usize * PANEL_WIDTH as usize + x as usize) * 2;
        let raw = RawU16::from(color).into_inner();
        self.buf[idx] = (raw >> 8) as u8;
        self.buf[idx + 1] = raw as u8;
    }

    /// Fill the whole buffer with one color
    pub fn fill(&mut self, color: Rgb565) {
        let raw = RawU16::from(color).into_inner();
        let hi = (raw >> 8) as u8;
        let lo = raw as u8;
        for px in self.buf.chunks_exact_mut(2) {
            px[0] = hi;
            px[1] = lo;
        }
    }

    /// Fill a rectangle, clipped to the panel
    pub fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, color: Rgb565) {
        let x1 = x.saturating_add(w).min(PANEL_WIDTH);
        let y1 = y.saturating_add(h).min(PANEL_HEIGHT);
        if x >= x1 || y >= y1 {
            return;
        }
        let raw = RawU16::from(color).into_inner();
        let hi = (raw >> 8) as u8;
        let lo = raw as u8;
        for row in y..y1 {
            let start = (row as usize * PANEL_WIDTH as usize + x as usize) * 2;
            let end = start + (x1 - x) as usize * 2;
            for px in self.buf[start..end].chunks_exact_mut(2) {
                px[0] = hi;
                px[1] = lo;
            }
        }
    }

    /// The raw pixel bytes, ready for the bus
    pub fn as_bytes(&self) -> &[u8] {
        self.buf
    }
}

impl OriginDimensions for Framebuffer<'_> {
    fn size(&self) -> Size {
        Size::new(PANEL_WIDTH as u32, PANEL_HEIGHT as u32)
    }
}

impl DrawTarget for Framebuffer<'_> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if coord.x >= 0 && coord.y >= 0 {
                self.set_pixel(coord.x as u16, coord.y as u16, color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let clipped = area.intersection(&self.bounding_box());
        self.fill_rect(
            clipped.top_left.x as u16,
            clipped.top_left.y as u16,
            clipped.size.width as u16,
            clipped.size.height as u16,
            color,
        );
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
    use std::boxed::Box;
    use std::vec;

    fn buffer() -> Box<[u8; FRAME_BYTES]> {
        Box::new([0u8; FRAME_BYTES])
    }

    #[test]
    fn pixels_are_big_endian_row_major() {
        let mut buf = buffer();
        let mut fb = Framebuffer::new(&mut buf);

        // Rgb565 0xABCD: r=0x15, g=0x1E, b=0x0D
        let color = Rgb565::from(RawU16::new(0xABCD));
        fb.set_pixel(2, 1, color);

        let idx = (PANEL_WIDTH as usize + 2) * 2;
        assert_eq!(fb.as_bytes()[idx], 0xAB);
        assert_eq!(fb.as_bytes()[idx + 1], 0xCD);
    }

    #[test]
    fn out_of_bounds_pixel_is_ignored() {
        let mut buf = buffer();
        let mut fb = Framebuffer::new(&mut buf);
        fb.set_pixel(PANEL_WIDTH, 0, Rgb565::WHITE);
        fb.set_pixel(0, PANEL_HEIGHT, Rgb565::WHITE);
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn fill_covers_every_pixel() {
        let mut buf = buffer();
        let mut fb = Framebuffer::new(&mut buf);
        fb.fill(Rgb565::from(RawU16::new(0x1234)));
        for px in fb.as_bytes().chunks_exact(2) {
            assert_eq!(px, &[0x12, 0x34]);
        }
    }

    #[test]
    fn fill_rect_clips_to_panel() {
        let mut buf = buffer();
        let mut fb = Framebuffer::new(&mut buf);

        fb.fill_rect(PANEL_WIDTH - 2, PANEL_HEIGHT - 1, 10, 10, Rgb565::WHITE);

        // Exactly the two pixels inside the panel are written
        let row_start = (PANEL_HEIGHT as usize - 1) * PANEL_WIDTH as usize * 2;
        let painted = &fb.as_bytes()[row_start + (PANEL_WIDTH as usize - 2) * 2..];
        assert_eq!(painted, &[0xFF, 0xFF, 0xFF, 0xFF]);
        let total: usize = fb.as_bytes().iter().map(|&b| (b == 0xFF) as usize).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn fill_solid_matches_fill_rect() {
        let mut buf = buffer();
        let mut fb = Framebuffer::new(&mut buf);

        Rectangle::new(Point::new(10, 5), Size::new(3, 2))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::WHITE))
            .draw(&mut fb)
            .unwrap();

        let mut expected_buf = buffer();
        let mut expected = Framebuffer::new(&mut expected_buf);
        expected.fill_rect(10, 5, 3, 2, Rgb565::WHITE);

        assert_eq!(fb.as_bytes(), expected.as_bytes());
    }

    #[test]
    fn draw_target_clips_negative_coords() {
        let mut buf = buffer();
        let mut fb = Framebuffer::new(&mut buf);

        Rectangle::new(Point::new(-2, -2), Size::new(3, 3))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::WHITE))
            .draw(&mut fb)
            .unwrap();

        // Only the (0,0) pixel of the rectangle lands on screen
        let white = vec![0xFFu8, 0xFF];
        assert_eq!(&fb.as_bytes()[0..2], white.as_slice());
        assert_eq!(&fb.as_bytes()[2..4], &[0, 0]);
    }
}
