//! ST7789 panel controller driver
//!
//! # Bus protocol
//!
//! Every transfer is framed the same way: chip-select is deasserted, the
//! data/command line is driven (low for a command byte, high for parameter
//! or pixel data), chip-select is asserted for the duration of the
//! transfer, then deasserted again. The framing holds even for single-byte
//! transfers; the panel samples D/C on every clocked byte.
//!
//! # Updates
//!
//! The driver owns the framebuffer. [`St7789::flush_window`] transmits
//! only the scanline segments inside a (normalized) window, computed from
//! the row stride and horizontal offset, so a small dirty region never
//! costs a full-frame transfer. [`St7789::flush`] streams the whole
//! buffer.

use embedded_hal::delay::DelayNs;
use gridkey_hal::{OutputPin, SpiBus};

use super::framebuffer::Framebuffer;
use super::{Window, PANEL_WIDTH};

/// Column address set
const CMD_CASET: u8 = 0x2A;
/// Row address set
const CMD_RASET: u8 = 0x2B;
/// Memory write (pixel data follows)
const CMD_RAMWR: u8 = 0x2C;
/// Sleep out; needs a settle delay before further commands
const CMD_SLEEP_OUT: u8 = 0x11;

/// Settle time after sleep-out, in milliseconds (datasheet minimum is 120)
const SLEEP_OUT_DELAY_MS: u32 = 120;

/// Reset pulse timing in milliseconds
const RESET_PULSE_MS: u32 = 10;

/// Panel bring-up command table: (command, parameter bytes)
///
/// Vendor-supplied configuration for this specific panel: orientation and
/// color format first, then porch/VCOM/voltage tuning, the two gamma
/// curves, inversion, sleep-out and display-on. The table is an opaque
/// constant; order and values are load-bearing on real hardware and must
/// not be rearranged.
const INIT_SEQUENCE: &[(u8, &[u8])] = &[
    (0x36, &[0x70]), // MADCTL: row/column exchange for the 90-degree mount
    (0x3A, &[0x05]), // COLMOD: 16bpp 5-6-5
    (0xB2, &[0x0B, 0x0B, 0x00, 0x33, 0x35]),
    (0xB7, &[0x11]),
    (0xBB, &[0x35]),
    (0xC0, &[0x2C]),
    (0xC2, &[0x01]),
    (0xC3, &[0x0D]),
    (0xC4, &[0x20]),
    (0xC6, &[0x13]),
    (0xD0, &[0xA4, 0xA1]),
    (0xD6, &[0xA1]),
    (
        0xE0, // positive gamma
        &[
            0xF0, 0x06, 0x0B, 0x0A, 0x09, 0x26, 0x29, 0x33, 0x41, 0x18, 0x16, 0x15, 0x29, 0x2D,
        ],
    ),
    (
        0xE1, // negative gamma
        &[
            0xF0, 0x04, 0x08, 0x08, 0x07, 0x03, 0x28, 0x32, 0x40, 0x3B, 0x19, 0x18, 0x2A, 0x2E,
        ],
    ),
    (0x21, &[]),          // display inversion on (panel is normally-white)
    (CMD_SLEEP_OUT, &[]), // sleep out + settle delay
    (0x29, &[]),          // display on
];

/// ST7789 display controller with its framebuffer
pub struct St7789<'b, SPI, DC, CS, RST, D> {
    spi: SPI,
    dc: DC,
    cs: CS,
    rst: RST,
    delay: D,
    fb: Framebuffer<'b>,
}

impl<'b, SPI, DC, CS, RST, D> St7789<'b, SPI, DC, CS, RST, D>
where
    SPI: SpiBus,
    DC: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
    D: DelayNs,
{
    /// Create the driver; the panel is not usable until [`init`](Self::init)
    pub fn new(spi: SPI, mut dc: DC, mut cs: CS, rst: RST, delay: D, fb: Framebuffer<'b>) -> Self {
        // Idle bus state: deselected, data mode
        cs.set_high();
        dc.set_high();
        Self {
            spi,
            dc,
            cs,
            rst,
            delay,
            fb,
        }
    }

    /// Bring up the panel: reset pulse, then the configuration table
    pub fn init(&mut self) -> Result<(), SPI::Error> {
        self.rst.set_high();
        self.delay.delay_ms(RESET_PULSE_MS);
        self.rst.set_low();
        self.delay.delay_ms(RESET_PULSE_MS);
        self.rst.set_high();
        self.delay.delay_ms(RESET_PULSE_MS);

        for &(cmd, params) in INIT_SEQUENCE {
            self.write_command(cmd)?;
            if !params.is_empty() {
                self.write_data(params)?;
            }
            if cmd == CMD_SLEEP_OUT {
                self.delay.delay_ms(SLEEP_OUT_DELAY_MS);
            }
        }
        Ok(())
    }

    /// Send a command byte (D/C low for the whole transfer)
    pub fn write_command(&mut self, cmd: u8) -> Result<(), SPI::Error> {
        self.cs.set_high();
        self.dc.set_low();
        self.cs.set_low();
        let result = self.spi.write(&[cmd]);
        self.cs.set_high();
        result
    }

    /// Send parameter/pixel bytes (D/C high for the whole transfer)
    pub fn write_data(&mut self, data: &[u8]) -> Result<(), SPI::Error> {
        self.cs.set_high();
        self.dc.set_high();
        self.cs.set_low();
        let result = self.spi.write(data);
        self.cs.set_high();
        result
    }

    /// Address a window for the next pixel write
    ///
    /// The controller's end addresses are inclusive, so the transmitted
    /// end values are `x1 - 1` / `y1 - 1`, each as two big-endian bytes.
    pub fn set_window(&mut self, win: Window) -> Result<(), SPI::Error> {
        let x_end = win.x1.saturating_sub(1);
        let y_end = win.y1.saturating_sub(1);

        self.write_command(CMD_CASET)?;
        self.write_data(&[
            (win.x0 >> 8) as u8,
            win.x0 as u8,
            (x_end >> 8) as u8,
            x_end as u8,
        ])?;

        self.write_command(CMD_RASET)?;
        self.write_data(&[
            (win.y0 >> 8) as u8,
            win.y0 as u8,
            (y_end >> 8) as u8,
            y_end as u8,
        ])?;

        self.write_command(CMD_RAMWR)
    }

    /// Transmit the framebuffer content inside `win`
    ///
    /// The window is normalized first (reversed corners swapped, short
    /// ends extended). Rows go out top to bottom, pixels left to right;
    /// only the scanline segments inside the window are transferred.
    pub fn flush_window(&mut self, win: Window) -> Result<(), SPI::Error> {
        let win = win.normalized();
        if win.width() == 0 || win.height() == 0 {
            return Ok(());
        }
        self.set_window(win)?;

        // One data framing for the whole pixel stream
        self.cs.set_high();
        self.dc.set_high();
        self.cs.set_low();
        let stride = PANEL_WIDTH as usize * 2;
        let seg_len = win.width() as usize * 2;
        let mut result = Ok(());
        for y in win.y0..win.y1 {
            let start = y as usize * stride + win.x0 as usize * 2;
            result = self.spi.write(&self.fb.as_bytes()[start..start + seg_len]);
            if result.is_err() {
                break;
            }
        }
        self.cs.set_high();
        result
    }

    /// Transmit the entire framebuffer
    pub fn flush(&mut self) -> Result<(), SPI::Error> {
        self.set_window(Window::FULL)?;

        self.cs.set_high();
        self.dc.set_high();
        self.cs.set_low();
        let result = self.spi.write(self.fb.as_bytes());
        self.cs.set_high();
        result
    }

    /// The framebuffer, for the drawing layer
    pub fn framebuffer(&mut self) -> &mut Framebuffer<'b> {
        &mut self.fb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::framebuffer::FRAME_BYTES;
    use std::boxed::Box;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::vec::Vec;

    /// Output pin backed by a shared level, so the SPI mock can observe
    /// the D/C and CS lines at transfer time
    struct Line(Rc<Cell<bool>>);

    impl OutputPin for Line {
        fn set_high(&mut self) {
            self.0.set(true);
        }
        fn set_low(&mut self) {
            self.0.set(false);
        }
        fn is_set_high(&self) -> bool {
            self.0.get()
        }
    }

    /// Records (dc_level, bytes) for every transfer; panics if the caller
    /// clocks bytes without asserting chip-select
    struct RecordingSpi {
        dc: Rc<Cell<bool>>,
        cs: Rc<Cell<bool>>,
        log: Rc<RefCell<Vec<(bool, Vec<u8>)>>>,
    }

    impl SpiBus for RecordingSpi {
        type Error = core::convert::Infallible;

        fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
            assert!(!self.cs.get(), "transfer with chip-select deasserted");
            self.log.borrow_mut().push((self.dc.get(), data.to_vec()));
            Ok(())
        }
    }

    struct NoopDelay;

    impl DelayNs for NoopDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    type Log = Rc<RefCell<Vec<(bool, Vec<u8>)>>>;

    fn display(
        buf: &mut [u8; FRAME_BYTES],
    ) -> (
        St7789<'_, RecordingSpi, Line, Line, Line, NoopDelay>,
        Log,
    ) {
        let dc = Rc::new(Cell::new(false));
        let cs = Rc::new(Cell::new(false));
        let rst = Rc::new(Cell::new(false));
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let spi = RecordingSpi {
            dc: dc.clone(),
            cs: cs.clone(),
            log: log.clone(),
        };
        let driver = St7789::new(
            spi,
            Line(dc),
            Line(cs),
            Line(rst),
            NoopDelay,
            Framebuffer::new(buf),
        );
        (driver, log)
    }

    /// Fill the buffer with a recognizable byte pattern
    fn patterned_buffer() -> Box<[u8; FRAME_BYTES]> {
        let mut buf = Box::new([0u8; FRAME_BYTES]);
        for (i, b) in buf.iter_mut().enumerate() {
            *b = (i % 251) as u8;
        }
        buf
    }

    #[test]
    fn init_emits_command_table_in_order() {
        let mut buf = Box::new([0u8; FRAME_BYTES]);
        let (mut driver, log) = display(&mut buf);
        driver.init().unwrap();

        let log = log.borrow();
        let commands: Vec<u8> = log
            .iter()
            .filter(|(dc, _)| !dc)
            .map(|(_, bytes)| bytes[0])
            .collect();
        assert_eq!(
            commands,
            std::vec![
                0x36, 0x3A, 0xB2, 0xB7, 0xBB, 0xC0, 0xC2, 0xC3, 0xC4, 0xC6, 0xD0, 0xD6, 0xE0,
                0xE1, 0x21, 0x11, 0x29
            ]
        );

        // First command's parameter goes out in data mode
        assert_eq!(log[0], (false, std::vec![0x36]));
        assert_eq!(log[1], (true, std::vec![0x70]));
    }

    #[test]
    fn command_and_data_framing() {
        let mut buf = Box::new([0u8; FRAME_BYTES]);
        let (mut driver, log) = display(&mut buf);

        driver
            .set_window(Window::new(0x0102, 0x0003, 0x0130, 0x00F0))
            .unwrap();

        let log = log.borrow();
        // CASET, 4 data bytes, RASET, 4 data bytes, RAMWR
        assert_eq!(log.len(), 5);
        assert_eq!(log[0], (false, std::vec![0x2A]));
        assert_eq!(log[1], (true, std::vec![0x01, 0x02, 0x01, 0x2F]));
        assert_eq!(log[2], (false, std::vec![0x2B]));
        assert_eq!(log[3], (true, std::vec![0x00, 0x03, 0x00, 0xEF]));
        assert_eq!(log[4], (false, std::vec![0x2C]));
    }

    #[test]
    fn flush_window_streams_only_the_window_rows() {
        let mut buf = patterned_buffer();
        let expected = *buf;
        let (mut driver, log) = display(&mut buf);

        driver.flush_window(Window::new(4, 2, 8, 5)).unwrap();

        let log = log.borrow();
        // Normalized window: x 4..9, y 2..6 (one-pixel extension on both ends)
        assert_eq!(log[1].1, std::vec![0x00, 0x04, 0x00, 0x08]);
        assert_eq!(log[3].1, std::vec![0x00, 0x02, 0x00, 0x05]);

        let rows: Vec<&(bool, Vec<u8>)> = log.iter().skip(5).collect();
        assert_eq!(rows.len(), 4);
        let stride = PANEL_WIDTH as usize * 2;
        for (i, row) in rows.iter().enumerate() {
            let y = 2 + i;
            let start = y * stride + 4 * 2;
            assert!(row.0, "pixel stream must go out in data mode");
            assert_eq!(row.1.as_slice(), &expected[start..start + 5 * 2]);
        }
    }

    #[test]
    fn flush_window_normalizes_reversed_corners() {
        let mut buf = patterned_buffer();
        let (mut driver, log) = display(&mut buf);

        driver.flush_window(Window::new(8, 5, 4, 2)).unwrap();

        let log = log.borrow();
        // Same wire traffic as the forward-ordered window
        assert_eq!(log[1].1, std::vec![0x00, 0x04, 0x00, 0x08]);
        assert_eq!(log[3].1, std::vec![0x00, 0x02, 0x00, 0x05]);
        assert_eq!(log.len(), 5 + 4);
    }

    #[test]
    fn flush_streams_whole_buffer() {
        let mut buf = patterned_buffer();
        let expected = *buf;
        let (mut driver, log) = display(&mut buf);

        driver.flush().unwrap();

        let log = log.borrow();
        // CASET covers the full panel, end values inclusive
        assert_eq!(log[1].1, std::vec![0x00, 0x00, 0x01, 0x3F]);
        assert_eq!(log[3].1, std::vec![0x00, 0x00, 0x00, 0xEF]);
        assert!(log[5].0);
        assert_eq!(log[5].1.len(), FRAME_BYTES);
        assert_eq!(log[5].1.as_slice(), expected.as_slice());
    }
}
