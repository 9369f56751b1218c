//! CST328 capacitive touch controller driver
//!
//! The controller is an I2C register device with 16-bit register
//! addresses, transmitted high byte first. Construction performs the
//! device handshake and fails closed: if the identity word read in debug
//! mode does not match, no driver value exists and nothing downstream can
//! poll a bus with the wrong device on it.
//!
//! Reports are pulled, not pushed: the controller lowers its interrupt
//! line when a report is ready and the owner calls
//! [`Cst328::read_frame`] in response. The driver itself never touches
//! the interrupt line.

use embedded_hal::delay::DelayNs;
use gridkey_hal::{I2cBus, OutputPin};

use gridkey_core::touch::{TouchFrame, TouchPoint, MAX_POINTS};

/// Register map
mod reg {
    /// Switch to debug mode; identity registers are readable here
    pub const ENTER_DEBUG_MODE: u16 = 0xD101;
    /// Switch to normal reporting mode
    pub const ENTER_NORMAL_MODE: u16 = 0xD109;
    /// Debug-mode info block (TX/RX channel counts onward)
    pub const INFO_NTX: u16 = 0xD1F4;
    /// Debug-mode sensor resolution, two little-endian u16 values
    pub const INFO_RES: u16 = 0xD1F8;
    /// Debug-mode firmware boot time
    pub const INFO_BOOT_TIME: u16 = 0xD1FC;
    /// Active touch count, low nibble
    pub const TOUCH_COUNT: u16 = 0xD005;
    /// Start of the touch report block
    pub const TOUCH_DATA: u16 = 0xD000;
}

/// Default 7-bit bus address
pub const DEFAULT_ADDRESS: u8 = 0x1A;

/// Identity word expected at [`MAGIC_OFFSET`] in the debug info block
const HANDSHAKE_MAGIC: u16 = 0xCACA;

/// Little-endian offset of the identity word within the info block
const MAGIC_OFFSET: usize = 10;

/// Debug-mode info block length in bytes
const INFO_BLOCK_LEN: usize = 24;

/// Boot-time / resolution block length in bytes
const DIAG_BLOCK_LEN: usize = 4;

/// Touch report block length in bytes, enough for five points
const TOUCH_BLOCK_LEN: usize = 27;

/// Bytes per point within the report block
const POINT_STRIDE: usize = 5;

/// The second and later points sit past a two-byte gap (the count and
/// status bytes interleaved into the block)
const POINT_GAP: usize = 2;

/// Attempts for the count-register read before giving up
const COUNT_READ_RETRIES: u32 = 3;

/// Pause between count-register read attempts, in microseconds
const RETRY_DELAY_US: u32 = 200;

/// Touch driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Cst328Error<E> {
    /// The device at the address did not present the expected identity
    Mismatch,
    /// Underlying bus failure
    Bus(E),
}

impl<E> From<E> for Cst328Error<E> {
    fn from(err: E) -> Self {
        Self::Bus(err)
    }
}

/// CST328 touch controller
pub struct Cst328<I2C, RST, D> {
    i2c: I2C,
    rst: RST,
    delay: D,
    address: u8,
    res_x: u16,
    res_y: u16,
}

impl<I2C, RST, D> Cst328<I2C, RST, D>
where
    I2C: I2cBus,
    RST: OutputPin,
    D: DelayNs,
{
    /// Reset the controller and verify its identity
    ///
    /// Fails closed: on an identity mismatch the driver value is never
    /// constructed. The controller is left in normal reporting mode on
    /// every path that got far enough to change its mode.
    pub fn new(
        i2c: I2C,
        rst: RST,
        delay: D,
        address: u8,
    ) -> Result<Self, Cst328Error<I2C::Error>> {
        let mut dev = Self {
            i2c,
            rst,
            delay,
            address,
            res_x: 0,
            res_y: 0,
        };
        dev.reset();
        dev.handshake()?;
        Ok(dev)
    }

    /// Sensor resolution reported during the handshake
    pub fn resolution(&self) -> (u16, u16) {
        (self.res_x, self.res_y)
    }

    /// Hardware reset pulse; the controller needs time to boot afterwards
    fn reset(&mut self) {
        self.rst.set_low();
        self.delay.delay_ms(1);
        self.rst.set_high();
        self.delay.delay_ms(50);
    }

    fn handshake(&mut self) -> Result<(), Cst328Error<I2C::Error>> {
        self.write_register(reg::ENTER_DEBUG_MODE, &[])?;

        let probed = self.probe_identity();

        // Leave debug mode before inspecting the result, so the device is
        // back in reporting mode even when a read failed or the identity
        // is wrong
        self.write_register(reg::ENTER_NORMAL_MODE, &[])?;

        if probed? != HANDSHAKE_MAGIC {
            return Err(Cst328Error::Mismatch);
        }
        Ok(())
    }

    /// Read the debug-mode diagnostic blocks and the identity word
    fn probe_identity(&mut self) -> Result<u16, I2C::Error> {
        let mut boot = [0u8; DIAG_BLOCK_LEN];
        self.read_register(reg::INFO_BOOT_TIME, &mut boot)?;

        let mut res = [0u8; DIAG_BLOCK_LEN];
        self.read_register(reg::INFO_RES, &mut res)?;
        self.res_x = u16::from(res[0]) | (u16::from(res[1]) << 8);
        self.res_y = u16::from(res[2]) | (u16::from(res[3]) << 8);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "cst328: boot time {}, sensor resolution {}x{}",
            boot,
            self.res_x,
            self.res_y
        );
        #[cfg(not(feature = "defmt"))]
        let _ = boot;

        let mut info = [0u8; INFO_BLOCK_LEN];
        self.read_register(reg::INFO_NTX, &mut info)?;
        Ok(u16::from(info[MAGIC_OFFSET]) | (u16::from(info[MAGIC_OFFSET + 1]) << 8))
    }

    /// Read one touch report
    ///
    /// Reads the count register (with a short bounded retry, the
    /// controller occasionally NAKs right after raising its interrupt),
    /// then the report block for the active points. The count register is
    /// cleared on every path so the controller can signal the next
    /// report.
    pub fn read_frame(&mut self) -> Result<TouchFrame, Cst328Error<I2C::Error>> {
        let mut count = [0u8];
        let mut attempt = 0;
        loop {
            match self.read_register(reg::TOUCH_COUNT, &mut count) {
                Ok(()) => break,
                Err(err) => {
                    attempt += 1;
                    if attempt >= COUNT_READ_RETRIES {
                        return Err(Cst328Error::Bus(err));
                    }
                    self.delay.delay_us(RETRY_DELAY_US);
                }
            }
        }

        let count = usize::from(count[0] & 0x0F);
        if count == 0 || count > MAX_POINTS {
            // Idle, or a garbage count from a report caught mid-update;
            // either way acknowledge and report no contact
            self.acknowledge()?;
            return Ok(TouchFrame::empty());
        }

        let mut block = [0u8; TOUCH_BLOCK_LEN];
        self.read_register(reg::TOUCH_DATA, &mut block)?;
        self.acknowledge()?;

        Ok(decode_points(&block, count))
    }

    /// Clear the count register, releasing the current report
    fn acknowledge(&mut self) -> Result<(), I2C::Error> {
        self.write_register(reg::TOUCH_COUNT, &[0x00])
    }

    fn write_register(&mut self, register: u16, data: &[u8]) -> Result<(), I2C::Error> {
        let mut buf = [0u8; 2 + 4];
        buf[0] = (register >> 8) as u8;
        buf[1] = register as u8;
        buf[2..2 + data.len()].copy_from_slice(data);
        self.i2c.write(self.address, &buf[..2 + data.len()])
    }

    fn read_register(&mut self, register: u16, buf: &mut [u8]) -> Result<(), I2C::Error> {
        let pointer = [(register >> 8) as u8, register as u8];
        self.i2c.write_read(self.address, &pointer, buf)
    }
}

/// Decode `count` points out of a touch report block
///
/// Each point occupies five bytes; points after the first are shifted by
/// a further two bytes of interleaved status. Coordinates are 12-bit,
/// split across a whole byte of high bits and one nibble of the shared
/// low byte: the X low nibble sits in the high half, the Y low nibble in
/// the low half.
fn decode_points(block: &[u8; TOUCH_BLOCK_LEN], count: usize) -> TouchFrame {
    let mut points = [TouchPoint::ZERO; MAX_POINTS];
    let count = count.min(MAX_POINTS);
    for (i, point) in points.iter_mut().take(count).enumerate() {
        let o = i * POINT_STRIDE + if i > 0 { POINT_GAP } else { 0 };
        point.x = (u16::from(block[o + 1]) << 4) | u16::from(block[o + 3] >> 4);
        point.y = (u16::from(block[o + 2]) << 4) | u16::from(block[o + 3] & 0x0F);
        point.strength = block[o + 4];
    }
    TouchFrame::from_points(&points[..count])
}
