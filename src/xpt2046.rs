//! XPT2046 resistive touch controller.
//!
//! Each channel is read with one 24-bit transfer: the command byte goes out
//! first and the 12-bit conversion comes back left-aligned in the next two
//! bytes. A sample only counts when the Z1 pressure reading clears
//! [`Calibration::pressure_threshold`].

use embedded_graphics::prelude::Size;
use embedded_hal::spi::SpiDevice;

use crate::touch::PointerSampler;

const CMD_X: u8 = 0xD0;
const CMD_Y: u8 = 0x90;
const CMD_Z1: u8 = 0xB0;

/// One unscaled reading of all three channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    pub x: u16,
    pub y: u16,
    pub z1: u16,
}

/// Linear map from ADC counts to screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calibration {
    pub x_min: u16,
    pub x_max: u16,
    pub y_min: u16,
    pub y_max: u16,
    /// Panel is portrait, the screen landscape: ADC X feeds screen Y.
    pub swap_xy: bool,
    pub pressure_threshold: u16,
}

impl Calibration {
    pub const DEFAULT: Self = Self {
        x_min: 300,
        x_max: 3900,
        y_min: 300,
        y_max: 3900,
        swap_xy: true,
        pressure_threshold: 200,
    };

    /// Scale a raw reading into `[0, dim - 1]` on each screen axis.
    pub fn map(&self, raw: RawSample, screen: Size) -> (u16, u16) {
        let (sx, sy) = if self.swap_xy { (raw.y, raw.x) } else { (raw.x, raw.y) };
        let (x_range, y_range) = if self.swap_xy {
            ((self.y_min, self.y_max), (self.x_min, self.x_max))
        } else {
            ((self.x_min, self.x_max), (self.y_min, self.y_max))
        };
        (scale(sx, x_range, screen.width), scale(sy, y_range, screen.height))
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn scale(value: u16, (lo, hi): (u16, u16), dim: u32) -> u16 {
    if hi <= lo || dim == 0 {
        return 0;
    }
    let v = u32::from(value.clamp(lo, hi) - lo);
    let span = u32::from(hi - lo);
    (v * (dim - 1) / span) as u16
}

pub struct Xpt2046<SPI> {
    spi: SPI,
    calibration: Calibration,
    screen: Size,
}

impl<SPI: SpiDevice> Xpt2046<SPI> {
    pub const fn new(spi: SPI, calibration: Calibration, screen: Size) -> Self {
        Self {
            spi,
            calibration,
            screen,
        }
    }

    fn read_channel(&mut self, cmd: u8) -> Result<u16, SPI::Error> {
        let mut buf = [cmd, 0, 0];
        self.spi.transfer_in_place(&mut buf)?;
        let raw = (u16::from(buf[1]) << 8) | u16::from(buf[2]);
        Ok((raw >> 3) & 0x0FFF)
    }

    pub fn read_raw(&mut self) -> Result<RawSample, SPI::Error> {
        Ok(RawSample {
            x: self.read_channel(CMD_X)?,
            y: self.read_channel(CMD_Y)?,
            z1: self.read_channel(CMD_Z1)?,
        })
    }

    /// Whether the controller answers on the bus at all.
    pub fn probe(&mut self) -> bool {
        match self.read_raw() {
            Ok(raw) => {
                info!("touch: controller answered, x={} y={} z1={}", raw.x, raw.y, raw.z1);
                true
            }
            Err(_) => {
                warn!("touch: controller not responding, continuing without touch");
                false
            }
        }
    }
}

impl<SPI: SpiDevice> PointerSampler for Xpt2046<SPI> {
    fn try_sample(&mut self) -> Option<(u16, u16)> {
        match self.read_raw() {
            Ok(raw) if raw.z1 >= self.calibration.pressure_threshold => {
                Some(self.calibration.map(raw, self.screen))
            }
            Ok(_) => None,
            Err(_) => {
                warn!("touch: SPI read failed");
                None
            }
        }
    }
}
