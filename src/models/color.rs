//! 16-bit non-premultiplied RGBA colors.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Full range of a 16-bit channel.
pub const COLOR_RANGE: u16 = u16::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color16 {
    pub r: u16,
    pub g: u16,
    pub b: u16,
    pub a: u16,
}

impl Color16 {
    pub const WHITE: Color16 = Color16::opaque(COLOR_RANGE, COLOR_RANGE, COLOR_RANGE);
    pub const BLACK: Color16 = Color16::opaque(0, 0, 0);

    pub const fn new(r: u16, g: u16, b: u16, a: u16) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u16, g: u16, b: u16) -> Self {
        Self::new(r, g, b, COLOR_RANGE)
    }

    /// Widen 8-bit channels by replication (`0xab` becomes `0xabab`).
    pub const fn from_rgba8(rgba: [u8; 4]) -> Self {
        Self::new(
            widen(rgba[0]),
            widen(rgba[1]),
            widen(rgba[2]),
            widen(rgba[3]),
        )
    }

    pub const fn gray(value: u16) -> Self {
        Self::opaque(value, value, value)
    }

    pub fn is_opaque(&self) -> bool {
        self.a == COLOR_RANGE
    }

    /// Channels multiplied by alpha, as `[r, g, b, a]`.
    pub fn premultiplied(&self) -> [u16; 4] {
        let a = self.a as u32;
        let scale = |c: u16| ((c as u32 * a + COLOR_RANGE as u32 / 2) / COLOR_RANGE as u32) as u16;
        [scale(self.r), scale(self.g), scale(self.b), self.a]
    }

    /// `#rrggbb`, alpha dropped.
    pub fn to_hex(&self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            self.r >> 8,
            self.g >> 8,
            self.b >> 8
        )
    }
}

const fn widen(c: u8) -> u16 {
    (c as u16) << 8 | c as u16
}

impl FromStr for Color16 {
    type Err = ConfigError;

    /// Accepts `#rrggbb` (either case) and the names `white` and `black`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "white" => return Ok(Color16::WHITE),
            "black" => return Ok(Color16::BLACK),
            _ => {}
        }

        let hex = trimmed
            .strip_prefix('#')
            .filter(|h| h.len() == 6 && h.is_ascii())
            .ok_or_else(|| ConfigError::Color(s.to_string()))?;
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ConfigError::Color(s.to_string()))
        };
        Ok(Color16::from_rgba8([
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
            u8::MAX,
        ]))
    }
}

impl fmt::Display for Color16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
