//! Three-channel color value as stored in the config image.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Width of one color group on the wire (R, G, B).
pub const RGB8_LEN: usize = 3;

/// An 8-bit-per-channel RGB color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Rgb8 = Rgb8::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Wire order is R, G, B with no padding.
    pub fn to_bytes(self) -> [u8; RGB8_LEN] {
        [self.r, self.g, self.b]
    }

    pub fn from_bytes(bytes: [u8; RGB8_LEN]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Parses `rrggbb` or `#rrggbb`.
impl FromStr for Rgb8 {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(format!("invalid color '{s}', expected rrggbb"));
        }
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| format!("invalid color '{s}', expected rrggbb"))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_are_rgb_order() {
        let c = Rgb8::new(0x12, 0x34, 0x56);
        assert_eq!(c.to_bytes(), [0x12, 0x34, 0x56]);
        assert_eq!(Rgb8::from_bytes([0x12, 0x34, 0x56]), c);
    }

    #[test]
    fn parse_hex_with_and_without_hash() {
        assert_eq!("ff8000".parse::<Rgb8>().unwrap(), Rgb8::new(0xff, 0x80, 0x00));
        assert_eq!("#00FF7f".parse::<Rgb8>().unwrap(), Rgb8::new(0x00, 0xff, 0x7f));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("fff".parse::<Rgb8>().is_err());
        assert!("gg0000".parse::<Rgb8>().is_err());
        assert!("".parse::<Rgb8>().is_err());
    }

    #[test]
    fn display_is_lower_hex() {
        assert_eq!(Rgb8::new(0xAB, 0x01, 0xFF).to_string(), "#ab01ff");
    }
}
