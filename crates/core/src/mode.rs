//! Nibble-packed registers: effect mode bytes and the DPI count/active byte.
//!
//! Both registers split one byte into a high and a low nibble. Values read
//! from the device are passed through unchanged; range checks belong to the
//! setters in [`crate::config`].


/// Highest brightness level accepted by the firmware.
pub const BRIGHTNESS_MAX: u8 = 4;
/// Highest animation speed accepted by the firmware.
pub const SPEED_MAX: u8 = 3;

/// A byte split into `high` (bits 7:4) and `low` (bits 3:0).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NibblePair {
    pub high: u8,
    pub low: u8,
}

impl NibblePair {
    pub fn unpack(byte: u8) -> Self {
        Self {
            high: byte >> 4,
            low: byte & 0x0F,
        }
    }

    pub fn pack(self) -> u8 {
        (self.high << 4) | (self.low & 0x0F)
    }
}

/// Brightness/speed pair stored in a lighting effect's mode byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectMode {
    pub brightness: u8,
    pub speed: u8,
}

impl EffectMode {
    pub fn new(brightness: u8, speed: u8) -> Self {
        Self { brightness, speed }
    }

    /// `(brightness << 4) | speed`.
    pub fn pack(self) -> u8 {
        NibblePair {
            high: self.brightness,
            low: self.speed,
        }
        .pack()
    }

    pub fn unpack(byte: u8) -> Self {
        let n = NibblePair::unpack(byte);
        Self {
            brightness: n.high,
            speed: n.low,
        }
    }
}

/// Active DPI profile (high nibble) and profile count (low nibble).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DpiSelector {
    pub active: u8,
    pub count: u8,
}

impl DpiSelector {
    pub fn unpack(byte: u8) -> Self {
        let n = NibblePair::unpack(byte);
        Self {
            active: n.high,
            count: n.low,
        }
    }

    pub fn pack(self) -> u8 {
        NibblePair {
            high: self.active,
            low: self.count,
        }
        .pack()
    }
}
