//! RGB lighting effect identifiers and their display names.

use crate::error::{Error, Result};
use std::fmt;

/// Lighting effect selector as stored at the effect-id byte of the config image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RgbEffect {
    Off = 0x00,
    Glorious = 0x01,
    Single = 0x02,
    Breathing7 = 0x03,
    Tail = 0x04,
    /// Full-spectrum breathing. Shares no mode byte of its own.
    Breathing = 0x05,
    Rave = 0x07,
    Wave = 0x09,
    Breathing1 = 0x0A,
}

impl RgbEffect {
    /// All selectable effects, in table order.
    pub const ALL: &'static [RgbEffect] = &[
        RgbEffect::Off,
        RgbEffect::Glorious,
        RgbEffect::Single,
        RgbEffect::Breathing,
        RgbEffect::Breathing7,
        RgbEffect::Breathing1,
        RgbEffect::Tail,
        RgbEffect::Rave,
        RgbEffect::Wave,
    ];

    /// Look up an effect from its wire id.
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|e| e.id() == id)
    }

    /// Wire id.
    pub fn id(&self) -> u8 {
        *self as u8
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Glorious => "Glorious Mode",
            Self::Single => "Single Color",
            Self::Breathing => "RGB Breathing",
            Self::Breathing7 => "Seven-color Breathing",
            Self::Breathing1 => "Single color Breathing",
            Self::Tail => "Tail Effect",
            Self::Rave => "Two-color Rave",
            Self::Wave => "Wave Effect",
        }
    }

    /// Parse an effect from its display name or a CLI-friendly alias.
    ///
    /// Matching is case-insensitive:
    /// - "Single Color", "single" → Single
    /// - "Seven-color Breathing", "breathing7" → Breathing7
    /// - "Single color Breathing", "breathing1" → Breathing1
    pub fn from_name(name: &str) -> Result<Self> {
        let lower = name.trim().to_lowercase();
        if let Some(effect) = Self::ALL
            .iter()
            .copied()
            .find(|e| e.name().to_lowercase() == lower)
        {
            return Ok(effect);
        }
        match lower.as_str() {
            "off" | "none" => Ok(Self::Off),
            "glorious" => Ok(Self::Glorious),
            "single" | "static" => Ok(Self::Single),
            "breathing" | "rgb-breathing" => Ok(Self::Breathing),
            "breathing7" | "seven-color-breathing" => Ok(Self::Breathing7),
            "breathing1" | "single-color-breathing" => Ok(Self::Breathing1),
            "tail" => Ok(Self::Tail),
            "rave" => Ok(Self::Rave),
            "wave" => Ok(Self::Wave),
            _ => Err(Error::UnknownEffect(name.to_string())),
        }
    }

    /// Whether the config image carries a dedicated mode byte for this effect.
    pub fn has_mode_byte(&self) -> bool {
        !matches!(self, Self::Off | Self::Breathing)
    }

    /// Whether the brightness nibble of the mode byte is honoured.
    pub fn supports_brightness(&self) -> bool {
        self.has_mode_byte() && !matches!(self, Self::Glorious)
    }
}

impl fmt::Display for RgbEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
