//! Safety layer: validates all caller-supplied values against the ranges the
//! firmware accepts before they reach the config model or the device.
//!
//! # Bounds
//!
//! ## DPI
//! - **Range**: 200 – 25,600 DPI
//! - **Step size**: 100 DPI; stored as `dpi / 100 - 1`, truncated
//! - **Profiles**: 1 – 6 selectable presets (the image has room for 16 codes)
//!
//! ## Lighting
//! - **Brightness**: 0 – 4 (high nibble of the mode byte)
//! - **Speed**: 0 – 3 (low nibble of the mode byte)
//! - **Seven-color breathing**: 1 – 7 colors
//!
//! ## Debounce
//! - Sent as `ms / 2` in one byte, so 0 – 510 ms. Odd values round down.
//!
//! ## Invariants
//! 1. Validation happens BEFORE any mutation or HID communication
//! 2. A rejected value leaves the config model untouched

use crate::error::{Error, Result};
use crate::mode::{BRIGHTNESS_MAX, SPEED_MAX};

/// Writing the whole settings block carries risk; include in user-facing output.
pub const WRITE_DISCLAIMER: &str = "\
WARNING: This software rewrites the mouse's entire onboard settings block. \
Only the layout of SinoWealth-based Glorious mice is supported; other firmware \
layouts may be corrupted. Use at your own risk.";

/// Number of selectable DPI profiles.
pub const PROFILE_MIN: u8 = 1;
pub const PROFILE_MAX: u8 = 6;

/// DPI constraints.
pub const DPI_MIN: u32 = 200;
pub const DPI_MAX: u32 = 25600;
pub const DPI_STEP: u32 = 100;

/// Number of colors the seven-color breathing effect can hold.
pub const BREATHING7_COLORS_MAX: usize = 7;

/// Debounce constraints (milliseconds).
pub const DEBOUNCE_MAX_MS: u16 = 510;

/// Validate a 1-based DPI profile index.
pub fn validate_profile(profile: u8) -> Result<u8> {
    if !(PROFILE_MIN..=PROFILE_MAX).contains(&profile) {
        return Err(Error::OutOfRange {
            field: "profile",
            value: profile as u32,
            min: PROFILE_MIN as u32,
            max: PROFILE_MAX as u32,
        });
    }
    Ok(profile)
}

/// Validate a DPI value and return its raw code (`dpi / 100 - 1`).
pub fn dpi_to_raw(dpi: u32) -> Result<u8> {
    if !(DPI_MIN..=DPI_MAX).contains(&dpi) {
        return Err(Error::OutOfRange {
            field: "dpi",
            value: dpi,
            min: DPI_MIN,
            max: DPI_MAX,
        });
    }
    // In range, so the code is 1..=255
    Ok((dpi / DPI_STEP - 1) as u8)
}

/// Effective DPI for a raw code.
pub fn raw_to_dpi(raw: u8) -> u32 {
    (u32::from(raw) + 1) * DPI_STEP
}

pub fn validate_brightness(level: u8) -> Result<u8> {
    if level > BRIGHTNESS_MAX {
        return Err(Error::OutOfRange {
            field: "brightness",
            value: level as u32,
            min: 0,
            max: BRIGHTNESS_MAX as u32,
        });
    }
    Ok(level)
}

pub fn validate_speed(level: u8) -> Result<u8> {
    if level > SPEED_MAX {
        return Err(Error::OutOfRange {
            field: "speed",
            value: level as u32,
            min: 0,
            max: SPEED_MAX as u32,
        });
    }
    Ok(level)
}

pub fn validate_breathing7_count(count: usize) -> Result<u8> {
    if !(1..=BREATHING7_COLORS_MAX).contains(&count) {
        return Err(Error::OutOfRange {
            field: "breathing7_colors",
            value: count as u32,
            min: 1,
            max: BREATHING7_COLORS_MAX as u32,
        });
    }
    Ok(count as u8)
}

pub fn validate_debounce(ms: u16) -> Result<u16> {
    if ms > DEBOUNCE_MAX_MS {
        return Err(Error::OutOfRange {
            field: "debounce_ms",
            value: ms as u32,
            min: 0,
            max: DEBOUNCE_MAX_MS as u32,
        });
    }
    Ok(ms)
}
