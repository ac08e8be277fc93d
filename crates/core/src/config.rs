//! In-memory model of the mouse's onboard settings block.
//!
//! A [`MouseConfig`] is produced by [`crate::codec::decode`] from a device read,
//! mutated through the validated setters below, and turned back into a wire
//! image by [`crate::codec::encode`] before a write. Every setter validates
//! first and mutates second, so a rejected call leaves the model untouched.

use crate::effect::RgbEffect;
use crate::error::{Error, Result};
use crate::mode::EffectMode;
use crate::rgb::Rgb8;
use crate::safety;
use serde::Serialize;

/// DPI code slots in the image (only the first six are selectable).
pub const DPI_SLOTS: usize = 16;
/// DPI colors in the image (one per profile for the first eight).
pub const DPI_COLOR_SLOTS: usize = 8;
/// Colors held by the seven-color breathing effect.
pub const BREATHING7_SLOTS: usize = 7;
/// Colors held by the two-color rave effect.
pub const RAVE_SLOTS: usize = 2;
/// Width of the reserved block after the control bytes.
pub const RESERVED_HEADER_LEN: usize = 6;
/// Width of the reserved block between the tail and rave sections.
pub const RESERVED_LIGHTING_LEN: usize = 33;

/// Full settings snapshot, one field per named region of the config image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MouseConfig {
    pub(crate) report_id: u8,
    pub(crate) command_id: u8,
    pub(crate) unknown1: u8,
    pub(crate) config_write_len: u8,
    #[serde(skip)]
    pub(crate) reserved_header: [u8; RESERVED_HEADER_LEN],
    pub(crate) config1: u8,

    pub(crate) active_profile: u8,
    pub(crate) profile_count: u8,
    pub(crate) dpi_enabled_mask: u8,
    pub(crate) dpi_codes: [u8; DPI_SLOTS],
    pub(crate) dpi_colors: [Rgb8; DPI_COLOR_SLOTS],

    pub(crate) effect_id: u8,
    pub(crate) glorious_mode: u8,
    pub(crate) glorious_direction: u8,
    pub(crate) single_mode: u8,
    pub(crate) single_color: Rgb8,
    pub(crate) breathing7_mode: u8,
    pub(crate) breathing7_color_count: u8,
    pub(crate) breathing7_colors: [Rgb8; BREATHING7_SLOTS],
    pub(crate) tail_mode: u8,
    #[serde(skip)]
    pub(crate) reserved_lighting: [u8; RESERVED_LIGHTING_LEN],
    pub(crate) rave_mode: u8,
    pub(crate) rave_colors: [Rgb8; RAVE_SLOTS],
    pub(crate) wave_mode: u8,
    pub(crate) breathing1_mode: u8,
    pub(crate) breathing1_color: Rgb8,

    pub(crate) unknown5: u8,
    pub(crate) liftoff_distance: u8,
}

impl Default for MouseConfig {
    fn default() -> Self {
        Self {
            report_id: crate::protocol::REPORT_ID_CONFIG,
            command_id: 0,
            unknown1: 0,
            config_write_len: 0,
            reserved_header: [0; RESERVED_HEADER_LEN],
            config1: 0,
            active_profile: 0,
            profile_count: 0,
            dpi_enabled_mask: 0,
            dpi_codes: [0; DPI_SLOTS],
            dpi_colors: [Rgb8::BLACK; DPI_COLOR_SLOTS],
            effect_id: RgbEffect::Off.id(),
            glorious_mode: 0,
            glorious_direction: 0,
            single_mode: 0,
            single_color: Rgb8::BLACK,
            breathing7_mode: 0,
            breathing7_color_count: 0,
            breathing7_colors: [Rgb8::BLACK; BREATHING7_SLOTS],
            tail_mode: 0,
            reserved_lighting: [0; RESERVED_LIGHTING_LEN],
            rave_mode: 0,
            rave_colors: [Rgb8::BLACK; RAVE_SLOTS],
            wave_mode: 0,
            breathing1_mode: 0,
            breathing1_color: Rgb8::BLACK,
            unknown5: 0,
            liftoff_distance: 0,
        }
    }
}

impl MouseConfig {
    pub fn report_id(&self) -> u8 {
        self.report_id
    }

    pub fn command_id(&self) -> u8 {
        self.command_id
    }

    pub fn config_write_len(&self) -> u8 {
        self.config_write_len
    }

    pub(crate) fn set_config_write_len(&mut self, len: u8) {
        self.config_write_len = len;
    }

    // ---- DPI section ----

    /// Active DPI profile, 1-based.
    pub fn active_profile(&self) -> u8 {
        self.active_profile
    }

    pub fn profile_count(&self) -> u8 {
        self.profile_count
    }

    pub fn set_active_profile(&mut self, profile: u8) -> Result<()> {
        self.active_profile = safety::validate_profile(profile)?;
        Ok(())
    }

    /// Raw DPI code for a 1-based profile.
    pub fn dpi_code(&self, profile: u8) -> Result<u8> {
        let idx = profile_index(profile)?;
        Ok(self.dpi_codes[idx])
    }

    /// Effective DPI for a 1-based profile.
    pub fn dpi(&self, profile: u8) -> Result<u32> {
        Ok(safety::raw_to_dpi(self.dpi_code(profile)?))
    }

    /// All sixteen raw DPI codes, as stored.
    pub fn dpi_codes(&self) -> &[u8; DPI_SLOTS] {
        &self.dpi_codes
    }

    /// Store `dpi / 100 - 1` (truncated) in the profile's slot.
    pub fn set_dpi(&mut self, profile: u8, dpi: u32) -> Result<()> {
        let idx = profile_index(profile)?;
        let raw = safety::dpi_to_raw(dpi)?;
        self.dpi_codes[idx] = raw;
        Ok(())
    }

    pub fn dpi_enabled_mask(&self) -> u8 {
        self.dpi_enabled_mask
    }

    /// Whether bit `profile - 1` of the enable mask is set.
    pub fn dpi_enabled(&self, profile: u8) -> Result<bool> {
        let idx = profile_index(profile)?;
        Ok(self.dpi_enabled_mask & (1u8 << idx) != 0)
    }

    pub fn set_dpi_enabled(&mut self, profile: u8, enabled: bool) -> Result<()> {
        let bit = 1u8 << profile_index(profile)?;
        if enabled {
            self.dpi_enabled_mask |= bit;
        } else {
            self.dpi_enabled_mask &= !bit;
        }
        Ok(())
    }

    pub fn dpi_color(&self, profile: u8) -> Result<Rgb8> {
        let idx = profile_index(profile)?;
        Ok(self.dpi_colors[idx])
    }

    pub fn set_dpi_color(&mut self, profile: u8, color: Rgb8) -> Result<()> {
        let idx = profile_index(profile)?;
        self.dpi_colors[idx] = color;
        Ok(())
    }

    // ---- Lighting section ----

    /// Raw effect id, kept verbatim even when outside the effect table.
    pub fn effect_id(&self) -> u8 {
        self.effect_id
    }

    pub fn effect(&self) -> Option<RgbEffect> {
        RgbEffect::from_id(self.effect_id)
    }

    pub fn set_effect(&mut self, effect: RgbEffect) {
        self.effect_id = effect.id();
    }

    /// Brightness and speed stored in an effect's mode byte.
    pub fn get_mode(&self, effect: RgbEffect) -> Result<EffectMode> {
        self.mode_byte(effect)
            .map(EffectMode::unpack)
            .ok_or_else(|| unsupported("get mode", effect))
    }

    /// Overwrite an effect's mode byte.
    ///
    /// Effects without a mode byte are rejected, matching [`Self::get_mode`].
    pub fn set_mode(&mut self, effect: RgbEffect, brightness: u8, speed: u8) -> Result<()> {
        let brightness = safety::validate_brightness(brightness)?;
        let speed = safety::validate_speed(speed)?;
        self.store_mode(effect, EffectMode::new(brightness, speed), "set mode")
    }

    /// Change the brightness of the current effect, keeping its speed.
    pub fn set_brightness(&mut self, level: u8) -> Result<()> {
        let level = safety::validate_brightness(level)?;
        let effect = self.current_effect("set brightness")?;
        if !effect.supports_brightness() {
            return Err(unsupported("set brightness", effect));
        }
        let mode = self.get_mode(effect)?;
        self.store_mode(effect, EffectMode::new(level, mode.speed), "set brightness")
    }

    /// Change the speed of the current effect, keeping its brightness.
    pub fn set_speed(&mut self, level: u8) -> Result<()> {
        let level = safety::validate_speed(level)?;
        let effect = self.current_effect("set speed")?;
        let mode = self.get_mode(effect)?;
        self.store_mode(effect, EffectMode::new(mode.brightness, level), "set speed")
    }

    pub fn glorious_direction(&self) -> u8 {
        self.glorious_direction
    }

    pub fn set_glorious_direction(&mut self, direction: u8) {
        self.glorious_direction = direction;
    }

    pub fn single_color(&self) -> Rgb8 {
        self.single_color
    }

    pub fn set_single_color(&mut self, color: Rgb8) {
        self.single_color = color;
    }

    pub fn breathing1_color(&self) -> Rgb8 {
        self.breathing1_color
    }

    pub fn set_breathing1_color(&mut self, color: Rgb8) {
        self.breathing1_color = color;
    }

    /// The colors currently in rotation (at most seven).
    pub fn breathing7_colors(&self) -> &[Rgb8] {
        let count = usize::from(self.breathing7_color_count).min(BREATHING7_SLOTS);
        &self.breathing7_colors[..count]
    }

    /// Replace the rotation; unused slots are cleared.
    pub fn set_breathing7_colors(&mut self, colors: &[Rgb8]) -> Result<()> {
        let count = safety::validate_breathing7_count(colors.len())?;
        let mut slots = [Rgb8::BLACK; BREATHING7_SLOTS];
        slots[..colors.len()].copy_from_slice(colors);
        self.breathing7_colors = slots;
        self.breathing7_color_count = count;
        Ok(())
    }

    pub fn rave_colors(&self) -> [Rgb8; RAVE_SLOTS] {
        self.rave_colors
    }

    pub fn set_rave_colors(&mut self, colors: [Rgb8; RAVE_SLOTS]) {
        self.rave_colors = colors;
    }

    /// Route a color list to the given effect's color fields.
    pub fn set_effect_colors(&mut self, effect: RgbEffect, colors: &[Rgb8]) -> Result<()> {
        match (effect, colors) {
            (RgbEffect::Single, [c]) => self.set_single_color(*c),
            (RgbEffect::Breathing1, [c]) => self.set_breathing1_color(*c),
            (RgbEffect::Rave, [a, b]) => self.set_rave_colors([*a, *b]),
            (RgbEffect::Breathing7, _) => self.set_breathing7_colors(colors)?,
            (RgbEffect::Single | RgbEffect::Breathing1, _) => {
                return Err(color_count(colors.len(), 1, 1));
            }
            (RgbEffect::Rave, _) => return Err(color_count(colors.len(), 2, 2)),
            _ => return Err(unsupported("set colors", effect)),
        }
        Ok(())
    }

    // ---- Misc ----

    pub fn liftoff_distance(&self) -> u8 {
        self.liftoff_distance
    }

    pub fn set_liftoff_distance(&mut self, distance: u8) {
        self.liftoff_distance = distance;
    }

    /// Pretty JSON rendering for display.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialize(e.to_string()))
    }

    fn current_effect(&self, operation: &'static str) -> Result<RgbEffect> {
        self.effect().ok_or_else(|| Error::Unsupported {
            operation,
            effect: format!("0x{:02X}", self.effect_id),
        })
    }

    fn mode_byte(&self, effect: RgbEffect) -> Option<u8> {
        match effect {
            RgbEffect::Glorious => Some(self.glorious_mode),
            RgbEffect::Single => Some(self.single_mode),
            RgbEffect::Breathing7 => Some(self.breathing7_mode),
            RgbEffect::Breathing1 => Some(self.breathing1_mode),
            RgbEffect::Tail => Some(self.tail_mode),
            RgbEffect::Rave => Some(self.rave_mode),
            RgbEffect::Wave => Some(self.wave_mode),
            RgbEffect::Off | RgbEffect::Breathing => None,
        }
    }

    fn mode_byte_mut(&mut self, effect: RgbEffect) -> Option<&mut u8> {
        match effect {
            RgbEffect::Glorious => Some(&mut self.glorious_mode),
            RgbEffect::Single => Some(&mut self.single_mode),
            RgbEffect::Breathing7 => Some(&mut self.breathing7_mode),
            RgbEffect::Breathing1 => Some(&mut self.breathing1_mode),
            RgbEffect::Tail => Some(&mut self.tail_mode),
            RgbEffect::Rave => Some(&mut self.rave_mode),
            RgbEffect::Wave => Some(&mut self.wave_mode),
            RgbEffect::Off | RgbEffect::Breathing => None,
        }
    }

    fn store_mode(
        &mut self,
        effect: RgbEffect,
        mode: EffectMode,
        operation: &'static str,
    ) -> Result<()> {
        let slot = self
            .mode_byte_mut(effect)
            .ok_or_else(|| unsupported(operation, effect))?;
        *slot = mode.pack();
        Ok(())
    }
}

fn profile_index(profile: u8) -> Result<usize> {
    Ok(usize::from(safety::validate_profile(profile)?) - 1)
}

fn unsupported(operation: &'static str, effect: RgbEffect) -> Error {
    Error::Unsupported {
        operation,
        effect: effect.name().to_string(),
    }
}

fn color_count(value: usize, min: u32, max: u32) -> Error {
    Error::OutOfRange {
        field: "color_count",
        value: value as u32,
        min,
        max,
    }
}
