//! gloryctl-core: config image codec, feature-report commands, and device
//! discovery for SinoWealth-based Glorious mice.
//!
//! The mouse keeps all of its settings (DPI profiles, RGB lighting, liftoff
//! distance) in one 131-byte block that is read and written whole as a
//! 520-byte HID feature report. Debounce time and firmware version use
//! separate short command reports.

pub mod codec;
pub mod comm;
pub mod config;
pub mod device;
pub mod effect;
pub mod error;
#[cfg(test)]
mod integration_tests;
pub mod mode;
pub mod protocol;
pub mod rgb;
pub mod safety;
pub mod transport;

pub use config::MouseConfig;
pub use effect::RgbEffect;
pub use error::{Error, Result};
pub use mode::EffectMode;
pub use rgb::Rgb8;

/// SinoWealth USB Vendor ID.
pub const SINOWEALTH_VID: u16 = 0x258A;

/// Known product IDs using the supported config layout.
pub mod pids {
    /// Dream Machines DM5.
    pub const DREAM_MACHINES_DM5: u16 = 0x0027;
    /// Glorious Model D.
    pub const GLORIOUS_MODEL_D: u16 = 0x0033;
    /// Glorious Model O / O-.
    pub const GLORIOUS_MODEL_O: u16 = 0x0036;
}
