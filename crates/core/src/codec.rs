//! Config image codec: [`MouseConfig`] ⇄ 520-byte feature-report payload.
//!
//! Layout (bytes, all color groups are R-G-B with no gaps):
//!
//! | Offset   | Field                         |
//! |----------|-------------------------------|
//! | 0        | report id                     |
//! | 1        | command id                    |
//! | 2        | unknown                       |
//! | 3        | config write length           |
//! | 4..10    | reserved                      |
//! | 10       | config-1                      |
//! | 11       | active (7:4) / count (3:0)    |
//! | 12       | DPI enable mask               |
//! | 13..29   | DPI codes                     |
//! | 29..53   | DPI colors (8×RGB)            |
//! | 53       | effect id                     |
//! | 54..84   | glorious, single, breathing7, tail |
//! | 84..117  | reserved                      |
//! | 117..130 | rave, wave, breathing1, unknown |
//! | 130      | liftoff distance              |
//! | 131..520 | zero padding                  |

use crate::config::MouseConfig;
use crate::error::{Error, Result};
use crate::mode::DpiSelector;
use crate::rgb::{Rgb8, RGB8_LEN};
use tracing::{debug, trace};

/// Size of the config feature report.
pub const CONFIG_REPORT_SIZE: usize = 520;
/// Bytes of the config report that carry settings.
pub const CFG_SIZE_USED: usize = 131;

/// A full config feature-report payload.
pub type WireImage = [u8; CONFIG_REPORT_SIZE];

/// Byte offsets of every field in the config image.
pub mod offsets {
    pub const REPORT_ID: usize = 0;
    pub const COMMAND_ID: usize = 1;
    pub const UNKNOWN1: usize = 2;
    pub const CONFIG_WRITE_LEN: usize = 3;
    pub const RESERVED_HEADER: usize = 4;
    pub const CONFIG1: usize = 10;
    pub const DPI_SELECTOR: usize = 11;
    pub const DPI_ENABLED: usize = 12;
    pub const DPI_CODES: usize = 13;
    pub const DPI_COLORS: usize = 29;
    pub const EFFECT_ID: usize = 53;
    pub const GLORIOUS_MODE: usize = 54;
    pub const GLORIOUS_DIRECTION: usize = 55;
    pub const SINGLE_MODE: usize = 56;
    pub const SINGLE_COLOR: usize = 57;
    pub const BREATHING7_MODE: usize = 60;
    pub const BREATHING7_COUNT: usize = 61;
    pub const BREATHING7_COLORS: usize = 62;
    pub const TAIL_MODE: usize = 83;
    pub const RESERVED_LIGHTING: usize = 84;
    pub const RAVE_MODE: usize = 117;
    pub const RAVE_COLORS: usize = 118;
    pub const WAVE_MODE: usize = 124;
    pub const BREATHING1_MODE: usize = 125;
    pub const BREATHING1_COLOR: usize = 126;
    pub const UNKNOWN5: usize = 129;
    pub const LIFTOFF_DISTANCE: usize = 130;
}

/// Build a [`MouseConfig`] from a config image.
///
/// Field values are extracted verbatim. Only the length is checked: anything
/// shorter than [`CFG_SIZE_USED`] is rejected before any field is read.
pub fn decode(image: &[u8]) -> Result<MouseConfig> {
    if image.len() < CFG_SIZE_USED {
        return Err(Error::ImageTooShort {
            len: image.len(),
            min: CFG_SIZE_USED,
        });
    }
    let r = Reader { image };
    let selector = DpiSelector::unpack(r.byte(offsets::DPI_SELECTOR));

    let cfg = MouseConfig {
        report_id: r.byte(offsets::REPORT_ID),
        command_id: r.byte(offsets::COMMAND_ID),
        unknown1: r.byte(offsets::UNKNOWN1),
        config_write_len: r.byte(offsets::CONFIG_WRITE_LEN),
        reserved_header: r.bytes(offsets::RESERVED_HEADER),
        config1: r.byte(offsets::CONFIG1),
        active_profile: selector.active,
        profile_count: selector.count,
        dpi_enabled_mask: r.byte(offsets::DPI_ENABLED),
        dpi_codes: r.bytes(offsets::DPI_CODES),
        dpi_colors: r.colors(offsets::DPI_COLORS),
        effect_id: r.byte(offsets::EFFECT_ID),
        glorious_mode: r.byte(offsets::GLORIOUS_MODE),
        glorious_direction: r.byte(offsets::GLORIOUS_DIRECTION),
        single_mode: r.byte(offsets::SINGLE_MODE),
        single_color: r.color(offsets::SINGLE_COLOR),
        breathing7_mode: r.byte(offsets::BREATHING7_MODE),
        breathing7_color_count: r.byte(offsets::BREATHING7_COUNT),
        breathing7_colors: r.colors(offsets::BREATHING7_COLORS),
        tail_mode: r.byte(offsets::TAIL_MODE),
        reserved_lighting: r.bytes(offsets::RESERVED_LIGHTING),
        rave_mode: r.byte(offsets::RAVE_MODE),
        rave_colors: r.colors(offsets::RAVE_COLORS),
        wave_mode: r.byte(offsets::WAVE_MODE),
        breathing1_mode: r.byte(offsets::BREATHING1_MODE),
        breathing1_color: r.color(offsets::BREATHING1_COLOR),
        unknown5: r.byte(offsets::UNKNOWN5),
        liftoff_distance: r.byte(offsets::LIFTOFF_DISTANCE),
    };

    debug!(
        active_profile = cfg.active_profile,
        profile_count = cfg.profile_count,
        effect_id = format_args!("0x{:02X}", cfg.effect_id),
        dpi_codes = format_args!("{:?}", &cfg.dpi_codes[..]),
        "Decoded config image"
    );
    Ok(cfg)
}

/// Serialize a [`MouseConfig`] into a zero-padded config image.
pub fn encode(cfg: &MouseConfig) -> Box<WireImage> {
    let mut image = Box::new([0u8; CONFIG_REPORT_SIZE]);
    let mut w = Writer {
        image: &mut image[..],
    };
    let selector = DpiSelector {
        active: cfg.active_profile,
        count: cfg.profile_count,
    };

    w.byte(offsets::REPORT_ID, cfg.report_id);
    w.byte(offsets::COMMAND_ID, cfg.command_id);
    w.byte(offsets::UNKNOWN1, cfg.unknown1);
    w.byte(offsets::CONFIG_WRITE_LEN, cfg.config_write_len);
    w.bytes(offsets::RESERVED_HEADER, &cfg.reserved_header);
    w.byte(offsets::CONFIG1, cfg.config1);
    w.byte(offsets::DPI_SELECTOR, selector.pack());
    w.byte(offsets::DPI_ENABLED, cfg.dpi_enabled_mask);
    w.bytes(offsets::DPI_CODES, &cfg.dpi_codes);
    w.colors(offsets::DPI_COLORS, &cfg.dpi_colors);
    w.byte(offsets::EFFECT_ID, cfg.effect_id);
    w.byte(offsets::GLORIOUS_MODE, cfg.glorious_mode);
    w.byte(offsets::GLORIOUS_DIRECTION, cfg.glorious_direction);
    w.byte(offsets::SINGLE_MODE, cfg.single_mode);
    w.colors(offsets::SINGLE_COLOR, &[cfg.single_color]);
    w.byte(offsets::BREATHING7_MODE, cfg.breathing7_mode);
    w.byte(offsets::BREATHING7_COUNT, cfg.breathing7_color_count);
    w.colors(offsets::BREATHING7_COLORS, &cfg.breathing7_colors);
    w.byte(offsets::TAIL_MODE, cfg.tail_mode);
    w.bytes(offsets::RESERVED_LIGHTING, &cfg.reserved_lighting);
    w.byte(offsets::RAVE_MODE, cfg.rave_mode);
    w.colors(offsets::RAVE_COLORS, &cfg.rave_colors);
    w.byte(offsets::WAVE_MODE, cfg.wave_mode);
    w.byte(offsets::BREATHING1_MODE, cfg.breathing1_mode);
    w.colors(offsets::BREATHING1_COLOR, &[cfg.breathing1_color]);
    w.byte(offsets::UNKNOWN5, cfg.unknown5);
    w.byte(offsets::LIFTOFF_DISTANCE, cfg.liftoff_distance);

    trace!(
        used_hex = format_args!("{:02X?}", &image[..CFG_SIZE_USED]),
        "Encoded config image"
    );
    image
}

/// Reads fixed-offset fields. Callers check the length first.
struct Reader<'a> {
    image: &'a [u8],
}

impl Reader<'_> {
    fn byte(&self, offset: usize) -> u8 {
        self.image[offset]
    }

    fn bytes<const N: usize>(&self, offset: usize) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.image[offset..offset + N]);
        out
    }

    fn color(&self, offset: usize) -> Rgb8 {
        Rgb8::from_bytes(self.bytes(offset))
    }

    fn colors<const N: usize>(&self, offset: usize) -> [Rgb8; N] {
        std::array::from_fn(|i| self.color(offset + i * RGB8_LEN))
    }
}

struct Writer<'a> {
    image: &'a mut [u8],
}

impl Writer<'_> {
    fn byte(&mut self, offset: usize, value: u8) {
        self.image[offset] = value;
    }

    fn bytes(&mut self, offset: usize, value: &[u8]) {
        self.image[offset..offset + value.len()].copy_from_slice(value);
    }

    fn colors(&mut self, offset: usize, colors: &[Rgb8]) {
        for (i, c) in colors.iter().enumerate() {
            self.bytes(offset + i * RGB8_LEN, &c.to_bytes());
        }
    }
}
