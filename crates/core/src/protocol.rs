//! Feature-report command exchanges.
//!
//! Every command is a short 6-byte report sent on report id 0x05, optionally
//! followed by a read of the answer:
//!   - `[0x05, 0x01]` → firmware version (6-byte answer)
//!   - `[0x05, 0x11]` → arm a config read; the 520-byte config is then read
//!     back on report id 0x04
//!   - `[0x05, 0x1A]` → debounce time (6-byte answer, byte 2 = ms / 2)
//!   - `[0x05, 0x1A, n]` → set debounce time to `n * 2` ms
//!
//! A config write is a single 520-byte report on report id 0x04.
//!
//! Exchanges are stateless on the device side: a failed exchange is not
//! retried here, the caller re-issues the whole operation.

use crate::codec::{self, CFG_SIZE_USED, CONFIG_REPORT_SIZE};
use crate::config::MouseConfig;
use crate::error::Result;
use crate::safety;
use crate::transport::{receive_at_least, send_exact, FeatureTransport};
use tracing::{debug, info, warn};

/// Report id of the 520-byte config report.
pub const REPORT_ID_CONFIG: u8 = 0x04;
/// Report id of short command reports.
pub const REPORT_ID_CMD: u8 = 0x05;
/// Length of a command report, including the report id.
pub const CMD_REPORT_SIZE: usize = 6;

/// Command ids (byte 1 of a command report).
pub mod cmd {
    pub const FIRMWARE_VERSION: u8 = 0x01;
    pub const GET_CONFIG: u8 = 0x11;
    pub const DEBOUNCE: u8 = 0x1A;
}

/// Value of the config-write-length byte on every write.
pub const CONFIG_WRITE_LEN: u8 = (CFG_SIZE_USED - 8) as u8;

/// Debounce is stored in units of this many milliseconds.
pub const DEBOUNCE_STEP_MS: u16 = 2;

/// How a millisecond value that is not a multiple of the step is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Round down to the previous step.
    TowardZero,
}

/// Odd debounce requests round down.
pub const DEBOUNCE_ROUNDING: Rounding = Rounding::TowardZero;

/// Build a command report: report id, command id, then argument bytes.
pub fn build_cmd(command: u8, args: &[u8]) -> [u8; CMD_REPORT_SIZE] {
    let mut buf = [0u8; CMD_REPORT_SIZE];
    buf[0] = REPORT_ID_CMD;
    buf[1] = command;
    for (slot, arg) in buf[2..].iter_mut().zip(args) {
        *slot = *arg;
    }
    buf
}

/// Convert milliseconds into the byte the firmware stores.
pub fn debounce_to_raw(ms: u16) -> Result<u8> {
    let ms = safety::validate_debounce(ms)?;
    let raw = match DEBOUNCE_ROUNDING {
        Rounding::TowardZero => ms / DEBOUNCE_STEP_MS,
    };
    if ms % DEBOUNCE_STEP_MS != 0 {
        warn!(
            requested_ms = ms,
            stored_ms = raw * DEBOUNCE_STEP_MS,
            "Debounce is stored in 2ms steps, rounding down"
        );
    }
    // validate_debounce caps ms at 510, so raw fits a byte
    Ok(raw as u8)
}

pub fn raw_to_debounce(raw: u8) -> u16 {
    u16::from(raw) * DEBOUNCE_STEP_MS
}

/// Read the full onboard config.
///
/// Steps:
/// 1. Send `[0x05, 0x11]` to arm the config read
/// 2. Read the 520-byte config report (report id 0x04)
/// 3. Decode it
pub fn read_config(transport: &dyn FeatureTransport) -> Result<MouseConfig> {
    const OP: &str = "read config";
    send_exact(transport, OP, &build_cmd(cmd::GET_CONFIG, &[]))?;

    let mut image = vec![0u8; CONFIG_REPORT_SIZE];
    image[0] = REPORT_ID_CONFIG;
    let read = receive_at_least(transport, OP, &mut image, CFG_SIZE_USED)?;
    if read < CONFIG_REPORT_SIZE {
        warn!(
            bytes = read,
            expected = CONFIG_REPORT_SIZE,
            "Config report shorter than a full report, decoding the used region only"
        );
    } else {
        debug!(bytes = read, "Config read");
    }

    codec::decode(&image[..read])
}

/// Write the full onboard config.
///
/// Stamps the config-write-length byte, encodes, and sends the 520-byte
/// image as one feature report.
pub fn write_config(transport: &dyn FeatureTransport, cfg: &mut MouseConfig) -> Result<()> {
    cfg.set_config_write_len(CONFIG_WRITE_LEN);
    let image = codec::encode(cfg);
    send_exact(transport, "write config", &image[..])?;
    info!(
        effect_id = format_args!("0x{:02X}", cfg.effect_id()),
        active_profile = cfg.active_profile(),
        "Config written"
    );
    Ok(())
}

/// Read the firmware version string.
///
/// The answer echoes the report and command ids; the remaining bytes are
/// ASCII, NUL-padded.
pub fn read_firmware_version(transport: &dyn FeatureTransport) -> Result<String> {
    const OP: &str = "read firmware version";
    let mut buf = build_cmd(cmd::FIRMWARE_VERSION, &[]);
    send_exact(transport, OP, &buf)?;
    receive_at_least(transport, OP, &mut buf, CMD_REPORT_SIZE)?;

    let version = String::from_utf8_lossy(&buf[2..])
        .trim_end_matches('\0')
        .trim()
        .to_string();
    debug!(version = %version, "Firmware version");
    Ok(version)
}

/// Read the debounce time in milliseconds.
pub fn read_debounce(transport: &dyn FeatureTransport) -> Result<u16> {
    const OP: &str = "read debounce";
    let mut buf = build_cmd(cmd::DEBOUNCE, &[]);
    send_exact(transport, OP, &buf)?;
    receive_at_least(transport, OP, &mut buf, CMD_REPORT_SIZE)?;

    let ms = raw_to_debounce(buf[2]);
    debug!(raw = buf[2], ms, "Debounce time");
    Ok(ms)
}

/// Set the debounce time. Returns the value actually stored.
pub fn write_debounce(transport: &dyn FeatureTransport, ms: u16) -> Result<u16> {
    let raw = debounce_to_raw(ms)?;
    send_exact(transport, "write debounce", &build_cmd(cmd::DEBOUNCE, &[raw]))?;
    Ok(raw_to_debounce(raw))
}
