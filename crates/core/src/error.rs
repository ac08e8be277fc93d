//! Error types for gloryctl-core.

use thiserror::Error;

/// Core library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// HID device communication failure.
    #[error("HID error: {0}")]
    Hid(String),

    /// Transport failure during a named protocol exchange.
    #[error("{operation}: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: Box<Error>,
    },

    /// Device not found during enumeration.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// The transport moved fewer (or more) bytes than the exchange requires.
    #[error("{operation}: short transfer, expected {expected} bytes, got {actual}")]
    ShortTransfer {
        operation: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Config image too small to hold every field.
    #[error("config image is {len} bytes, need at least {min}")]
    ImageTooShort { len: usize, min: usize },

    /// Value out of safe range.
    #[error("value out of range: {field} = {value} (allowed {min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    /// Operation not meaningful for the given lighting effect.
    #[error("{operation} is not supported for effect {effect}")]
    Unsupported {
        operation: &'static str,
        effect: String,
    },

    /// Effect name did not match the effect table.
    #[error("unknown effect: {0}")]
    UnknownEffect(String),

    /// JSON rendering failure.
    #[error("serialization error: {0}")]
    Serialize(String),

    /// Permission denied (udev rules missing or exclusive access).
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Operation timed out.
    #[error("timeout: {0}")]
    Timeout(String),
}

impl Error {
    /// The innermost error, looking through operation wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Self::Transport { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;
