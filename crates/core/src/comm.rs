//! Error classification and device status for user-facing reporting.
//!
//! Exchanges are never retried automatically; the classification only
//! decides what to tell the user.

use crate::error::Error;
use crate::protocol::read_firmware_version;
use crate::transport::FeatureTransport;
use tracing::warn;

/// Classification of communication errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Timeout or busy device; re-issuing the whole operation may succeed.
    Transient,
    /// Device is disconnected; stop and notify the user.
    Disconnected,
    /// Permission denied, likely a missing udev rule.
    PermissionDenied,
    /// Device answered with the wrong amount of data.
    Protocol,
    /// Caller-supplied value or effect was rejected before any I/O.
    InvalidInput,
}

impl ErrorClass {
    /// Classify an error for reporting.
    pub fn classify(err: &Error) -> Self {
        match err.root() {
            Error::Timeout(_) => Self::Transient,
            Error::PermissionDenied(_) => Self::PermissionDenied,
            Error::DeviceNotFound(_) => Self::Disconnected,
            Error::ShortTransfer { .. } | Error::ImageTooShort { .. } => Self::Protocol,
            Error::Hid(msg) => {
                let lower = msg.to_lowercase();
                if lower.contains("disconnect")
                    || lower.contains("not found")
                    || lower.contains("no such device")
                {
                    Self::Disconnected
                } else if lower.contains("permission")
                    || lower.contains("access denied")
                    || lower.contains("access is denied")
                {
                    Self::PermissionDenied
                } else if lower.contains("timeout") || lower.contains("timed out") {
                    Self::Transient
                } else {
                    Self::Protocol
                }
            }
            Error::Transport { .. } => Self::Protocol,
            Error::OutOfRange { .. }
            | Error::Unsupported { .. }
            | Error::UnknownEffect(_)
            | Error::Serialize(_) => Self::InvalidInput,
        }
    }

    /// Hint printed next to the error.
    pub fn hint(&self) -> &'static str {
        match self {
            Self::Transient => "the device did not answer in time; run the command again",
            Self::Disconnected => "check that the mouse is plugged in",
            Self::PermissionDenied => "install a udev rule granting access to the hidraw node",
            Self::Protocol => "the device answered unexpectedly; its firmware layout may differ",
            Self::InvalidInput => "nothing was sent to the device",
        }
    }
}

/// Device connection status for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceStatus {
    /// Device is connected and responding.
    Connected,
    /// Device is not found / disconnected.
    Disconnected,
    /// Permission denied, needs udev setup.
    PermissionError,
    /// Communication error (transient or protocol).
    Error,
}

/// Check device connectivity by reading the firmware version.
pub fn check_device_status(transport: &dyn FeatureTransport) -> DeviceStatus {
    match read_firmware_version(transport) {
        Ok(_) => DeviceStatus::Connected,
        Err(ref e) => {
            warn!(error = %e, "Device status probe failed");
            match ErrorClass::classify(e) {
                ErrorClass::Disconnected => DeviceStatus::Disconnected,
                ErrorClass::PermissionDenied => DeviceStatus::PermissionError,
                _ => DeviceStatus::Error,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;

    #[test]
    fn classify_timeout_as_transient() {
        let err = Error::Timeout("1s elapsed".into());
        assert_eq!(ErrorClass::classify(&err), ErrorClass::Transient);
    }

    #[test]
    fn classify_disconnect() {
        let err = Error::DeviceNotFound("Model O".into());
        assert_eq!(ErrorClass::classify(&err), ErrorClass::Disconnected);
        let err = Error::Hid("device disconnect detected".into());
        assert_eq!(ErrorClass::classify(&err), ErrorClass::Disconnected);
    }

    #[test]
    fn classify_hid_permission_message() {
        let err = Error::Hid("Permission denied (os error 13)".into());
        assert_eq!(ErrorClass::classify(&err), ErrorClass::PermissionDenied);
    }

    #[test]
    fn classify_looks_through_operation() {
        let err = Error::Transport {
            operation: "write config",
            source: Box::new(Error::Hid("No such device".into())),
        };
        assert_eq!(ErrorClass::classify(&err), ErrorClass::Disconnected);
    }

    #[test]
    fn classify_short_transfer_as_protocol() {
        let err = Error::ShortTransfer {
            operation: "read config",
            expected: 131,
            actual: 6,
        };
        assert_eq!(ErrorClass::classify(&err), ErrorClass::Protocol);
    }

    #[test]
    fn classify_validation_errors() {
        let err = Error::OutOfRange {
            field: "dpi",
            value: 150,
            min: 200,
            max: 25600,
        };
        assert_eq!(ErrorClass::classify(&err), ErrorClass::InvalidInput);
        assert!(!ErrorClass::InvalidInput.hint().is_empty());
    }

    #[test]
    fn check_device_status_connected() {
        let mock = MockTransport::new();
        mock.on_command([0x05, 0x01], vec![0x05, 0x01, b'1', b'.', b'0', 0]);
        assert_eq!(check_device_status(&mock), DeviceStatus::Connected);
    }

    #[test]
    fn check_device_status_disconnected() {
        let mock = MockTransport::new();
        mock.fail_all("No such device");
        assert_eq!(check_device_status(&mock), DeviceStatus::Disconnected);
    }

    #[test]
    fn check_device_status_no_answer() {
        let mock = MockTransport::new();
        assert_eq!(check_device_status(&mock), DeviceStatus::Error);
    }
}
