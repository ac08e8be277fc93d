//! Feature-report transport abstraction.
//!
//! The device handle itself (opening, enumeration, timeouts) lives outside
//! this crate; everything here talks to an already-open handle through
//! [`FeatureTransport`] so that real HID devices and mock devices share the
//! same interface.

use crate::error::{Error, Result};
use tracing::trace;

/// Abstraction over raw HID feature-report I/O.
pub trait FeatureTransport: Send {
    /// Send a feature report. `data[0]` is the report id. Returns bytes written.
    fn send_feature_report(&self, data: &[u8]) -> Result<usize>;

    /// Fill `buf` from a feature report. `buf[0]` selects the report id on
    /// entry. Returns bytes read.
    fn get_feature_report(&self, buf: &mut [u8]) -> Result<usize>;
}

/// Send a feature report and require the whole buffer to be accepted.
pub fn send_exact(transport: &dyn FeatureTransport, operation: &'static str, data: &[u8]) -> Result<()> {
    trace!(
        operation,
        len = data.len(),
        report_hex = format_args!("{:02X?}", truncated(data)),
        "Feature report TX"
    );
    let written = transport
        .send_feature_report(data)
        .map_err(|e| in_operation(operation, e))?;
    if written != data.len() {
        return Err(Error::ShortTransfer {
            operation,
            expected: data.len(),
            actual: written,
        });
    }
    Ok(())
}

/// Read a feature report into `buf`, requiring at least `min_len` bytes.
pub fn receive_at_least(
    transport: &dyn FeatureTransport,
    operation: &'static str,
    buf: &mut [u8],
    min_len: usize,
) -> Result<usize> {
    let read = transport
        .get_feature_report(buf)
        .map_err(|e| in_operation(operation, e))?;
    trace!(
        operation,
        len = read,
        report_hex = format_args!("{:02X?}", truncated(&buf[..read.min(buf.len())])),
        "Feature report RX"
    );
    if read < min_len || read > buf.len() {
        return Err(Error::ShortTransfer {
            operation,
            expected: min_len,
            actual: read,
        });
    }
    Ok(read)
}

fn in_operation(operation: &'static str, source: Error) -> Error {
    Error::Transport {
        operation,
        source: Box::new(source),
    }
}

/// Trace output for 520-byte reports is capped to the meaningful prefix.
fn truncated(data: &[u8]) -> &[u8] {
    &data[..data.len().min(crate::codec::CFG_SIZE_USED)]
}


#[cfg(test)]
mod tests {
    use super::*;
    use mock::MockTransport;

    #[test]
    fn send_exact_accepts_full_write() {
        let mock = MockTransport::new();
        send_exact(&mock, "test", &[0x05, 0x01, 0, 0, 0, 0]).unwrap();
        assert_eq!(mock.sent(), vec![vec![0x05, 0x01, 0, 0, 0, 0]]);
    }

    #[test]
    fn send_exact_rejects_short_write() {
        let mock = MockTransport::new();
        mock.short_writes(3);
        let result = send_exact(&mock, "test", &[0x05, 0x01, 0, 0, 0, 0]);
        assert!(matches!(
            result,
            Err(Error::ShortTransfer {
                expected: 6,
                actual: 3,
                ..
            })
        ));
    }

    #[test]
    fn receive_at_least_rejects_short_read() {
        let mock = MockTransport::new();
        mock.on_command([0x05, 0x01], vec![0x05, 0x01, 0x31]);
        send_exact(&mock, "test", &[0x05, 0x01, 0, 0, 0, 0]).unwrap();
        let mut buf = [0u8; 6];
        let result = receive_at_least(&mock, "test", &mut buf, 6);
        assert!(matches!(
            result,
            Err(Error::ShortTransfer { actual: 3, .. })
        ));
    }

    #[test]
    fn hid_errors_carry_operation() {
        let mock = MockTransport::new();
        mock.fail_all("device disconnected");
        let err = send_exact(&mock, "arm read", &[0x05]).unwrap_err();
        assert!(matches!(
            &err,
            Error::Transport {
                operation: "arm read",
                ..
            }
        ));
        assert!(matches!(err.root(), Error::Hid(_)));

        let mut buf = [0u8; 6];
        let err = receive_at_least(&mock, "fetch answer", &mut buf, 6).unwrap_err();
        assert!(err.to_string().starts_with("fetch answer: "));
    }
}
