//! Device registry and discovery.

use crate::error::{Error, Result};
use crate::{pids, SINOWEALTH_VID};
use tracing::{debug, info};

/// HID interface that carries the config feature reports.
pub const CONFIG_INTERFACE: i32 = 1;

/// A mouse model known to use the supported config layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedMouse {
    pub vid: u16,
    pub pid: u16,
    pub name: String,
}

impl SupportedMouse {
    pub fn new(vid: u16, pid: u16, name: impl Into<String>) -> Self {
        Self {
            vid,
            pid,
            name: name.into(),
        }
    }
}

/// The set of mice discovery will accept.
///
/// Passed in by the caller rather than held globally, so tools can extend it
/// (e.g. from `--vid/--pid` flags).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRegistry {
    pub devices: Vec<SupportedMouse>,
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self {
            devices: vec![
                SupportedMouse::new(SINOWEALTH_VID, pids::DREAM_MACHINES_DM5, "Dream Machines DM5"),
                SupportedMouse::new(SINOWEALTH_VID, pids::GLORIOUS_MODEL_D, "Glorious Model D"),
                SupportedMouse::new(SINOWEALTH_VID, pids::GLORIOUS_MODEL_O, "Glorious Model O/O-"),
            ],
        }
    }
}

impl DeviceRegistry {
    pub fn empty() -> Self {
        Self {
            devices: Vec::new(),
        }
    }

    pub fn with(mut self, mouse: SupportedMouse) -> Self {
        self.devices.push(mouse);
        self
    }

    pub fn lookup(&self, vid: u16, pid: u16) -> Option<&SupportedMouse> {
        self.devices.iter().find(|m| m.vid == vid && m.pid == pid)
    }
}

/// One HID interface as reported by enumeration.
#[derive(Debug, Clone)]
pub struct HidCandidate {
    pub vid: u16,
    pub pid: u16,
    pub interface_number: i32,
    pub path: String,
    pub serial: Option<String>,
}

/// Information about a discovered mouse.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub name: String,
    pub vid: u16,
    pub pid: u16,
    pub path: String,
    pub serial: Option<String>,
}

/// Keep the config interface of every registered mouse.
pub fn select_devices(
    candidates: impl IntoIterator<Item = HidCandidate>,
    registry: &DeviceRegistry,
) -> Vec<DeviceInfo> {
    let mut devices = Vec::new();
    for c in candidates {
        if c.interface_number != CONFIG_INTERFACE {
            continue;
        }
        if let Some(mouse) = registry.lookup(c.vid, c.pid) {
            info!(
                model = %mouse.name,
                vid = format_args!("0x{:04X}", c.vid),
                pid = format_args!("0x{:04X}", c.pid),
                path = %c.path,
                "Found supported mouse"
            );
            devices.push(DeviceInfo {
                name: mouse.name.clone(),
                vid: c.vid,
                pid: c.pid,
                path: c.path,
                serial: c.serial,
            });
        }
    }
    devices
}

/// Discover all connected mice listed in `registry`.
pub fn discover_devices(api: &hidapi::HidApi, registry: &DeviceRegistry) -> Result<Vec<DeviceInfo>> {
    debug!(known = registry.devices.len(), "Starting HID device enumeration");
    let candidates = api.device_list().map(|info| HidCandidate {
        vid: info.vendor_id(),
        pid: info.product_id(),
        interface_number: info.interface_number(),
        path: info.path().to_string_lossy().into_owned(),
        serial: info.serial_number().map(|s| s.to_string()),
    });
    let devices = select_devices(candidates, registry);
    debug!(count = devices.len(), "Device enumeration complete");
    Ok(devices)
}

/// First supported mouse, or [`Error::DeviceNotFound`].
pub fn find_first(api: &hidapi::HidApi, registry: &DeviceRegistry) -> Result<DeviceInfo> {
    discover_devices(api, registry)?
        .into_iter()
        .next()
        .ok_or_else(|| Error::DeviceNotFound("no supported mouse connected".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(pid: u16, interface_number: i32) -> HidCandidate {
        HidCandidate {
            vid: SINOWEALTH_VID,
            pid,
            interface_number,
            path: format!("/dev/hidraw{interface_number}"),
            serial: None,
        }
    }

    #[test]
    fn default_registry_knows_glorious_mice() {
        let reg = DeviceRegistry::default();
        assert_eq!(
            reg.lookup(0x258A, 0x0036).map(|m| m.name.as_str()),
            Some("Glorious Model O/O-")
        );
        assert!(reg.lookup(0x258A, 0x0033).is_some());
        assert!(reg.lookup(0x258A, 0x0027).is_some());
        assert!(reg.lookup(0x046D, 0xC08B).is_none());
    }

    #[test]
    fn registry_can_be_extended() {
        let reg = DeviceRegistry::empty().with(SupportedMouse::new(0x1234, 0x5678, "Test"));
        assert!(reg.lookup(0x1234, 0x5678).is_some());
        assert!(reg.lookup(SINOWEALTH_VID, pids::GLORIOUS_MODEL_O).is_none());
    }

    #[test]
    fn select_keeps_only_config_interface() {
        let devices = select_devices(
            vec![
                candidate(pids::GLORIOUS_MODEL_O, 0),
                candidate(pids::GLORIOUS_MODEL_O, 1),
            ],
            &DeviceRegistry::default(),
        );
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].path, "/dev/hidraw1");
    }

    #[test]
    fn select_skips_unregistered() {
        let devices = select_devices(vec![candidate(0x9999, 1)], &DeviceRegistry::default());
        assert!(devices.is_empty());
    }
}
