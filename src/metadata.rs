//! Device metadata snapshot.
//!
//! [`DeviceMeta`] is a lightweight, cloneable description of an attached
//! pointer suitable for logging and for keying devices in a
//! [`DeviceRegistry`](crate::manager::DeviceRegistry). Backends populate what
//! they know; unknown fields remain `None`.
//!
//! ## Identity notes
//! - `vid`/`pid` plus `serial_number` (when present) are the most stable way to
//!   recognise a mouse across reconnects.
//! - `path` is platform-specific and may change across ports; treat it as
//!   diagnostic first, identity second.

use serde::{Deserialize, Serialize};

/// Snapshot of metadata describing a single pointer interface.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceMeta {
    /// USB Vendor ID (VID), if known.
    pub vid: Option<u16>,

    /// USB Product ID (PID), if known.
    pub pid: Option<u16>,

    /// Human-readable product name from the driver/firmware.
    pub product_string: Option<String>,

    /// Device serial number supplied by firmware/OS, if present.
    pub serial_number: Option<String>,

    /// HID interface index (platform-reported). Some stacks use `-1`.
    pub interface_number: Option<i32>,

    /// Top-level HID usage page of the interface (`0x01` for Generic Desktop).
    pub usage_page: Option<u16>,

    /// Top-level HID usage of the interface (`0x02` for Mouse).
    pub usage: Option<u16>,

    /// OS/topological path to the interface. Opaque.
    pub path: Option<String>,
}

impl DeviceMeta {
    /// A stable-ish identifier: `vid:pid[:serial]`, falling back to the path.
    pub fn fingerprint(&self) -> String {
        match (self.vid, self.pid) {
            (Some(vid), Some(pid)) => match self.serial_number.as_deref() {
                Some(serial) if !serial.is_empty() => format!("{vid:04x}:{pid:04x}:{serial}"),
                _ => format!("{vid:04x}:{pid:04x}"),
            },
            _ => self.path.clone().unwrap_or_else(|| "unknown".to_string()),
        }
    }
}

impl std::fmt::Display for DeviceMeta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = self.product_string.as_deref().unwrap_or("Unknown pointer");
        write!(f, "{name} ({})", self.fingerprint())
    }
}
