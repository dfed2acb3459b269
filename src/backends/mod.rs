//! Report sources for `rawpoint`.
//!
//! Implementations of [`Device`](crate::device::Device) that own a
//! [`PointerDevice`](crate::device::PointerDevice) and feed it raw reports.
//!
//! # Feature flags
//! - **`hid`**: enables the `hidapi` backend (needs the platform HID libraries).
//!
//! The virtual backend is always available.

use crate::device::Device;
use crate::interpreter::ScalingConfig;

#[cfg(feature = "hid")]
#[cfg_attr(docsrs, doc(cfg(feature = "hid")))]
pub mod hid;

pub mod virtual_input;

/// Unified discovery across enabled backends.
///
/// Returns HID mice when `hid` is enabled and the HID library initializes;
/// otherwise an empty list.
pub fn probe_devices(scaling: ScalingConfig) -> Vec<Box<dyn Device>> {
    #[allow(unused_mut)]
    let mut out: Vec<Box<dyn Device>> = Vec::new();

    #[cfg(feature = "hid")]
    {
        match hidapi::HidApi::new() {
            Ok(api) => out.extend(hid::probe_devices(&api, scaling)),
            Err(e) => tracing::warn!(error = %e, "failed to initialize HID API"),
        }
    }
    #[cfg(not(feature = "hid"))]
    {
        let _ = scaling;
        tracing::debug!("built without the `hid` feature; no hardware backends");
    }

    out
}
