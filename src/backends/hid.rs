//! `hidapi`-backed pointer devices.
//!
//! [`HidPointer`] opens one HID interface, reads its report descriptor,
//! attaches a [`PointerDevice`] and then drains input reports on every
//! [`Device::poll`]. Reports are timestamped with monotonic nanoseconds since
//! the interface was opened.
//!
//! This backend does not seize the device: the OS keeps delivering its own
//! (accelerated) events. Hosts that want to replace them must grab the device
//! through their platform's mechanism.

use std::time::Instant;

use hidapi::{DeviceInfo, HidApi, HidDevice};

use crate::device::{Device, PointerDevice};
use crate::error::Result;
use crate::interpreter::ScalingConfig;
use crate::metadata::DeviceMeta;
use crate::sink::EventSink;
use crate::usage::{GD_MOUSE, PAGE_GENERIC_DESKTOP};

/// Maximum number of reports drained per `poll()` call.
const MAX_REPORTS_PER_TICK: usize = 32;

/// HID report descriptors are at most 4096 bytes.
const MAX_DESCRIPTOR_LEN: usize = 4096;


pub struct HidPointer {
    name: String,
    raw: HidDevice,
    device: PointerDevice,
    meta: DeviceMeta,
    report_ids: bool,
    opened: Instant,
    buf: Vec<u8>,
}

impl HidPointer {
    /// Open `info`, read its descriptor and attach.
    ///
    /// Fails with [`crate::Error::ClassificationEmpty`] when the interface has
    /// no pointer channels.
    pub fn open(info: &DeviceInfo, api: &HidApi, scaling: ScalingConfig) -> Result<Self> {
        let raw = info.open_device(api)?;
        // Polled from a host-controlled loop.
        raw.set_blocking_mode(false)?;

        let mut descriptor = vec![0u8; MAX_DESCRIPTOR_LEN];
        let len = raw.get_report_descriptor(&mut descriptor)?;
        descriptor.truncate(len);

        let channels = crate::descriptor::parse_report_descriptor(&descriptor)?;
        let report_ids = crate::descriptor::uses_report_ids(&channels);
        let buf_len = read_buffer_len(crate::descriptor::report_len(&channels), report_ids);

        let meta = meta_from_info(info);
        let device = PointerDevice::attach(meta.fingerprint(), channels, scaling)?;

        tracing::info!(
            device = %meta,
            path = meta.path.as_deref().unwrap_or(""),
            descriptor_len = len,
            report_ids,
            buf_len,
            "opened HID pointer"
        );

        Ok(Self {
            name: info.product_string().unwrap_or("Unknown").to_string(),
            raw,
            device,
            meta,
            report_ids,
            opened: Instant::now(),
            buf: vec![0u8; buf_len],
        })
    }

    /// Split `[report_id][payload...]` when the descriptor declares report ids.
    #[inline]
    fn split_report(data: &[u8], report_ids: bool) -> (u8, &[u8]) {
        match data.split_first() {
            Some((&id, payload)) if report_ids => (id, payload),
            _ => (0, data),
        }
    }

    fn now(&self) -> u64 {
        u64::try_from(self.opened.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }

    /// Detach and close.
    pub fn close(self) {
        self.device.detach();
    }
}

impl Device for HidPointer {
    fn poll(&mut self, sink: &mut dyn EventSink) -> Result<usize> {
        let mut handled = 0;

        while handled < MAX_REPORTS_PER_TICK {
            let n = match self.raw.read(&mut self.buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) => {
                    tracing::warn!(device = %self.meta, error = %e, "HID read failed");
                    return Err(e.into());
                }
            };

            let timestamp = self.now();
            let (report_id, payload) = Self::split_report(&self.buf[..n], self.report_ids);
            self.device.ingest(timestamp, report_id, payload, &mut *sink);
            handled += 1;
        }

        Ok(handled)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> &str {
        self.device.id()
    }

    fn metadata(&self) -> DeviceMeta {
        self.meta.clone()
    }
}

fn meta_from_info(info: &DeviceInfo) -> DeviceMeta {
    DeviceMeta {
        vid: Some(info.vendor_id()),
        pid: Some(info.product_id()),
        product_string: info.product_string().map(str::to_string),
        serial_number: info.serial_number().map(str::to_string),
        interface_number: Some(info.interface_number()),
        usage_page: Some(info.usage_page()),
        usage: Some(info.usage()),
        path: Some(info.path().to_string_lossy().into_owned()),
    }
}

/// Room for the longest declared report plus its id byte.
fn read_buffer_len(report_len: usize, report_ids: bool) -> usize {
    report_len.max(1) + usize::from(report_ids)
}

/// Whether a `hidapi` entry advertises itself as a mouse.
///
/// Platforms that do not report top-level usages (usage page 0) are let
/// through; the classifier makes the final call from the descriptor.
fn looks_like_mouse(info: &DeviceInfo) -> bool {
    let up = info.usage_page();
    up == 0 || (up == PAGE_GENERIC_DESKTOP && u32::from(info.usage()) == GD_MOUSE)
}

/// Open every mouse interface that attaches successfully.
pub fn probe_devices(api: &HidApi, scaling: ScalingConfig) -> Vec<Box<dyn Device>> {
    let mut found: Vec<Box<dyn Device>> = Vec::new();

    for info in api.device_list().filter(|i| looks_like_mouse(i)) {
        match HidPointer::open(info, api, scaling) {
            Ok(pointer) => found.push(Box::new(pointer)),
            Err(e) => {
                tracing::debug!(
                    vid = info.vendor_id(),
                    pid = info.product_id(),
                    error = %e,
                    "HID interface skipped"
                );
            }
        }
    }

    tracing::info!(count = found.len(), "HID pointers discovered");
    found
}
