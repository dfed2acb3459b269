//! Multi-device registry.
//!
//! Button state belongs to one attached device, so hosts that track several
//! pointers keep one [`PointerDevice`] per id here instead of sharing any
//! global state. Every packet is routed by id.

use std::collections::HashMap;

use crate::buttons::ButtonState;
use crate::channel::InputChannel;
use crate::device::PointerDevice;
use crate::error::{Error, Result};
use crate::interpreter::{Interpretation, ScalingConfig};
use crate::sink::EventSink;

#[derive(Debug, Default)]
pub struct DeviceRegistry {
    scaling: ScalingConfig,
    devices: HashMap<String, PointerDevice>,
}

impl DeviceRegistry {
    pub fn new(scaling: ScalingConfig) -> Self {
        Self {
            scaling,
            devices: HashMap::new(),
        }
    }

    /// Attach a device under `id`. An existing device with the same id is
    /// detached first, so its button state does not leak into the new attach.
    pub fn attach<I>(&mut self, id: impl Into<String>, channels: I) -> Result<()>
    where
        I: IntoIterator<Item = InputChannel>,
    {
        let id = id.into();
        let device = PointerDevice::attach(id.clone(), channels, self.scaling)?;
        if let Some(previous) = self.devices.insert(id, device) {
            previous.detach();
        }
        Ok(())
    }

    /// Attach by parsing a report descriptor.
    pub fn attach_descriptor(&mut self, id: impl Into<String>, descriptor: &[u8]) -> Result<()> {
        let channels = crate::descriptor::parse_report_descriptor(descriptor)?;
        self.attach(id, channels)
    }

    /// Detach `id`, returning its final button mask.
    pub fn detach(&mut self, id: &str) -> Result<ButtonState> {
        self.devices
            .remove(id)
            .map(PointerDevice::detach)
            .ok_or_else(|| Error::UnknownDevice(id.to_string()))
    }

    pub fn get(&self, id: &str) -> Option<&PointerDevice> {
        self.devices.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut PointerDevice> {
        self.devices.get_mut(id)
    }

    fn device_mut(&mut self, id: &str) -> Result<&mut PointerDevice> {
        self.devices
            .get_mut(id)
            .ok_or_else(|| Error::UnknownDevice(id.to_string()))
    }

    /// Interpret a packet for `id` whose samples were refreshed by the host.
    pub fn handle_report<S>(&mut self, id: &str, timestamp: u64, report_id: u8, sink: &mut S) -> Result<Interpretation>
    where
        S: EventSink + ?Sized,
    {
        Ok(self.device_mut(id)?.handle_report(timestamp, report_id, sink))
    }

    /// Sample and interpret a raw report for `id`.
    pub fn ingest<S>(
        &mut self,
        id: &str,
        timestamp: u64,
        report_id: u8,
        payload: &[u8],
        sink: &mut S,
    ) -> Result<Interpretation>
    where
        S: EventSink + ?Sized,
    {
        Ok(self.device_mut(id)?.ingest(timestamp, report_id, payload, sink))
    }

    /// Attached ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.devices.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Detach everything.
    pub fn clear(&mut self) {
        for (_, device) in self.devices.drain() {
            device.detach();
        }
    }
}
