//! Attached pointer devices.
//!
//! [`PointerDevice`] owns everything that lives for one attach: the classified
//! channel set, the interpreter configuration and the persistent button mask.
//! The lifecycle is two-phase:
//!
//! 1. [`PointerDevice::attach`] classifies the declared channels once and
//!    fails with [`Error::ClassificationEmpty`](crate::error::Error::ClassificationEmpty) when none is pointer-relevant.
//! 2. For each packet the host either refreshes samples itself and calls
//!    [`PointerDevice::handle_report`], or passes raw report bytes to
//!    [`PointerDevice::ingest`].
//! 3. [`PointerDevice::detach`] consumes the device; the button mask does not
//!    survive a re-attach.
//!
//! Packet handling takes `&mut self`, so calls for one device are serialized
//! by construction.
//!
//! [`Device`] is the polling interface implemented by backends that own a
//! `PointerDevice` together with a report source.

use crate::buttons::ButtonState;
use crate::channel::InputChannel;
use crate::classifier::{try_classify, ClassifiedChannelSet};
use crate::error::Result;
use crate::interpreter::{Interpretation, Packet, ReportInterpreter, ScalingConfig};
use crate::metadata::DeviceMeta;
use crate::sampler::sample_report;
use crate::sink::EventSink;

/// A pollable pointer backend.
pub trait Device {
    /// Drain pending reports, delivering events to `sink`. Returns the number of packets handled.
    fn poll(&mut self, sink: &mut dyn EventSink) -> Result<usize>;
    fn name(&self) -> &str;
    fn id(&self) -> &str;
    fn metadata(&self) -> DeviceMeta {
        DeviceMeta::default()
    }
}

/// One attached pointing device.
#[derive(Debug)]
pub struct PointerDevice {
    id: String,
    channels: ClassifiedChannelSet,
    interpreter: ReportInterpreter,
    buttons: ButtonState,
    packets: u64,
}

impl PointerDevice {
    /// Classify `channels` and attach.
    pub fn attach<I>(id: impl Into<String>, channels: I, scaling: ScalingConfig) -> Result<Self>
    where
        I: IntoIterator<Item = InputChannel>,
    {
        let id = id.into();
        scaling.validate()?;
        let channels = match try_classify(channels) {
            Ok(set) => set,
            Err(e) => {
                tracing::info!(device = %id, "no pointer channels; attach refused");
                return Err(e);
            }
        };

        tracing::info!(
            device = %id,
            channels = channels.len(),
            report_ids = ?channels.report_ids(),
            "pointer device attached"
        );

        Ok(Self {
            id,
            channels,
            interpreter: ReportInterpreter::new(scaling),
            buttons: ButtonState::NONE,
            packets: 0,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn channels(&self) -> &ClassifiedChannelSet {
        &self.channels
    }

    /// Sample refresh access for hosts that decode reports themselves.
    pub fn channels_mut(&mut self) -> &mut ClassifiedChannelSet {
        &mut self.channels
    }

    /// Current button mask.
    pub fn buttons(&self) -> ButtonState {
        self.buttons
    }

    /// Packets interpreted since attach.
    pub fn packets(&self) -> u64 {
        self.packets
    }

    /// Interpret one packet whose samples are already in place and deliver
    /// both events to `sink`.
    pub fn handle_report<S>(&mut self, timestamp: u64, report_id: u8, sink: &mut S) -> Interpretation
    where
        S: EventSink + ?Sized,
    {
        let out = self
            .interpreter
            .interpret(Packet::new(timestamp, report_id), &self.channels, self.buttons);
        self.buttons = out.buttons;
        self.packets += 1;

        sink.dispatch_pointer(&out.pointer);
        sink.dispatch_scroll(&out.scroll);
        out
    }

    /// Sample a raw report into the classified channels, then interpret it.
    ///
    /// `payload` excludes the report-id byte.
    pub fn ingest<S>(&mut self, timestamp: u64, report_id: u8, payload: &[u8], sink: &mut S) -> Interpretation
    where
        S: EventSink + ?Sized,
    {
        sample_report(&mut self.channels, report_id, timestamp, payload);
        self.handle_report(timestamp, report_id, sink)
    }

    /// Release the device. Returns the final button mask for diagnostics.
    pub fn detach(self) -> ButtonState {
        tracing::info!(device = %self.id, packets = self.packets, "pointer device detached");
        self.buttons
    }
}

/// Build a device straight from a report descriptor.
pub fn attach_from_descriptor(
    id: impl Into<String>,
    descriptor: &[u8],
    scaling: ScalingConfig,
) -> Result<PointerDevice> {
    let channels = crate::descriptor::parse_report_descriptor(descriptor)?;
    PointerDevice::attach(id, channels, scaling)
}
