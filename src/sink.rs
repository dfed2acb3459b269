//! Event delivery.
//!
//! The interpreter only produces events; something downstream has to receive
//! them. [`EventSink`] is that seam. A device hands every interpreted packet to
//! its sink as one pointer event followed by one scroll event.
//!
//! Provided sinks:
//! - [`CollectingSink`]: keeps events in memory (tests, batching hosts)
//! - [`LoggingSink`]: emits each event through `tracing`
//! - [`JsonLinesSink`]: writes one JSON object per event to any `io::Write`
//! - [`SinkBus`]: fans out to several sinks with per-sink filters

use std::collections::BTreeMap;
use std::io::Write;

use crate::error::Result;
use crate::event::{PointerEvent, ScrollEvent, SynthesizedEvent};

/// Receiver of synthesized events.
pub trait EventSink {
    fn dispatch_pointer(&mut self, event: &PointerEvent);
    fn dispatch_scroll(&mut self, event: &ScrollEvent);
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn dispatch_pointer(&mut self, event: &PointerEvent) {
        (**self).dispatch_pointer(event);
    }

    fn dispatch_scroll(&mut self, event: &ScrollEvent) {
        (**self).dispatch_scroll(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn dispatch_pointer(&mut self, event: &PointerEvent) {
        (**self).dispatch_pointer(event);
    }

    fn dispatch_scroll(&mut self, event: &ScrollEvent) {
        (**self).dispatch_scroll(event);
    }
}

/// Keeps every event, in arrival order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Vec<SynthesizedEvent>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[SynthesizedEvent] {
        &self.events
    }

    pub fn pointer_events(&self) -> impl Iterator<Item = &PointerEvent> {
        self.events.iter().filter_map(|e| match e {
            SynthesizedEvent::Pointer(p) => Some(p),
            SynthesizedEvent::Scroll(_) => None,
        })
    }

    pub fn scroll_events(&self) -> impl Iterator<Item = &ScrollEvent> {
        self.events.iter().filter_map(|e| match e {
            SynthesizedEvent::Scroll(s) => Some(s),
            SynthesizedEvent::Pointer(_) => None,
        })
    }

    /// Take all collected events, leaving the sink empty.
    pub fn drain(&mut self) -> Vec<SynthesizedEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EventSink for CollectingSink {
    fn dispatch_pointer(&mut self, event: &PointerEvent) {
        self.events.push(SynthesizedEvent::Pointer(*event));
    }

    fn dispatch_scroll(&mut self, event: &ScrollEvent) {
        self.events.push(SynthesizedEvent::Scroll(*event));
    }
}

/// Logs every event at `debug` level. Zero-delta events are logged at `trace`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingSink;

impl LoggingSink {
    pub fn new() -> Self {
        LoggingSink
    }
}

impl EventSink for LoggingSink {
    fn dispatch_pointer(&mut self, event: &PointerEvent) {
        if event.dx.raw() == 0 && event.dy.raw() == 0 {
            tracing::trace!(timestamp = event.timestamp, buttons = %event.buttons, "pointer");
        } else {
            tracing::debug!(
                timestamp = event.timestamp,
                dx = %event.dx,
                dy = %event.dy,
                buttons = %event.buttons,
                "pointer"
            );
        }
    }

    fn dispatch_scroll(&mut self, event: &ScrollEvent) {
        if event.vertical.raw() == 0 {
            tracing::trace!(timestamp = event.timestamp, "scroll");
        } else {
            tracing::debug!(timestamp = event.timestamp, vertical = %event.vertical, "scroll");
        }
    }
}

/// Writes events as JSON Lines.
///
/// The sink interface cannot fail, so the first write error is kept and later
/// events are dropped; check [`JsonLinesSink::finish`].
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: u64,
    error: Option<crate::error::Error>,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            written: 0,
            error: None,
        }
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    fn write_event(&mut self, event: SynthesizedEvent) {
        if self.error.is_some() {
            return;
        }
        let result = serde_json::to_writer(&mut self.writer, &event)
            .map_err(crate::error::Error::from)
            .and_then(|()| self.writer.write_all(b"\n").map_err(Into::into));
        match result {
            Ok(()) => self.written += 1,
            Err(e) => {
                tracing::warn!(error = %e, "event write failed; further events dropped");
                self.error = Some(e);
            }
        }
    }

    /// Flush and hand back the writer, or the first error encountered.
    pub fn finish(mut self) -> Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> EventSink for JsonLinesSink<W> {
    fn dispatch_pointer(&mut self, event: &PointerEvent) {
        self.write_event(SynthesizedEvent::Pointer(*event));
    }

    fn dispatch_scroll(&mut self, event: &ScrollEvent) {
        self.write_event(SynthesizedEvent::Scroll(*event));
    }
}

/// Which events a bus entry wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EventFilter {
    #[default]
    All,
    PointerOnly,
    ScrollOnly,
}

impl EventFilter {
    fn wants_pointer(self) -> bool {
        matches!(self, EventFilter::All | EventFilter::PointerOnly)
    }

    fn wants_scroll(self) -> bool {
        matches!(self, EventFilter::All | EventFilter::ScrollOnly)
    }
}

struct SinkEntry {
    sink: Box<dyn EventSink + Send>,
    enabled: bool,
    filter: EventFilter,
}

/// Fan-out to registered sinks, in registration order.
#[derive(Default)]
pub struct SinkBus {
    next_id: u64,
    sinks: BTreeMap<u64, SinkEntry>,
}

impl SinkBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a sink and returns its id.
    pub fn add_sink(&mut self, sink: impl EventSink + Send + 'static, filter: EventFilter) -> u64 {
        let id = self.next_id;
        self.sinks.insert(
            id,
            SinkEntry {
                sink: Box::new(sink),
                enabled: true,
                filter,
            },
        );
        self.next_id += 1;
        id
    }

    pub fn enable(&mut self, id: u64) {
        if let Some(entry) = self.sinks.get_mut(&id) {
            entry.enabled = true;
        }
    }

    /// Mutes a sink without removing it.
    pub fn disable(&mut self, id: u64) {
        if let Some(entry) = self.sinks.get_mut(&id) {
            entry.enabled = false;
        }
    }

    pub fn remove_sink(&mut self, id: u64) -> bool {
        self.sinks.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl EventSink for SinkBus {
    fn dispatch_pointer(&mut self, event: &PointerEvent) {
        for entry in self.sinks.values_mut() {
            if entry.enabled && entry.filter.wants_pointer() {
                entry.sink.dispatch_pointer(event);
            }
        }
    }

    fn dispatch_scroll(&mut self, event: &ScrollEvent) {
        for entry in self.sinks.values_mut() {
            if entry.enabled && entry.filter.wants_scroll() {
                entry.sink.dispatch_scroll(event);
            }
        }
    }
}
