//! Input channels declared by a pointing device.
//!
//! An [`InputChannel`] is one discrete data source (an axis, a button, a wheel)
//! tagged with its HID usage. Channels are produced by the host, either from a
//! report descriptor ([`crate::descriptor`]) or built directly, and are then
//! classified once at attach. After that the host only refreshes
//! [`InputChannel::value`] and [`InputChannel::timestamp`] before each packet.

use serde::{Deserialize, Serialize};

use crate::usage;

/// Category of a declared channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelType {
    /// A grouping construct (application/physical/logical collection). Never carries a value.
    Collection,
    /// A one-bit on/off input.
    Button,
    /// A multi-bit value (axis, wheel).
    Axis,
    /// Anything else, including constant padding.
    Misc,
}

/// Bit layout of a channel inside its input report, excluding the report-id byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLayout {
    /// Offset of the first bit, counted from bit 0 of the first payload byte.
    pub bit_offset: u32,
    /// Field width in bits (1..=32).
    pub bit_size: u32,
    /// Whether the raw field is two's-complement (descriptor logical minimum < 0).
    pub signed: bool,
}

/// One declared input source on the device.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputChannel {
    pub channel_type: ChannelType,
    /// HID usage page (the usage domain).
    pub usage_page: u16,
    /// Usage within the page. `0` means "no meaning".
    pub usage: u32,
    /// Report that carries this channel. `0` for devices without report ids.
    pub report_id: u8,
    /// Most recent sample.
    pub value: i32,
    /// Host timestamp of the most recent sample. `None` until first sampled.
    pub timestamp: Option<u64>,
    /// Where the value lives in the raw report, when known.
    pub field: Option<FieldLayout>,
}

impl InputChannel {
    /// A leaf channel with no sample yet.
    pub fn new(channel_type: ChannelType, usage_page: u16, usage: u32, report_id: u8) -> Self {
        Self {
            channel_type,
            usage_page,
            usage,
            report_id,
            value: 0,
            timestamp: None,
            field: None,
        }
    }

    /// A collection channel.
    pub fn collection(usage_page: u16, usage: u32) -> Self {
        Self::new(ChannelType::Collection, usage_page, usage, 0)
    }

    /// A button channel on the Button page. `number` is the 1-based button usage.
    pub fn button(number: u32, report_id: u8) -> Self {
        Self::new(ChannelType::Button, usage::PAGE_BUTTON, number, report_id)
    }

    /// An axis channel on the Generic Desktop page.
    pub fn axis(usage: u32, report_id: u8) -> Self {
        Self::new(
            ChannelType::Axis,
            usage::PAGE_GENERIC_DESKTOP,
            usage,
            report_id,
        )
    }

    pub fn with_field(mut self, field: FieldLayout) -> Self {
        self.field = Some(field);
        self
    }

    /// Record a fresh sample.
    #[inline]
    pub fn set_sample(&mut self, value: i32, timestamp: u64) {
        self.value = value;
        self.timestamp = Some(timestamp);
    }

    #[inline]
    pub fn is_collection(&self) -> bool {
        self.channel_type == ChannelType::Collection
    }

    /// Human-friendly usage name, for logs.
    pub fn name(&self) -> String {
        usage::usage_name(self.usage_page, self.usage)
    }
}
