//! HID report descriptor reader.
//!
//! Turns the descriptor bytes a device reports into the flat channel list the
//! classifier consumes. Only what a simple pointer needs is understood:
//!
//! - Global items: Usage Page, Logical Min/Max, Report Size/Count, Report ID, Push/Pop
//! - Local items: Usage (including 32-bit extended usages), Usage Min/Max
//! - Main items: Input, Collection, End Collection
//!
//! Output and Feature items are skipped, as are array (selector) inputs. Their
//! bits still advance the input offset where relevant so later fields line up.
//!
//! ## Emitted channels
//! - One [`ChannelType::Collection`] per collection.
//! - One channel per variable Input field (Report Count fields per item).
//! - Constant Input fields become usage-0 padding channels.
//!
//! Bit offsets are tracked per report id and exclude the report-id byte.

use std::collections::HashMap;

use crate::channel::{ChannelType, FieldLayout, InputChannel};
use crate::error::{Error, Result};
use crate::usage::PAGE_BUTTON;

// Item types (bits 2..3 of the prefix).
const TYPE_MAIN: u8 = 0;
const TYPE_GLOBAL: u8 = 1;
const TYPE_LOCAL: u8 = 2;

// Main item tags.
const MAIN_INPUT: u8 = 0x8;
const MAIN_OUTPUT: u8 = 0x9;
const MAIN_COLLECTION: u8 = 0xA;
const MAIN_FEATURE: u8 = 0xB;
const MAIN_END_COLLECTION: u8 = 0xC;

// Global item tags.
const GLOBAL_USAGE_PAGE: u8 = 0x0;
const GLOBAL_LOGICAL_MIN: u8 = 0x1;
const GLOBAL_LOGICAL_MAX: u8 = 0x2;
const GLOBAL_REPORT_SIZE: u8 = 0x7;
const GLOBAL_REPORT_ID: u8 = 0x8;
const GLOBAL_REPORT_COUNT: u8 = 0x9;
const GLOBAL_PUSH: u8 = 0xA;
const GLOBAL_POP: u8 = 0xB;

// Local item tags.
const LOCAL_USAGE: u8 = 0x0;
const LOCAL_USAGE_MIN: u8 = 0x1;
const LOCAL_USAGE_MAX: u8 = 0x2;

const LONG_ITEM_PREFIX: u8 = 0xFE;

// Input item flag bits.
const FLAG_CONSTANT: u32 = 1 << 0;
const FLAG_VARIABLE: u32 = 1 << 1;

/// Widest field the sampler can read into an `i32`.
const MAX_FIELD_BITS: u32 = 32;

/// Largest input report accepted, in bytes, excluding the report-id byte.
pub const MAX_REPORT_LEN: usize = 4096;
const MAX_REPORT_BITS: u32 = (MAX_REPORT_LEN * 8) as u32;

#[derive(Clone, Copy, Debug, Default)]
struct Globals {
    usage_page: u16,
    logical_min: i32,
    logical_max: i32,
    report_size: u32,
    report_count: u32,
    report_id: u8,
}

/// A local usage, with its page when the item carried one (extended usage).
#[derive(Clone, Copy, Debug)]
struct LocalUsage {
    page: Option<u16>,
    usage: u32,
}

#[derive(Debug, Default)]
struct Locals {
    usages: Vec<LocalUsage>,
    usage_min: Option<LocalUsage>,
    usage_max: Option<LocalUsage>,
}

impl Locals {
    /// Usage for the `i`th field of a main item, resolved against `page`.
    fn resolve(&self, i: u32, page: u16) -> (u16, u32) {
        if let Some(last) = self.usages.last() {
            let u = self.usages.get(i as usize).unwrap_or(last);
            return (u.page.unwrap_or(page), u.usage);
        }
        if let (Some(min), Some(max)) = (self.usage_min, self.usage_max) {
            let usage = min.usage.saturating_add(i).min(max.usage);
            return (min.page.unwrap_or(page), usage);
        }
        (page, 0)
    }
}

/// One parsed short item.
struct Item<'a> {
    offset: usize,
    item_type: u8,
    tag: u8,
    data: &'a [u8],
}

impl Item<'_> {
    fn unsigned(&self) -> u32 {
        self.data
            .iter()
            .rev()
            .fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
    }

    fn signed(&self) -> i32 {
        let raw = self.unsigned();
        match self.data.len() {
            1 => raw as u8 as i8 as i32,
            2 => raw as u16 as i16 as i32,
            _ => raw as i32,
        }
    }
}

fn next_item(bytes: &[u8], offset: usize) -> Result<(Item<'_>, usize)> {
    let prefix = bytes[offset];
    if prefix == LONG_ITEM_PREFIX {
        return Err(Error::descriptor(offset, "long items are not supported"));
    }

    let size = match prefix & 0x03 {
        3 => 4,
        n => n as usize,
    };
    let start = offset + 1;
    let end = start + size;
    if end > bytes.len() {
        return Err(Error::descriptor(
            offset,
            format!("item needs {size} data byte(s), descriptor ends first"),
        ));
    }

    let item = Item {
        offset,
        item_type: (prefix >> 2) & 0x03,
        tag: prefix >> 4,
        data: &bytes[start..end],
    };
    Ok((item, end))
}

/// Parse a report descriptor into the device's declared input channels.
pub fn parse_report_descriptor(bytes: &[u8]) -> Result<Vec<InputChannel>> {
    let mut channels = Vec::new();
    let mut globals = Globals::default();
    let mut stack: Vec<Globals> = Vec::new();
    let mut locals = Locals::default();
    let mut depth = 0usize;
    let mut bit_offsets: HashMap<u8, u32> = HashMap::new();

    let mut offset = 0;
    while offset < bytes.len() {
        let (item, next) = next_item(bytes, offset)?;
        offset = next;

        match item.item_type {
            TYPE_MAIN => {
                match item.tag {
                    MAIN_INPUT => {
                        read_input(&item, &globals, &locals, &mut bit_offsets, &mut channels)?;
                    }
                    MAIN_COLLECTION => {
                        let (page, usage) = locals.resolve(0, globals.usage_page);
                        channels.push(InputChannel::collection(page, usage));
                        depth += 1;
                    }
                    MAIN_END_COLLECTION => {
                        if depth == 0 {
                            return Err(Error::descriptor(
                                item.offset,
                                "End Collection without open collection",
                            ));
                        }
                        depth -= 1;
                    }
                    MAIN_OUTPUT | MAIN_FEATURE => {}
                    other => {
                        tracing::debug!(offset = item.offset, tag = other, "unknown main item skipped");
                    }
                }
                locals = Locals::default();
            }
            TYPE_GLOBAL => match item.tag {
                GLOBAL_USAGE_PAGE => globals.usage_page = item.unsigned() as u16,
                GLOBAL_LOGICAL_MIN => globals.logical_min = item.signed(),
                GLOBAL_LOGICAL_MAX => globals.logical_max = item.signed(),
                GLOBAL_REPORT_SIZE => globals.report_size = item.unsigned(),
                GLOBAL_REPORT_COUNT => globals.report_count = item.unsigned(),
                GLOBAL_REPORT_ID => {
                    let id = item.unsigned();
                    if id == 0 || id > u32::from(u8::MAX) {
                        return Err(Error::descriptor(item.offset, format!("invalid report id {id}")));
                    }
                    globals.report_id = id as u8;
                }
                GLOBAL_PUSH => stack.push(globals),
                GLOBAL_POP => {
                    globals = stack
                        .pop()
                        .ok_or_else(|| Error::descriptor(item.offset, "Pop without Push"))?;
                }
                _ => {}
            },
            TYPE_LOCAL => {
                let local = local_usage(&item);
                match item.tag {
                    LOCAL_USAGE => locals.usages.push(local),
                    LOCAL_USAGE_MIN => locals.usage_min = Some(local),
                    LOCAL_USAGE_MAX => locals.usage_max = Some(local),
                    _ => {}
                }
            }
            _ => {
                tracing::debug!(offset = item.offset, "reserved item type skipped");
            }
        }
    }

    if depth != 0 {
        return Err(Error::descriptor(bytes.len(), format!("{depth} collection(s) left open")));
    }

    Ok(channels)
}

fn local_usage(item: &Item<'_>) -> LocalUsage {
    let raw = item.unsigned();
    if item.data.len() == 4 {
        LocalUsage {
            page: Some((raw >> 16) as u16),
            usage: raw & 0xFFFF,
        }
    } else {
        LocalUsage {
            page: None,
            usage: raw,
        }
    }
}

fn read_input(
    item: &Item<'_>,
    globals: &Globals,
    locals: &Locals,
    bit_offsets: &mut HashMap<u8, u32>,
    channels: &mut Vec<InputChannel>,
) -> Result<()> {
    let flags = item.unsigned();
    let report_id = globals.report_id;
    let size = globals.report_size;
    let count = globals.report_count;
    let start = bit_offsets.get(&report_id).copied().unwrap_or(0);

    let total = size
        .checked_mul(count)
        .and_then(|bits| bits.checked_add(start))
        .filter(|&bits| bits <= MAX_REPORT_BITS)
        .ok_or_else(|| {
            Error::descriptor(
                item.offset,
                format!("input report {report_id} exceeds {MAX_REPORT_LEN} bytes"),
            )
        })?;
    bit_offsets.insert(report_id, total);

    if flags & FLAG_CONSTANT != 0 {
        let mut padding = InputChannel::new(ChannelType::Misc, globals.usage_page, 0, report_id);
        if size <= MAX_FIELD_BITS && count == 1 {
            padding.field = Some(FieldLayout {
                bit_offset: start,
                bit_size: size,
                signed: false,
            });
        }
        channels.push(padding);
        return Ok(());
    }

    if flags & FLAG_VARIABLE == 0 {
        tracing::debug!(
            offset = item.offset,
            report_id,
            count,
            "array input skipped"
        );
        return Ok(());
    }

    if size == 0 || size > MAX_FIELD_BITS {
        return Err(Error::descriptor(
            item.offset,
            format!("report size {size} is outside 1..={MAX_FIELD_BITS}"),
        ));
    }

    let signed = globals.logical_min < 0;
    for i in 0..count {
        let (page, usage) = locals.resolve(i, globals.usage_page);
        let channel_type = if page == PAGE_BUTTON {
            ChannelType::Button
        } else {
            ChannelType::Axis
        };
        let field = FieldLayout {
            bit_offset: start + i * size,
            bit_size: size,
            signed,
        };
        channels.push(InputChannel::new(channel_type, page, usage, report_id).with_field(field));
    }

    Ok(())
}

/// Whether reports from this device carry a leading report-id byte.
pub fn uses_report_ids<'a, I>(channels: I) -> bool
where
    I: IntoIterator<Item = &'a InputChannel>,
{
    channels.into_iter().any(|c| c.report_id != 0)
}

/// Longest input payload, in bytes, any declared field reaches. Excludes the
/// report-id byte.
pub fn report_len<'a, I>(channels: I) -> usize
where
    I: IntoIterator<Item = &'a InputChannel>,
{
    channels
        .into_iter()
        .filter_map(|c| c.field)
        .map(|f| (f.bit_offset as usize + f.bit_size as usize).div_ceil(8))
        .max()
        .unwrap_or(0)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::usage::*;

    fn leaf(channels: &[InputChannel]) -> Vec<&InputChannel> {
        channels.iter().filter(|c| !c.is_collection()).collect()
    }

    #[test]
    fn parses_boot_style_mouse() {
        let channels = parse_report_descriptor(fixtures::MOUSE).unwrap();

        let collections: Vec<_> = channels.iter().filter(|c| c.is_collection()).collect();
        assert_eq!(collections.len(), 2);
        assert_eq!(collections[0].usage, GD_MOUSE);
        assert_eq!(collections[1].usage, GD_POINTER);

        let leaves = leaf(&channels);
        // 5 buttons + padding + X + Y + wheel
        assert_eq!(leaves.len(), 9);
        for (i, b) in leaves[..5].iter().enumerate() {
            assert_eq!(b.channel_type, ChannelType::Button);
            assert_eq!(b.usage_page, PAGE_BUTTON);
            assert_eq!(b.usage, i as u32 + 1);
            assert_eq!(
                b.field,
                Some(FieldLayout {
                    bit_offset: i as u32,
                    bit_size: 1,
                    signed: false
                })
            );
        }

        let padding = leaves[5];
        assert_eq!(padding.usage, 0);
        assert_eq!(padding.channel_type, ChannelType::Misc);

        let x = leaves[6];
        assert_eq!((x.usage_page, x.usage), (PAGE_GENERIC_DESKTOP, GD_X));
        assert_eq!(
            x.field,
            Some(FieldLayout {
                bit_offset: 8,
                bit_size: 8,
                signed: true
            })
        );
        assert_eq!(leaves[7].usage, GD_Y);
        assert_eq!(leaves[7].field.unwrap().bit_offset, 16);
        assert_eq!(leaves[8].usage, GD_WHEEL);
        assert_eq!(leaves[8].field.unwrap().bit_offset, 24);

        assert!(!uses_report_ids(&channels));
    }

    #[test]
    fn offsets_are_tracked_per_report_id() {
        let channels = parse_report_descriptor(fixtures::MOUSE_WITH_REPORT_IDS).unwrap();
        let leaves = leaf(&channels);

        let x = leaves.iter().find(|c| c.usage == GD_X && c.usage_page == PAGE_GENERIC_DESKTOP).unwrap();
        assert_eq!(x.report_id, 1);
        assert_eq!(x.field.unwrap().bit_offset, 8);
        assert_eq!(x.field.unwrap().bit_size, 16);

        let wheel = leaves.iter().find(|c| c.usage == GD_WHEEL).unwrap();
        assert_eq!(wheel.report_id, 2);
        assert_eq!(wheel.field.unwrap().bit_offset, 0);

        assert!(uses_report_ids(&channels));
    }

    #[test]
    fn keyboard_array_is_skipped() {
        let channels = parse_report_descriptor(fixtures::KEYBOARD).unwrap();
        let leaves = leaf(&channels);
        // 8 modifiers + reserved padding; the key array produces nothing.
        assert_eq!(leaves.len(), 9);
        assert!(leaves[..8].iter().all(|c| c.usage_page == 0x07));
    }

    #[test]
    fn extended_usage_carries_its_own_page() {
        let bytes = [
            0x05, 0x01, // Usage Page (Generic Desktop)
            0xA1, 0x00, // Collection (Physical)
            0x0B, 0x02, 0x00, 0x09, 0x00, // Usage (Button:2), extended
            0x15, 0x00, 0x25, 0x01, 0x75, 0x01, 0x95, 0x01, //
            0x81, 0x02, // Input
            0xC0,
        ];
        let channels = parse_report_descriptor(&bytes).unwrap();
        let leaves = leaf(&channels);
        assert_eq!(leaves.len(), 1);
        assert_eq!((leaves[0].usage_page, leaves[0].usage), (PAGE_BUTTON, 2));
        assert_eq!(leaves[0].channel_type, ChannelType::Button);
    }

    #[test]
    fn push_pop_restores_globals() {
        let bytes = [
            0x05, 0x01, // Usage Page (Generic Desktop)
            0x75, 0x08, 0x95, 0x01, 0x15, 0x81, 0x25, 0x7F, //
            0xA4, // Push
            0x05, 0x09, 0x75, 0x01, // Usage Page (Button), Report Size (1)
            0xB4, // Pop
            0x09, 0x30, // Usage (X)
            0x81, 0x06, // Input
        ];
        let channels = parse_report_descriptor(&bytes).unwrap();
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].usage_page, PAGE_GENERIC_DESKTOP);
        assert_eq!(channels[0].field.unwrap().bit_size, 8);
    }

    #[test]
    fn malformed_descriptors_are_rejected() {
        // Truncated two-byte item.
        assert!(matches!(
            parse_report_descriptor(&[0x05, 0x01, 0x26, 0xFF]),
            Err(Error::Descriptor { offset: 2, .. })
        ));
        // Stray End Collection.
        assert!(parse_report_descriptor(&[0xC0]).is_err());
        // Unclosed collection.
        assert!(parse_report_descriptor(&[0xA1, 0x01]).is_err());
        // Pop without Push.
        assert!(parse_report_descriptor(&[0xB4]).is_err());
        // Long item.
        assert!(parse_report_descriptor(&[0xFE, 0x00, 0x00]).is_err());
        // Report ID 0.
        assert!(parse_report_descriptor(&[0x85, 0x00]).is_err());
        // 40-bit variable field.
        assert!(parse_report_descriptor(&[0x75, 0x28, 0x95, 0x01, 0x09, 0x30, 0x81, 0x02]).is_err());
    }

    #[test]
    fn oversized_report_count_is_rejected_before_allocating() {
        // Report Count (0x400000) of one-bit buttons.
        let huge = [
            0x05, 0x09, 0x19, 0x01, 0x29, 0x08, 0x75, 0x01, //
            0x97, 0x00, 0x00, 0x40, 0x00, 0x81, 0x02,
        ];
        assert!(matches!(
            parse_report_descriptor(&huge),
            Err(Error::Descriptor { offset: 13, .. })
        ));

        // Constant padding is held to the same limit.
        let padding = [0x75, 0x08, 0x97, 0xFF, 0xFF, 0xFF, 0xFF, 0x81, 0x01];
        assert!(parse_report_descriptor(&padding).is_err());

        // Exactly the limit is still accepted.
        let limit = [0x75, 0x08, 0x96, 0x00, 0x10, 0x81, 0x01];
        let channels = parse_report_descriptor(&limit).unwrap();
        assert_eq!(channels.len(), 1);
    }

    #[test]
    fn report_len_covers_the_furthest_field() {
        let mouse = parse_report_descriptor(fixtures::MOUSE).unwrap();
        assert_eq!(report_len(&mouse), 4);

        // Report 1 (buttons, padding, 16-bit X/Y) is the longer of the two.
        let split = parse_report_descriptor(fixtures::MOUSE_WITH_REPORT_IDS).unwrap();
        assert_eq!(report_len(&split), 5);

        assert_eq!(report_len(&[]), 0);
    }

    #[test]
    fn usage_range_clamps_at_maximum() {
        let bytes = [
            0x05, 0x09, 0x19, 0x01, 0x29, 0x02, // Button 1..=2
            0x75, 0x01, 0x95, 0x04, 0x81, 0x02, // four one-bit fields
        ];
        let channels = parse_report_descriptor(&bytes).unwrap();
        let usages: Vec<u32> = channels.iter().map(|c| c.usage).collect();
        assert_eq!(usages, vec![1, 2, 2, 2]);
    }
}
