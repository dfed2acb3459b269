//! Raw report sampling.
//!
//! This is the host half of each packet: before the interpreter runs, every
//! classified channel carried by the incoming report gets its value extracted
//! from the report bytes and is stamped with the packet timestamp. Channels that
//! are not refreshed keep their old timestamp and are therefore ignored by the
//! interpreter for this packet.

use crate::channel::FieldLayout;
use crate::classifier::ClassifiedChannelSet;

/// Refresh the channels carried by one input report.
///
/// `payload` excludes the report-id byte. Returns how many channels were
/// refreshed. Channels whose field does not fit in `payload` are left stale.
pub fn sample_report(
    channels: &mut ClassifiedChannelSet,
    report_id: u8,
    timestamp: u64,
    payload: &[u8],
) -> usize {
    let mut refreshed = 0;

    for channel in channels.iter_mut() {
        if channel.report_id != report_id {
            continue;
        }
        let Some(field) = channel.field else {
            continue;
        };
        match extract_field(payload, &field) {
            Some(value) => {
                channel.set_sample(value, timestamp);
                refreshed += 1;
            }
            None => {
                tracing::debug!(
                    report_id,
                    usage = %channel.name(),
                    bit_offset = field.bit_offset,
                    bit_size = field.bit_size,
                    payload_len = payload.len(),
                    "field lies beyond short report"
                );
            }
        }
    }

    refreshed
}

/// Read one field from `payload`, LSB-first, sign-extending signed fields.
pub fn extract_field(payload: &[u8], field: &FieldLayout) -> Option<i32> {
    let size = field.bit_size;
    if size == 0 || size > 32 {
        return None;
    }

    let first_bit = field.bit_offset as usize;
    let last_bit = first_bit + size as usize - 1;
    if last_bit / 8 >= payload.len() {
        return None;
    }

    // A 32-bit field at an odd bit offset spans five bytes.
    let mut raw: u64 = 0;
    for (i, &byte) in payload[first_bit / 8..=last_bit / 8].iter().enumerate() {
        raw |= u64::from(byte) << (8 * i);
    }
    raw >>= first_bit % 8;
    let mask = if size == 32 { u64::from(u32::MAX) } else { (1u64 << size) - 1 };
    let raw = (raw & mask) as u32;

    let value = if field.signed && size < 32 {
        let shift = 32 - size;
        ((raw << shift) as i32) >> shift
    } else {
        raw as i32
    };
    Some(value)
}
