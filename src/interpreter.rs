//! Per-packet report interpretation.
//!
//! For every packet the host delivers, the interpreter walks the classified
//! channels, keeps only those sampled for this exact packet (same report id
//! and same timestamp), and turns their raw values into fixed-point motion,
//! scroll and button state.
//!
//! ## Scaling
//! - X/Y: `value << pointer_shift`. The default shift of 15 (not 16) makes a
//!   raw count worth half a pixel-unit; with acceleration removed, raw motion
//!   otherwise feels too slow.
//! - Wheel: `fixed(value << wheel_shift) * fixed(scroll_multiplier)`. The
//!   default `-3` inverts the wheel direction and triples its magnitude.
//!
//! ## Ordering
//! Channels are visited in classification order. Within a packet a later
//! channel with the same usage overwrites an earlier one; nothing accumulates
//! across packets except the button mask.

use serde::{Deserialize, Serialize};

use crate::buttons::ButtonState;
use crate::error::{Error, Result};
use crate::channel::InputChannel;
use crate::classifier::ClassifiedChannelSet;
use crate::event::{PointerEvent, ScrollEvent};
use crate::fixed::{Fixed, FRAC_BITS};
use crate::usage::{self, PAGE_BUTTON, PAGE_GENERIC_DESKTOP};

/// Default X/Y shift.
pub const DEFAULT_POINTER_SHIFT: u32 = 15;
/// Default wheel shift (exact integer → 16.16 conversion).
pub const DEFAULT_WHEEL_SHIFT: u32 = FRAC_BITS;
/// Default scroll multiplier, applied as a 16.16 integer.
pub const DEFAULT_SCROLL_MULTIPLIER: i32 = -3;

/// Largest shift a 32-bit raw value can take.
pub const MAX_SHIFT: u32 = 31;

/// Tuning values for the raw → fixed-point conversion.
///
/// The defaults reproduce the stock behavior; an empty config section keeps them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalingConfig {
    pub pointer_shift: u32,
    pub wheel_shift: u32,
    pub scroll_multiplier: i32,
}

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            pointer_shift: DEFAULT_POINTER_SHIFT,
            wheel_shift: DEFAULT_WHEEL_SHIFT,
            scroll_multiplier: DEFAULT_SCROLL_MULTIPLIER,
        }
    }
}

impl ScalingConfig {
    /// Reject shifts a raw `i32` sample cannot take.
    pub fn validate(&self) -> Result<()> {
        for (name, shift) in [("pointer_shift", self.pointer_shift), ("wheel_shift", self.wheel_shift)] {
            if shift > MAX_SHIFT {
                return Err(Error::invalid_config(format!(
                    "scaling.{name} = {shift} is outside 0..={MAX_SHIFT}"
                )));
            }
        }
        Ok(())
    }
}

/// Identity of one incoming packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Packet {
    pub timestamp: u64,
    pub report_id: u8,
}

impl Packet {
    pub fn new(timestamp: u64, report_id: u8) -> Self {
        Self {
            timestamp,
            report_id,
        }
    }

    /// Whether `channel` was sampled for this packet.
    #[inline]
    pub fn matches(&self, channel: &InputChannel) -> bool {
        channel.report_id == self.report_id && channel.timestamp == Some(self.timestamp)
    }
}

/// Output of one interpretation: both events plus the mask to persist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interpretation {
    pub pointer: PointerEvent,
    pub scroll: ScrollEvent,
    pub buttons: ButtonState,
}

/// Stateless packet interpreter. The button mask is passed in and returned.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReportInterpreter {
    scaling: ScalingConfig,
}

impl ReportInterpreter {
    pub fn new(scaling: ScalingConfig) -> Self {
        Self { scaling }
    }

    pub fn scaling(&self) -> &ScalingConfig {
        &self.scaling
    }

    /// Interpret one packet. Never fails; a packet that touches no classified
    /// channel yields zero deltas and returns `buttons` unchanged.
    pub fn interpret(
        &self,
        packet: Packet,
        channels: &ClassifiedChannelSet,
        mut buttons: ButtonState,
    ) -> Interpretation {
        let mut dx = Fixed::ZERO;
        let mut dy = Fixed::ZERO;
        let mut vertical = Fixed::ZERO;
        let mut contributed = 0usize;

        for channel in channels.iter().filter(|c| packet.matches(c)) {
            let value = channel.value;
            contributed += 1;

            match (channel.usage_page, channel.usage) {
                (PAGE_GENERIC_DESKTOP, usage::GD_X) => {
                    dx = Fixed::shifted(value, self.scaling.pointer_shift);
                }
                (PAGE_GENERIC_DESKTOP, usage::GD_Y) => {
                    dy = Fixed::shifted(value, self.scaling.pointer_shift);
                }
                (PAGE_GENERIC_DESKTOP, usage::GD_WHEEL) => {
                    vertical = Fixed::shifted(value, self.scaling.wheel_shift)
                        .mul(Fixed::from_int(self.scaling.scroll_multiplier));
                }
                (PAGE_BUTTON, u) if (usage::BUTTON_1..=usage::BUTTON_255).contains(&u) => {
                    let index = u - usage::BUTTON_1;
                    if !buttons.apply(index, value) {
                        tracing::debug!(
                            button = u,
                            index,
                            "button index exceeds mask width; sample ignored"
                        );
                    }
                }
                _ => {}
            }
        }

        tracing::trace!(
            timestamp = packet.timestamp,
            report_id = packet.report_id,
            contributed,
            dx = %dx,
            dy = %dy,
            scroll = %vertical,
            buttons = %buttons,
            "interpreted packet"
        );

        Interpretation {
            pointer: PointerEvent::new(packet.timestamp, dx, dy, buttons),
            scroll: ScrollEvent::vertical(packet.timestamp, vertical),
            buttons,
        }
    }
}
