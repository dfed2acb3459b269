//! Synthesized events.
//!
//! Each interpreted packet produces exactly one [`PointerEvent`] and one
//! [`ScrollEvent`], even when no channel contributed (zero deltas, button mask
//! carried over). Both always carry [`Acceleration::Disabled`] so nothing
//! downstream reapplies a curve.
//!
//! ## Units
//! - `dx`/`dy`/`vertical` are 16.16 fixed point (see [`Fixed`]).
//! - `timestamp` is whatever the host stamped the packet with; the interpreter
//!   passes it through untouched.

use serde::{Deserialize, Serialize};

use crate::buttons::ButtonState;
use crate::fixed::Fixed;

/// Whether the pointer stack may apply its acceleration curve to an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Acceleration {
    /// Deltas are final; no curve may be applied.
    #[default]
    Disabled,
}

/// Relative pointer motion plus the full button mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub timestamp: u64,
    pub dx: Fixed,
    pub dy: Fixed,
    pub buttons: ButtonState,
    pub acceleration: Acceleration,
}

/// Relative scroll-wheel motion. Horizontal scroll is always zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollEvent {
    pub timestamp: u64,
    pub vertical: Fixed,
    pub horizontal: Fixed,
    pub acceleration: Acceleration,
}

/// Either kind of synthesized event, for sinks that handle both uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SynthesizedEvent {
    Pointer(PointerEvent),
    Scroll(ScrollEvent),
}

impl PointerEvent {
    pub fn new(timestamp: u64, dx: Fixed, dy: Fixed, buttons: ButtonState) -> Self {
        Self {
            timestamp,
            dx,
            dy,
            buttons,
            acceleration: Acceleration::Disabled,
        }
    }
}

impl ScrollEvent {
    pub fn vertical(timestamp: u64, vertical: Fixed) -> Self {
        Self {
            timestamp,
            vertical,
            horizontal: Fixed::ZERO,
            acceleration: Acceleration::Disabled,
        }
    }
}

impl SynthesizedEvent {
    pub fn timestamp(&self) -> u64 {
        match self {
            SynthesizedEvent::Pointer(p) => p.timestamp,
            SynthesizedEvent::Scroll(s) => s.timestamp,
        }
    }
}
