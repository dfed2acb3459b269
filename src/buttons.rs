//! Persistent button bitmask.

use serde::{Deserialize, Serialize};

/// Width of the button mask.
pub const MAX_BUTTONS: u32 = 32;

/// Pressed/released state of up to [`MAX_BUTTONS`] buttons; bit `i` is button `i + 1`.
///
/// Lives on the attached device and is carried from packet to packet. Only the
/// bits of buttons that report in a packet change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ButtonState(pub u32);

impl ButtonState {
    pub const NONE: ButtonState = ButtonState(0);

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Apply one button sample: `0` clears the bit, anything else sets it.
    ///
    /// Returns `false` and leaves the mask alone when `index` does not fit.
    #[inline]
    pub fn apply(&mut self, index: u32, value: i32) -> bool {
        if index >= MAX_BUTTONS {
            return false;
        }
        let mask = 1u32 << index;
        if value == 0 {
            self.0 &= !mask;
        } else {
            self.0 |= mask;
        }
        true
    }

    #[inline]
    pub fn is_pressed(self, index: u32) -> bool {
        index < MAX_BUTTONS && self.0 & (1 << index) != 0
    }

    /// Indices of pressed buttons, ascending.
    pub fn pressed(self) -> impl Iterator<Item = u32> {
        (0..MAX_BUTTONS).filter(move |&i| self.is_pressed(i))
    }
}

impl std::fmt::Display for ButtonState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#010b}", self.0)
    }
}
