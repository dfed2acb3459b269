//! 16.16 fixed-point quantities.
//!
//! Motion and scroll deltas are carried as signed 32-bit integers whose low
//! 16 bits are the fractional part. All conversions are computed in 64 bits and
//! saturate at the `i32` bounds rather than wrapping.

use serde::{Deserialize, Serialize};

/// Number of fractional bits.
pub const FRAC_BITS: u32 = 16;

/// A signed 16.16 fixed-point number.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fixed(pub i32);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(1 << FRAC_BITS);

    /// Raw 16.16 representation.
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Integer `v` as a full 16.16 number.
    #[inline]
    pub fn from_int(v: i32) -> Self {
        Self::shifted(v, FRAC_BITS)
    }

    /// `v << shift`, saturated into `i32`.
    ///
    /// A shift of 16 is an exact integer conversion; smaller shifts scale the
    /// value down, larger ones scale it up.
    #[inline]
    pub fn shifted(v: i32, shift: u32) -> Self {
        let wide = i64::from(v) << shift.min(32);
        Self(saturate(wide))
    }

    /// Fixed-point product: `(a * b) >> 16`, arithmetic shift, saturated.
    #[inline]
    pub fn mul(self, rhs: Fixed) -> Self {
        let wide = (i64::from(self.0) * i64::from(rhs.0)) >> FRAC_BITS;
        Self(saturate(wide))
    }

    /// Lossy conversion for display and logging.
    #[inline]
    pub fn to_f64(self) -> f64 {
        f64::from(self.0) / f64::from(1u32 << FRAC_BITS)
    }
}

impl std::fmt::Display for Fixed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}", self.to_f64())
    }
}

#[inline]
fn saturate(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
