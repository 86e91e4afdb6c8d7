//! Sets of integers stored as sorted, maximal, disjoint inclusive ranges.
//!
//! A [`RangeSet`] keeps a run of consecutive values such as `3, 4, 5` as a
//! single range `[3, 5]` rather than as three entries, which makes it a
//! compact representation for sets whose content is clustered. Insertion
//! and removal maintain the ranges maximally coalesced: adding a value
//! that bridges two ranges merges them, removing a value from the middle
//! of a range splits it.
//!
//! The set is generic over any scalar implementing [`Step`], which is
//! provided for the primitive integer types. [`IntRangeSet`] and
//! [`LongRangeSet`] are the 32-bit and 64-bit instantiations.
//!
//! ```
//! use rangeset::RangeSet;
//!
//! let mut set = RangeSet::new();
//! for &v in &[3, 4, 5, 9] {
//!     set.insert(v);
//! }
//! assert!(set.contains(4));
//! assert_eq!(set.len(), 4);
//! assert_eq!(set.range_count(), 2);
//! assert_eq!(set.to_string(), "[3...5, 9]");
//! ```

use std::convert::TryFrom;

pub mod range_set;

pub use range_set::{Range, RangeSet};

/// Range set over 32-bit signed integers.
pub type IntRangeSet = RangeSet<i32>;
/// Range set over 64-bit signed integers.
pub type LongRangeSet = RangeSet<i64>;

/// A discrete, totally ordered scalar with a computable successor.
///
/// `succ` and `pred` are checked: they return `None` at the ends of the
/// scalar's domain, so a [`RangeSet`] can hold the extreme values of its
/// scalar type without overflowing.
pub trait Step: Copy + Ord {
    /// The value immediately after `self`, or `None` if `self` is the
    /// greatest value of the domain.
    fn succ(self) -> Option<Self>;
    /// The value immediately before `self`, or `None` if `self` is the
    /// smallest value of the domain.
    fn pred(self) -> Option<Self>;
    /// Number of values in the inclusive interval `[lo, hi]`.
    ///
    /// Saturates at `u64::MAX`, which is only reachable when the interval
    /// covers the entire domain of a 64-bit scalar.
    fn span(lo: Self, hi: Self) -> u64;
}

macro_rules! impl_step {
    ($($t:ty)*) => {$(
        impl Step for $t {
            fn succ(self) -> Option<Self> {
                self.checked_add(1)
            }
            fn pred(self) -> Option<Self> {
                self.checked_sub(1)
            }
            fn span(lo: Self, hi: Self) -> u64 {
                debug_assert!(lo <= hi);
                let width = (hi as i128) - (lo as i128);
                u64::try_from(width)
                    .map(|w| w.saturating_add(1))
                    .unwrap_or(u64::MAX)
            }
        }
    )*};
}

impl_step!(i8 i16 i32 i64 u8 u16 u32 u64 isize usize);
