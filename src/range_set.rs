use crate::Step;
use itertools::Itertools;
use std::collections::{btree_map, BTreeMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;
use std::ops::Bound::{Excluded, Unbounded};

/// An inclusive interval `[min, max]` of consecutive values, the unit of
/// compressed storage in a [`RangeSet`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Range<T> {
    pub min: T,
    pub max: T,
}

impl<T: Step> Range<T> {
    pub fn new(min: T, max: T) -> Range<T> {
        debug_assert!(min <= max);
        Range { min, max }
    }

    pub fn contains(&self, x: T) -> bool {
        self.min <= x && x <= self.max
    }

    /// Number of values in the interval.
    pub fn size(&self) -> u64 {
        T::span(self.min, self.max)
    }

    pub fn is_singleton(&self) -> bool {
        self.min == self.max
    }
}

impl<T: PartialEq + fmt::Display> fmt::Display for Range<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}...{}", self.min, self.max)
        }
    }
}

/// A set of integers stored as sorted, maximal, disjoint inclusive ranges.
///
/// Each stored range is an entry of a `BTreeMap` keyed by its `min` and
/// valued by its `max`, so membership, insertion and removal cost
/// `O(log r)` in the number of stored ranges rather than in the number of
/// elements. The ranges are kept pairwise disjoint and never adjacent:
/// inserting a value that bridges two ranges merges them into one, and
/// removing a value from the interior of a range splits it in two.
///
/// The element count is maintained exactly: it is the sum of the widths
/// of the stored ranges at all times, including after removals.
///
/// The set is not synchronized; concurrent use requires external locking.
///
/// # Example
/// ```
/// use rangeset::RangeSet;
/// let mut set = RangeSet::new();
/// set.insert(1);
/// set.insert(2);
/// set.insert(3);
/// assert_eq!(set.range_count(), 1); // stored as the single range [1...3]
/// set.remove(2);
/// assert_eq!(set.range_count(), 2); // split into [1] and [3]
/// assert_eq!(set.len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct RangeSet<T> {
    /// Maps the `min` of each stored range to its inclusive `max`.
    ranges: BTreeMap<T, T>,
    /// Number of values represented by the ranges.
    len: u64,
}

impl<T: Step> RangeSet<T> {
    pub fn new() -> RangeSet<T> {
        RangeSet {
            ranges: BTreeMap::new(),
            len: 0,
        }
    }

    /// Number of elements in the set (not the number of stored ranges).
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Number of maximal disjoint ranges the elements are stored as.
    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }

    pub fn clear(&mut self) {
        self.ranges.clear();
        self.len = 0;
    }

    pub fn contains(&self, x: T) -> bool {
        self.floor(x).map_or(false, |(_, max)| x <= max)
    }

    /// Smallest element of the set, if any.
    pub fn first(&self) -> Option<T> {
        self.ranges.iter().next().map(|(&min, _)| min)
    }

    /// Greatest element of the set, if any.
    pub fn last(&self) -> Option<T> {
        self.ranges.iter().next_back().map(|(_, &max)| max)
    }

    /// Adds `x` to the set. Returns `true` if it was not already present.
    ///
    /// The stored ranges are re-coalesced as needed: `x` may extend a
    /// range by one at either end, or bridge two ranges that it makes
    /// adjacent, in which case they are merged into a single one.
    pub fn insert(&mut self, x: T) -> bool {
        if let Some((min, max)) = self.floor(x) {
            if x <= max {
                return false;
            }
            if max.succ() == Some(x) {
                // x extends the floor range upward; absorb the upper
                // neighbour if the widened range now touches it
                let mut new_max = x;
                if let Some((next_min, next_max)) = self.upper_neighbour(x) {
                    self.ranges.remove(&next_min);
                    new_max = next_max;
                }
                self.ranges.insert(min, new_max);
                self.len += 1;
                debug_assert!(self.invariants_hold());
                return true;
            }
        }
        // x is below every stored range or strictly inside a gap: widen
        // the range starting at x + 1 downward or start a fresh singleton
        match self.upper_neighbour(x) {
            Some((next_min, next_max)) => {
                self.ranges.remove(&next_min);
                self.ranges.insert(x, next_max);
            }
            None => {
                self.ranges.insert(x, x);
            }
        }
        self.len += 1;
        debug_assert!(self.invariants_hold());
        true
    }

    /// Removes `x` from the set. Returns `true` if it was present.
    ///
    /// Removing the interior value of a range splits it in two; removing
    /// an endpoint shrinks the range (re-keying it when `min` changes).
    pub fn remove(&mut self, x: T) -> bool {
        let (min, max) = match self.floor(x) {
            Some((min, max)) if x <= max => (min, max),
            _ => return false,
        };
        if min == max {
            self.ranges.remove(&min);
        } else if x == max {
            // shrink from the top, the key is unchanged
            let below = x.pred().expect("x is above min");
            self.ranges.insert(min, below);
        } else if x == min {
            // shrink from the bottom: min changes, so the entry is re-keyed
            let above = x.succ().expect("x is below max");
            self.ranges.remove(&min);
            self.ranges.insert(above, max);
        } else {
            // interior removal splits the range in two
            let below = x.pred().expect("x is above min");
            let above = x.succ().expect("x is below max");
            self.ranges.insert(min, below);
            self.ranges.insert(above, max);
        }
        self.len -= 1;
        debug_assert!(self.invariants_hold());
        true
    }

    /// Iterates over the elements in ascending order.
    pub fn iter(&self) -> Elements<'_, T> {
        Elements {
            inner: self.ranges.iter(),
            current: None,
        }
    }

    /// The maximal disjoint ranges of the set, in ascending order.
    pub fn ranges(&self) -> impl Iterator<Item = Range<T>> + '_ {
        self.ranges.iter().map(|(&min, &max)| Range { min, max })
    }

    /// A forward cursor over the elements that supports removing the
    /// element it last yielded. See [`Cursor`].
    pub fn cursor(&mut self) -> Cursor<'_, T> {
        Cursor {
            set: self,
            last: None,
            removable: false,
        }
    }

    /// The stored range with the greatest `min <= x`, if any.
    fn floor(&self, x: T) -> Option<(T, T)> {
        self.ranges
            .range(..=x)
            .next_back()
            .map(|(&min, &max)| (min, max))
    }

    /// The range keyed exactly at `x + 1`, if any.
    fn upper_neighbour(&self, x: T) -> Option<(T, T)> {
        let next = x.succ()?;
        self.ranges.get(&next).map(|&max| (next, max))
    }

    /// Smallest element strictly greater than `x`, if any.
    fn next_above(&self, x: T) -> Option<T> {
        if let Some((_, max)) = self.floor(x) {
            if x < max {
                return x.succ();
            }
        }
        self.ranges
            .range((Excluded(x), Unbounded))
            .next()
            .map(|(&min, _)| min)
    }

    /// Structural audit backing the `debug_assert!`s of the mutating
    /// operations: ranges are well formed, sorted, pairwise disjoint with
    /// a gap of at least one value between them, and `len` equals their
    /// total width.
    fn invariants_hold(&self) -> bool {
        let mut total = 0u64;
        let mut prev_max: Option<T> = None;
        for (&min, &max) in &self.ranges {
            if min > max {
                return false;
            }
            if let Some(prev) = prev_max {
                match prev.succ() {
                    Some(s) if s < min => {}
                    _ => return false,
                }
            }
            total = total.saturating_add(T::span(min, max));
            prev_max = Some(max);
        }
        total == self.len
    }
}

impl<T: Step> Default for RangeSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Two sets are equal iff they store the same maximal disjoint ranges.
/// Since the representation is canonical, this coincides with the sets
/// containing the same elements.
impl<T: Step> PartialEq for RangeSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ranges == other.ranges
    }
}
impl<T: Step> Eq for RangeSet<T> {}

impl<T: Step + Hash> Hash for RangeSet<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ranges.hash(state);
    }
}

impl<T: Step> Extend<T> for RangeSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for x in iter {
            self.insert(x);
        }
    }
}

impl<T: Step> FromIterator<T> for RangeSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = RangeSet::new();
        set.extend(iter);
        set
    }
}

/// Renders the maximal ranges in ascending order, e.g. `[1...5, 8, 10...12]`.
///
/// Diagnostic output, not a persisted format.
impl<T: Step + fmt::Display> fmt::Display for RangeSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.ranges().format(", "))
    }
}

impl<'a, T: Step> IntoIterator for &'a RangeSet<T> {
    type Item = T;
    type IntoIter = Elements<'a, T>;

    fn into_iter(self) -> Elements<'a, T> {
        self.iter()
    }
}

/// Lazy iterator over the elements of a [`RangeSet`] in ascending order,
/// expanding each stored range into its member values.
pub struct Elements<'a, T> {
    inner: btree_map::Iter<'a, T, T>,
    /// Next value to yield and the inclusive end of the range being
    /// expanded, or `None` when the next range must be fetched.
    current: Option<(T, T)>,
}

impl<T: Step> Iterator for Elements<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let (value, max) = match self.current {
            Some(c) => c,
            None => {
                let (&min, &max) = self.inner.next()?;
                (min, max)
            }
        };
        self.current = if value < max {
            value.succ().map(|n| (n, max))
        } else {
            None
        };
        Some(value)
    }
}

/// Forward cursor over a [`RangeSet`], yielding elements in ascending
/// order and allowing removal of the element it last yielded.
///
/// Unlike [`RangeSet::iter`], the cursor borrows the set mutably and
/// re-derives its position from the stored ranges on every step, so a
/// [`remove`](Cursor::remove) of the last yielded value (which can only
/// shrink or split the range holding it) never leaves the cursor
/// dangling. Removal of any *other* value during iteration is
/// deliberately not offered: there is no position a forward cursor could
/// safely keep across an arbitrary restructuring of the ranges.
pub struct Cursor<'a, T> {
    set: &'a mut RangeSet<T>,
    /// Last value yielded by `next`, if any.
    last: Option<T>,
    /// Whether `last` is still in the set and may be removed.
    removable: bool,
}

impl<T: Step> Iterator for Cursor<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let value = match self.last {
            None => self.set.first()?,
            Some(last) => self.set.next_above(last)?,
        };
        self.last = Some(value);
        self.removable = true;
        Some(value)
    }
}

impl<T: Step> Cursor<'_, T> {
    /// Removes the value last yielded by [`next`](Iterator::next) from the
    /// set. Iteration can continue afterwards.
    ///
    /// # Panics
    /// If `next` has not yielded anything yet, or if the value was
    /// already removed.
    pub fn remove(&mut self) {
        let last = self.last.expect("cursor remove() before next()");
        assert!(
            self.removable,
            "cursor remove() called twice for the same element"
        );
        self.set.remove(last);
        self.removable = false;
    }
}
