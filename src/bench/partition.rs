/*!
 * Workload Partitioning
 * Maps a worker slot to its disjoint, contiguous slice of the value space
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed interval `[lo, hi]` of node values
///
/// `lo > hi` denotes the empty range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub lo: i64,
    pub hi: i64,
}

impl Range {
    pub const EMPTY: Range = Range { lo: 0, hi: -1 };

    #[inline]
    pub const fn new(lo: i64, hi: i64) -> Self {
        Self { lo, hi }
    }

    #[inline]
    pub const fn contains(&self, value: i64) -> bool {
        value >= self.lo && value <= self.hi
    }

    /// Number of values in the range (`hi - lo + 1`, or 0 when empty)
    ///
    /// Saturates at `u64::MAX`: the full `i64` domain holds one value more
    /// than a `u64` can count.
    #[inline]
    pub fn len(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            u64::try_from(self.hi as i128 - self.lo as i128 + 1).unwrap_or(u64::MAX)
        }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.lo > self.hi
    }

    pub fn overlaps(&self, other: &Range) -> bool {
        !self.is_empty() && !other.is_empty() && self.lo <= other.hi && other.lo <= self.hi
    }

    /// Iterate the values in ascending order
    pub fn values(&self) -> std::ops::RangeInclusive<i64> {
        if self.is_empty() {
            // An inclusive range that yields nothing
            1..=0
        } else {
            self.lo..=self.hi
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}

/// Range owned by `worker_index`, or `None` if it does not fit in `i64`
pub fn checked_range_for(worker_index: usize, nodes_per_worker: u64) -> Option<Range> {
    let index = i64::try_from(worker_index).ok()?;
    let per_worker = i64::try_from(nodes_per_worker).ok()?;
    let lo = index.checked_mul(per_worker)?;
    let hi = lo.checked_add(per_worker)?.checked_sub(1)?;
    Some(Range { lo, hi })
}

/// Range owned by `worker_index`:
/// `[worker_index * nodes_per_worker, (worker_index + 1) * nodes_per_worker - 1]`
///
/// All three phases of a worker go through this function so the delete phase
/// covers exactly what the insert phase produced. Slots whose range would
/// overflow `i64` get [`Range::EMPTY`]; `BenchConfig::validate` rejects such
/// configurations up front.
#[inline]
pub fn range_for(worker_index: usize, nodes_per_worker: u64) -> Range {
    checked_range_for(worker_index, nodes_per_worker).unwrap_or(Range::EMPTY)
}
