/*!
 * Latency Accumulation
 * Lock-free per-operation totals of elapsed nanoseconds and operation counts
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Operation kinds tracked by the accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    Insert,
    Search,
    Delete,
}

impl OpKind {
    pub const ALL: [OpKind; 3] = [OpKind::Insert, OpKind::Search, OpKind::Delete];

    #[inline]
    const fn index(self) -> usize {
        match self {
            Self::Insert => 0,
            Self::Search => 1,
            Self::Delete => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Search => "search",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Totals for one operation kind
///
/// # Performance
/// - Cache-line aligned so workers hammering different kinds do not false-share
#[repr(C, align(64))]
#[derive(Debug, Default)]
struct OpCounters {
    total_ns: AtomicU64,
    count: AtomicU64,
}

/// Point-in-time totals for one operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpSnapshot {
    pub kind: OpKind,
    pub total_ns: u64,
    pub count: u64,
}

impl OpSnapshot {
    /// Mean nanoseconds per operation (0 when nothing was recorded)
    pub fn mean_ns(&self) -> u64 {
        self.total_ns.checked_div(self.count).unwrap_or(0)
    }
}

/// Running totals, updated from any thread without a lock
///
/// Each update is a pair of independent `fetch_add`s; a reader racing with
/// writers sees some interleaving of them, nothing stronger.
#[derive(Debug, Default)]
pub struct LatencyAccumulator {
    ops: [OpCounters; 3],
}

impl LatencyAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one operation of `kind` that took `elapsed_ns`
    #[inline]
    pub fn record(&self, kind: OpKind, elapsed_ns: u64) {
        self.record_batch(kind, elapsed_ns, 1);
    }

    /// Record `ops` operations of `kind` that took `elapsed_ns` in total
    #[inline]
    pub fn record_batch(&self, kind: OpKind, elapsed_ns: u64, ops: u64) {
        let counters = &self.ops[kind.index()];
        counters.total_ns.fetch_add(elapsed_ns, Ordering::Relaxed);
        counters.count.fetch_add(ops, Ordering::Relaxed);
    }

    /// Record a [`Duration`], saturating at `u64::MAX` nanoseconds
    #[inline]
    pub fn record_elapsed(&self, kind: OpKind, elapsed: Duration, ops: u64) {
        let ns = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.record_batch(kind, ns, ops);
    }

    pub fn snapshot(&self, kind: OpKind) -> OpSnapshot {
        let counters = &self.ops[kind.index()];
        OpSnapshot {
            kind,
            total_ns: counters.total_ns.load(Ordering::Relaxed),
            count: counters.count.load(Ordering::Relaxed),
        }
    }

    pub fn snapshots(&self) -> [OpSnapshot; 3] {
        OpKind::ALL.map(|kind| self.snapshot(kind))
    }
}
