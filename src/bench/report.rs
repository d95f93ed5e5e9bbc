/*!
 * Benchmark Report
 * Final counters gathered at shutdown
 */

use super::partition::Range;
use crate::core::sync::LockStrategy;
use crate::list::DeleteMode;
use crate::monitoring::{OpKind, OpSnapshot};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-worker counts for one insert/search/delete triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerOutcome {
    pub index: usize,
    pub range: Range,
    pub inserted: u64,
    pub found: u64,
    pub deleted: u64,
    /// False when a stop request cut the phase sequence short
    pub completed: bool,
}

impl WorkerOutcome {
    pub(crate) fn new(index: usize, range: Range) -> Self {
        Self {
            index,
            range,
            inserted: 0,
            found: 0,
            deleted: 0,
            completed: false,
        }
    }

    /// Inserted fewer nodes than its range holds
    pub fn is_short(&self) -> bool {
        self.inserted < self.range.len()
    }
}

/// Aggregate result of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchReport {
    pub lock_strategy: LockStrategy,
    pub delete_mode: DeleteMode,
    pub workers_requested: usize,
    pub workers_spawned: usize,
    pub ops: [OpSnapshot; 3],
    pub contended_acquisitions: u64,
    /// Nodes still linked at teardown and force-freed
    pub nodes_drained: u64,
    pub workers: Vec<WorkerOutcome>,
}

impl BenchReport {
    pub fn op(&self, kind: OpKind) -> OpSnapshot {
        self.ops
            .iter()
            .copied()
            .find(|s| s.kind == kind)
            .unwrap_or(OpSnapshot {
                kind,
                total_ns: 0,
                count: 0,
            })
    }

    /// One summary line per operation kind
    pub fn summary_lines(&self) -> Vec<String> {
        self.ops
            .iter()
            .map(|s| SummaryLine(self.lock_strategy, s).to_string())
            .collect()
    }
}

struct SummaryLine<'a>(LockStrategy, &'a OpSnapshot);

impl fmt::Display for SummaryLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let SummaryLine(strategy, op) = self;
        write!(
            f,
            "{} lock linked list {} time: {} ns, count: {}, mean: {} ns",
            strategy,
            op.kind,
            op.total_ns,
            op.count,
            op.mean_ns()
        )
    }
}
