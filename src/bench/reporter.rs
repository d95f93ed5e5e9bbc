/*!
 * Reporting Sink
 *
 * Line-oriented events from workers and the harness. The default sink
 * forwards everything to `tracing`; tests inject their own to observe runs.
 */

use super::partition::Range;
use super::report::BenchReport;
use super::worker::WorkerPhase;
use std::io;
use tracing::{error, info, warn};

/// Receiver of worker and harness events
///
/// Called concurrently from every worker thread.
pub trait Reporter: Send + Sync {
    /// A worker computed its value range
    fn range_assigned(&self, worker: usize, range: Range);

    /// A worker finished `phase` over `range`, touching `count` nodes
    fn phase_complete(&self, worker: usize, phase: WorkerPhase, range: Range, count: u64);

    /// A worker left its idle state after the stop request
    fn worker_stopped(&self, worker: usize) {
        let _ = worker;
    }

    /// The thread for a worker slot could not be created
    fn spawn_failed(&self, worker: usize, error: &io::Error);

    /// A worker thread panicked; its counters are missing from the report
    fn worker_panicked(&self, worker: usize) {
        let _ = worker;
    }

    /// Final per-kind totals, emitted once before the list is drained
    fn summary(&self, report: &BenchReport);

    /// Nodes force-freed during teardown
    fn drained(&self, nodes: u64) {
        let _ = nodes;
    }
}

/// Reporter that logs through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn range_assigned(&self, worker: usize, range: Range) {
        info!(worker, lo = range.lo, hi = range.hi, "thread #{} range: {} ~ {}", worker, range.lo, range.hi);
    }

    fn phase_complete(&self, worker: usize, phase: WorkerPhase, range: Range, count: u64) {
        info!(
            worker,
            phase = %phase,
            lo = range.lo,
            hi = range.hi,
            count,
            "thread #{} {} range {}: {} items",
            worker,
            phase.verb(),
            range,
            count
        );
    }

    fn worker_stopped(&self, worker: usize) {
        info!(worker, "thread #{} stopped", worker);
    }

    fn spawn_failed(&self, worker: usize, error: &io::Error) {
        warn!(worker, error = %error, "failed to spawn worker, slot skipped");
    }

    fn worker_panicked(&self, worker: usize) {
        error!(worker, "worker thread panicked");
    }

    fn summary(&self, report: &BenchReport) {
        for line in report.summary_lines() {
            info!(
                lock = %report.lock_strategy,
                workers = report.workers_spawned,
                "{}",
                line
            );
        }
        if report.contended_acquisitions > 0 {
            info!(
                contended = report.contended_acquisitions,
                "lock acquisitions found the lock held"
            );
        }
    }

    fn drained(&self, nodes: u64) {
        if nodes > 0 {
            warn!(nodes, "force-freed nodes left in the shared list");
        }
    }
}
