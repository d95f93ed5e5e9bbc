/*!
 * Worker Task
 *
 * Per-thread driver: compute the range, then insert, search and delete it
 * against the shared list, timing each phase into the latency accumulator.
 *
 * # State machine
 *
 * `Ranging -> Inserting -> Searching -> Deleting -> Idle`
 *
 * Strictly forward, one pass. Phases of different workers are not aligned
 * unless the phase barrier is enabled: one worker may be deleting while
 * another is still inserting.
 */

use super::config::BenchConfig;
use super::partition::{range_for, Range};
use super::report::WorkerOutcome;
use super::reporter::Reporter;
use crate::core::sync::{CountdownLatch, LatchToken, PhaseBarrier, StopSignal};
use crate::list::SharedList;
use crate::monitoring::{LatencyAccumulator, OpKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Worker lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerPhase {
    Ranging,
    Inserting,
    Searching,
    Deleting,
    Idle,
}

impl WorkerPhase {
    /// Next state; `Idle` is terminal
    pub fn next(self) -> Self {
        match self {
            Self::Ranging => Self::Inserting,
            Self::Inserting => Self::Searching,
            Self::Searching => Self::Deleting,
            Self::Deleting | Self::Idle => Self::Idle,
        }
    }

    pub fn op_kind(self) -> Option<OpKind> {
        match self {
            Self::Inserting => Some(OpKind::Insert),
            Self::Searching => Some(OpKind::Search),
            Self::Deleting => Some(OpKind::Delete),
            Self::Ranging | Self::Idle => None,
        }
    }

    pub(crate) fn verb(self) -> &'static str {
        match self {
            Self::Ranging => "ranged",
            Self::Inserting => "inserted",
            Self::Searching => "searched",
            Self::Deleting => "deleted",
            Self::Idle => "idled",
        }
    }
}

impl fmt::Display for WorkerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ranging => "ranging",
            Self::Inserting => "inserting",
            Self::Searching => "searching",
            Self::Deleting => "deleting",
            Self::Idle => "idle",
        };
        f.write_str(name)
    }
}

/// State shared by the harness and every worker of one run
pub struct BenchShared {
    pub config: BenchConfig,
    pub list: SharedList,
    pub latency: LatencyAccumulator,
    pub stop: StopSignal,
    pub(crate) barrier: Option<PhaseBarrier>,
    pub(crate) idle: Arc<CountdownLatch>,
    pub(crate) reporter: Arc<dyn Reporter>,
}

impl BenchShared {
    pub fn new(config: BenchConfig, reporter: Arc<dyn Reporter>) -> Self {
        let workers = config.worker_count;
        Self {
            list: SharedList::with_capacity(config.lock_strategy, workers),
            latency: LatencyAccumulator::new(),
            stop: StopSignal::new(),
            barrier: config.phase_barrier.then(|| PhaseBarrier::new(workers)),
            idle: Arc::new(CountdownLatch::new(workers)),
            reporter,
            config,
        }
    }
}

/// Typed hand-off to a worker thread at spawn time
#[derive(Clone)]
pub struct WorkerContext {
    pub index: usize,
    pub shared: Arc<BenchShared>,
}

/// One worker's insert/search/delete driver
///
/// Dropping a task that never reached `Idle` (spawn failure, panic) still
/// releases the idle latch and the phase barrier, so nobody waits on it.
pub struct WorkerTask {
    ctx: WorkerContext,
    phase: WorkerPhase,
    range: Range,
    idle: LatchToken,
}

impl WorkerTask {
    pub fn new(ctx: WorkerContext) -> Self {
        let idle = LatchToken::new(ctx.shared.idle.clone());
        Self {
            ctx,
            phase: WorkerPhase::Ranging,
            range: Range::EMPTY,
            idle,
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.ctx.index
    }

    #[inline]
    pub fn phase(&self) -> WorkerPhase {
        self.phase
    }

    /// Run all phases, then idle until the harness requests stop
    pub fn run(mut self) -> WorkerOutcome {
        let outcome = self.run_phases();
        self.idle.arrive();

        self.ctx.shared.stop.wait();
        self.ctx.shared.reporter.worker_stopped(self.ctx.index);
        outcome
    }

    /// Drive `Ranging` through `Deleting` and land in `Idle`
    ///
    /// A stop request observed between phases ends the sequence early; the
    /// phase in progress always completes.
    pub fn run_phases(&mut self) -> WorkerOutcome {
        let shared = self.ctx.shared.clone();
        let index = self.ctx.index;

        self.range = range_for(index, shared.config.nodes_per_worker);
        shared.reporter.range_assigned(index, self.range);
        let mut outcome = WorkerOutcome::new(index, self.range);

        while self.phase != WorkerPhase::Idle {
            let next = self.phase.next();
            if self.sync_phase(&shared) {
                debug!(worker = index, phase = %self.phase, "stop requested between phases");
                self.abandon();
                return outcome;
            }

            self.phase = next;
            match self.phase {
                WorkerPhase::Inserting => outcome.inserted = self.insert(&shared),
                WorkerPhase::Searching => outcome.found = self.search(&shared),
                WorkerPhase::Deleting => outcome.deleted = self.delete(&shared),
                WorkerPhase::Ranging | WorkerPhase::Idle => {}
            }
        }

        outcome.completed = true;
        outcome
    }

    /// Check for stop and wait at the barrier if enabled; true if the worker
    /// should stop
    fn sync_phase(&self, shared: &BenchShared) -> bool {
        if self.phase == WorkerPhase::Deleting {
            return false;
        }
        if shared.stop.is_stopped() {
            return true;
        }
        if self.phase != WorkerPhase::Ranging {
            if let Some(barrier) = &shared.barrier {
                barrier.wait();
            }
        }
        false
    }

    /// Only lock acquisition and the splice are timed; building the batch
    /// is allocator work, not lock work
    fn insert(&self, shared: &BenchShared) -> u64 {
        let stats = shared.list.insert_range_timed(self.range, None);
        self.finish(shared, stats.locked, stats.inserted)
    }

    fn search(&self, shared: &BenchShared) -> u64 {
        let start = Instant::now();
        let found = shared.list.count_in_range(self.range);
        self.finish(shared, start.elapsed(), found)
    }

    fn delete(&self, shared: &BenchShared) -> u64 {
        let start = Instant::now();
        let deleted = shared
            .list
            .delete_range(self.range, shared.config.delete_mode);
        self.finish(shared, start.elapsed(), deleted)
    }

    /// Jump to `Idle` without finishing, leaving the barrier
    fn abandon(&mut self) {
        self.phase = WorkerPhase::Idle;
        if let Some(barrier) = &self.ctx.shared.barrier {
            barrier.leave();
        }
    }

    fn finish(&self, shared: &BenchShared, elapsed: Duration, count: u64) -> u64 {
        if let Some(kind) = self.phase.op_kind() {
            shared.latency.record_elapsed(kind, elapsed, count);
        }
        shared
            .reporter
            .phase_complete(self.ctx.index, self.phase, self.range, count);
        count
    }
}

impl Drop for WorkerTask {
    fn drop(&mut self) {
        if self.phase != WorkerPhase::Idle {
            self.abandon();
        }
    }
}
