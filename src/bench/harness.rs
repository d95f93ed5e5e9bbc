/*!
 * Benchmark Harness
 *
 * Owns one run: the shared list, the latency totals and the worker threads.
 * Construction spawns every worker immediately; `stop` joins them, emits the
 * summary and force-drains whatever is left in the list.
 */

use super::config::BenchConfig;
use super::report::{BenchReport, WorkerOutcome};
use super::reporter::{Reporter, TracingReporter};
use super::worker::{BenchShared, WorkerContext, WorkerTask};
use crate::core::errors::{BenchError, BenchResult};
use crate::list::SharedList;
use crate::monitoring::LatencyAccumulator;
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info};

/// Creates the OS thread for one worker slot
pub trait WorkerSpawner {
    fn spawn(&self, task: WorkerTask) -> io::Result<JoinHandle<WorkerOutcome>>;
}

/// Named OS threads (`T0`, `T1`, ...)
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSpawner;

impl WorkerSpawner for ThreadSpawner {
    fn spawn(&self, task: WorkerTask) -> io::Result<JoinHandle<WorkerOutcome>> {
        thread::Builder::new()
            .name(format!("T{}", task.index()))
            .spawn(move || task.run())
    }
}

struct WorkerHandle {
    index: usize,
    handle: JoinHandle<WorkerOutcome>,
}

/// Harness builder
pub struct HarnessBuilder {
    config: BenchConfig,
    reporter: Arc<dyn Reporter>,
    spawner: Box<dyn WorkerSpawner>,
}

impl HarnessBuilder {
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_spawner(mut self, spawner: impl WorkerSpawner + 'static) -> Self {
        self.spawner = Box::new(spawner);
        self
    }

    /// Validate the configuration and spawn every worker
    ///
    /// Invalid configuration aborts before any thread exists. A slot whose
    /// thread cannot be created is reported and skipped; the run continues
    /// with the rest.
    pub fn start(self) -> BenchResult<Harness> {
        self.config.validate()?;

        let requested = self.config.worker_count;
        info!(
            workers = requested,
            nodes_per_worker = self.config.nodes_per_worker,
            lock = %self.config.lock_strategy,
            delete = %self.config.delete_mode,
            barrier = self.config.phase_barrier,
            "starting list lock benchmark"
        );

        let shared = Arc::new(BenchShared::new(self.config, self.reporter));
        let mut workers = Vec::with_capacity(requested);

        for index in 0..requested {
            let task = WorkerTask::new(WorkerContext {
                index,
                shared: shared.clone(),
            });

            match self.spawner.spawn(task) {
                Ok(handle) => workers.push(WorkerHandle { index, handle }),
                // The dropped task already released its latch and barrier slot
                Err(e) => shared.reporter.spawn_failed(index, &e),
            }
        }

        if workers.is_empty() {
            return Err(BenchError::NoWorkersSpawned);
        }

        Ok(Harness {
            shared,
            workers,
            requested,
            report: None,
        })
    }
}

/// A running (or finished) benchmark
pub struct Harness {
    shared: Arc<BenchShared>,
    workers: Vec<WorkerHandle>,
    requested: usize,
    report: Option<BenchReport>,
}

impl Harness {
    pub fn builder(config: BenchConfig) -> HarnessBuilder {
        HarnessBuilder {
            config,
            reporter: Arc::new(TracingReporter),
            spawner: Box::new(ThreadSpawner),
        }
    }

    /// Start with the default tracing reporter and OS threads
    pub fn start(config: BenchConfig) -> BenchResult<Self> {
        Self::builder(config).start()
    }

    pub fn config(&self) -> &BenchConfig {
        &self.shared.config
    }

    pub fn list(&self) -> &SharedList {
        &self.shared.list
    }

    pub fn latency(&self) -> &LatencyAccumulator {
        &self.shared.latency
    }

    /// Worker slots whose thread was created
    pub fn workers_spawned(&self) -> usize {
        match &self.report {
            Some(report) => report.workers_spawned,
            None => self.workers.len(),
        }
    }

    /// Block until every spawned worker has reached `Idle`
    pub fn wait_until_idle(&self) {
        self.shared.idle.wait();
    }

    /// Like [`wait_until_idle`](Self::wait_until_idle), giving up after `timeout`
    pub fn wait_until_idle_timeout(&self, timeout: Duration) -> bool {
        self.shared.idle.wait_timeout(timeout)
    }

    /// Stop workers, emit the summary and drain the list
    ///
    /// Workers finish the phase they are in before exiting. Calling `stop`
    /// again returns the first report without touching anything.
    pub fn stop(&mut self) -> BenchReport {
        if let Some(report) = &self.report {
            debug!("harness already stopped");
            return report.clone();
        }

        self.shared.stop.request_stop();

        let spawned = self.workers.len();
        let mut outcomes = Vec::with_capacity(spawned);
        for WorkerHandle { index, handle } in self.workers.drain(..) {
            match handle.join() {
                Ok(outcome) => outcomes.push(outcome),
                Err(_) => self.shared.reporter.worker_panicked(index),
            }
        }

        let mut report = BenchReport {
            lock_strategy: self.shared.config.lock_strategy,
            delete_mode: self.shared.config.delete_mode,
            workers_requested: self.requested,
            workers_spawned: spawned,
            ops: self.shared.latency.snapshots(),
            contended_acquisitions: self.shared.list.contended_acquisitions(),
            nodes_drained: 0,
            workers: outcomes,
        };
        self.shared.reporter.summary(&report);

        report.nodes_drained = self.drain();
        self.report = Some(report.clone());
        report
    }

    /// Force-free every node left in the list; no-op when already empty
    pub fn drain(&self) -> u64 {
        let drained = self.shared.list.drain();
        self.shared.reporter.drained(drained);
        drained
    }

    /// Report from the completed `stop`, if any
    pub fn report(&self) -> Option<&BenchReport> {
        self.report.as_ref()
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        if self.report.is_none() {
            self.stop();
        }
    }
}

/// Start, let every worker finish its phases, then stop
pub fn run_to_completion(config: BenchConfig, reporter: Arc<dyn Reporter>) -> BenchResult<BenchReport> {
    let mut harness = Harness::builder(config).with_reporter(reporter).start()?;
    harness.wait_until_idle();
    Ok(harness.stop())
}
