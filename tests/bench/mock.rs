/*!
 * Recording reporter for observing harness runs
 */

use list_lock_bench::bench::{BenchReport, Range, Reporter, WorkerPhase};
use parking_lot::Mutex;
use std::io;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Range(usize, Range),
    Phase(usize, WorkerPhase, Range, u64),
    Stopped(usize),
    SpawnFailed(usize),
    Panicked(usize),
    Summary(Vec<String>),
    Drained(u64),
}

#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<Event>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    /// Phase events of one worker, in the order they were reported
    pub fn phases_of(&self, worker: usize) -> Vec<(WorkerPhase, u64)> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                Event::Phase(w, phase, _, count) if *w == worker => Some((*phase, *count)),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: Event) {
        self.events.lock().push(event);
    }
}

impl Reporter for RecordingReporter {
    fn range_assigned(&self, worker: usize, range: Range) {
        self.push(Event::Range(worker, range));
    }

    fn phase_complete(&self, worker: usize, phase: WorkerPhase, range: Range, count: u64) {
        self.push(Event::Phase(worker, phase, range, count));
    }

    fn worker_stopped(&self, worker: usize) {
        self.push(Event::Stopped(worker));
    }

    fn spawn_failed(&self, worker: usize, _error: &io::Error) {
        self.push(Event::SpawnFailed(worker));
    }

    fn worker_panicked(&self, worker: usize) {
        self.push(Event::Panicked(worker));
    }

    fn summary(&self, report: &BenchReport) {
        self.push(Event::Summary(report.summary_lines()));
    }

    fn drained(&self, nodes: u64) {
        self.push(Event::Drained(nodes));
    }
}
