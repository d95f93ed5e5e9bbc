/*!
 * Harness tests
 * Whole runs: worker lifecycle, reporting, teardown and partial coverage
 */

use crate::mock::{Event, RecordingReporter};
use list_lock_bench::bench::{
    run_to_completion, BenchShared, Harness, Range, ThreadSpawner, WorkerContext, WorkerOutcome,
    WorkerPhase, WorkerSpawner, WorkerTask,
};
use list_lock_bench::{BenchConfig, BenchError, DeleteMode, LockStrategy, OpKind};
use pretty_assertions::assert_eq;
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[test]
fn test_reference_scenario_without_interleaving() {
    let config = BenchConfig::default()
        .with_strategy(LockStrategy::Spin)
        .with_workers(4, 250_000);
    let shared = Arc::new(BenchShared::new(
        config,
        Arc::new(RecordingReporter::default()),
    ));

    // Each worker's full sequence runs before the next one starts
    for index in 0..4 {
        let mut task = WorkerTask::new(WorkerContext {
            index,
            shared: shared.clone(),
        });
        let outcome = task.run_phases();

        let lo = index as i64 * 250_000;
        assert_eq!(outcome.range, Range::new(lo, lo + 249_999));
        assert_eq!(outcome.inserted, 250_000);
        assert_eq!(outcome.found, 250_000);
        assert_eq!(outcome.deleted, 250_000);
        assert!(shared.list.is_empty());
    }

    assert_eq!(shared.latency.snapshot(OpKind::Insert).count, 1_000_000);
    assert_eq!(shared.latency.snapshot(OpKind::Search).count, 1_000_000);
    assert_eq!(shared.latency.snapshot(OpKind::Delete).count, 1_000_000);
}

#[test]
fn test_concurrent_run_accounts_for_every_node() {
    for strategy in LockStrategy::ALL {
        for mode in [DeleteMode::InPlace, DeleteMode::MoveThenFree] {
            let config = BenchConfig {
                worker_count: 4,
                nodes_per_worker: 20_000,
                lock_strategy: strategy,
                delete_mode: mode,
                phase_barrier: false,
            };
            let reporter = Arc::new(RecordingReporter::default());
            let report = run_to_completion(config, reporter.clone()).unwrap();

            assert_eq!(report.workers_spawned, 4);
            assert_eq!(report.workers.len(), 4);
            for outcome in &report.workers {
                // Own range is never touched by anyone else
                assert_eq!(outcome.inserted, 20_000);
                assert_eq!(outcome.found, 20_000);
                assert_eq!(outcome.deleted, 20_000);
                assert!(outcome.completed);
            }
            assert_eq!(report.op(OpKind::Insert).count, 80_000);
            assert_eq!(report.op(OpKind::Delete).count, 80_000);
            assert_eq!(report.nodes_drained, 0);

            for worker in 0..4 {
                let phases: Vec<WorkerPhase> =
                    reporter.phases_of(worker).into_iter().map(|(p, _)| p).collect();
                assert_eq!(
                    phases,
                    vec![WorkerPhase::Inserting, WorkerPhase::Searching, WorkerPhase::Deleting]
                );
            }
        }
    }
}

#[test]
fn test_phase_barrier_run() {
    let config = BenchConfig {
        phase_barrier: true,
        ..BenchConfig::default().with_workers(6, 5_000)
    };
    let report = run_to_completion(config, Arc::new(RecordingReporter::default())).unwrap();

    assert_eq!(report.op(OpKind::Search).count, 30_000);
    assert!(report.workers.iter().all(|w| w.completed));
}

#[test]
fn test_reporter_sees_ranges_summary_and_drain() {
    let reporter = Arc::new(RecordingReporter::default());
    let config = BenchConfig::default()
        .with_strategy(LockStrategy::Blocking)
        .with_workers(2, 100);
    run_to_completion(config, reporter.clone()).unwrap();

    let events = reporter.events();
    assert!(events.contains(&Event::Range(0, Range::new(0, 99))));
    assert!(events.contains(&Event::Range(1, Range::new(100, 199))));
    assert!(events.contains(&Event::Stopped(0)));
    assert!(events.contains(&Event::Stopped(1)));

    let summary_at = events
        .iter()
        .position(|e| matches!(e, Event::Summary(_)))
        .expect("summary emitted");
    let drained_at = events
        .iter()
        .position(|e| matches!(e, Event::Drained(_)))
        .expect("drain reported");
    assert!(summary_at < drained_at);
    assert_eq!(
        events.iter().filter(|e| matches!(e, Event::Summary(_))).count(),
        1
    );

    let Event::Summary(lines) = &events[summary_at] else {
        unreachable!()
    };
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("blocking lock linked list insert time: "));
    assert!(lines[0].contains("count: 200"));
}

/// Fails to create the thread for selected slots
struct FlakySpawner {
    fail: Vec<usize>,
}

impl WorkerSpawner for FlakySpawner {
    fn spawn(&self, task: WorkerTask) -> io::Result<JoinHandle<WorkerOutcome>> {
        if self.fail.contains(&task.index()) {
            return Err(io::Error::new(io::ErrorKind::WouldBlock, "thread limit"));
        }
        ThreadSpawner.spawn(task)
    }
}

#[test]
fn test_failed_spawn_skips_slot() {
    for phase_barrier in [false, true] {
        let reporter = Arc::new(RecordingReporter::default());
        let config = BenchConfig {
            phase_barrier,
            ..BenchConfig::default().with_workers(4, 1_000)
        };

        let mut harness = Harness::builder(config)
            .with_reporter(reporter.clone())
            .with_spawner(FlakySpawner { fail: vec![1] })
            .start()
            .unwrap();
        assert_eq!(harness.workers_spawned(), 3);

        assert!(harness.wait_until_idle_timeout(Duration::from_secs(30)));
        let report = harness.stop();

        // Partial coverage is reported as such
        assert_eq!(report.workers_requested, 4);
        assert_eq!(report.workers_spawned, 3);
        assert_eq!(report.op(OpKind::Insert).count, 3_000);
        assert!(report.workers.iter().all(|w| w.index != 1));
        assert!(reporter.events().contains(&Event::SpawnFailed(1)));
    }
}

#[test]
fn test_all_spawns_failing_aborts() {
    let result = Harness::builder(BenchConfig::default().with_workers(2, 10))
        .with_spawner(FlakySpawner { fail: vec![0, 1] })
        .start();
    assert!(matches!(result, Err(BenchError::NoWorkersSpawned)));
}

/// Spawns a thread that dies before running its task
struct PanickingSpawner;

impl WorkerSpawner for PanickingSpawner {
    fn spawn(&self, task: WorkerTask) -> io::Result<JoinHandle<WorkerOutcome>> {
        if task.index() == 0 {
            return thread::Builder::new().spawn(move || {
                let _task = task;
                panic!("worker 0 crashed");
            });
        }
        ThreadSpawner.spawn(task)
    }
}

#[test]
fn test_panicked_worker_does_not_hang_run() {
    let reporter = Arc::new(RecordingReporter::default());
    let config = BenchConfig {
        phase_barrier: true,
        ..BenchConfig::default().with_workers(2, 500)
    };

    let mut harness = Harness::builder(config)
        .with_reporter(reporter.clone())
        .with_spawner(PanickingSpawner)
        .start()
        .unwrap();

    assert!(harness.wait_until_idle_timeout(Duration::from_secs(30)));
    let report = harness.stop();

    assert_eq!(report.workers.len(), 1);
    assert_eq!(report.op(OpKind::Insert).count, 500);
    assert!(reporter.events().contains(&Event::Panicked(0)));
}

#[test]
fn test_stop_mid_run_drains_leftovers() {
    let config = BenchConfig::default().with_workers(4, 50_000);
    let mut harness = Harness::start(config).unwrap();

    // No wait: some workers may not have reached their delete phase
    let report = harness.stop();

    let inserted: u64 = report.workers.iter().map(|w| w.inserted).sum();
    let deleted: u64 = report.workers.iter().map(|w| w.deleted).sum();
    assert_eq!(inserted - deleted, report.nodes_drained);
    assert!(harness.list().is_empty());
}

#[test]
fn test_shutdown_twice_is_noop() {
    let mut harness = Harness::start(BenchConfig::default().with_workers(2, 1_000)).unwrap();
    harness.wait_until_idle();

    let first = harness.stop();
    assert_eq!(harness.drain(), 0);
    let second = harness.stop();

    assert_eq!(first, second);
    assert!(harness.report().is_some());
    assert!(harness.list().is_empty());
}

#[test]
fn test_drop_without_stop_joins_workers() {
    let harness = Harness::start(BenchConfig::default().with_workers(3, 2_000)).unwrap();
    drop(harness);
}
