/*!
 * Benchmark Driver
 * Configuration, workload partitioning, workers and the run harness
 */

pub mod config;
pub mod harness;
pub mod partition;
pub mod report;
pub mod reporter;
pub mod worker;

pub use config::BenchConfig;
pub use harness::{run_to_completion, Harness, HarnessBuilder, ThreadSpawner, WorkerSpawner};
pub use partition::{checked_range_for, range_for, Range};
pub use report::{BenchReport, WorkerOutcome};
pub use reporter::{Reporter, TracingReporter};
pub use worker::{BenchShared, WorkerContext, WorkerPhase, WorkerTask};
