/*!
 * List Lock Bench
 *
 * Micro-benchmark comparing a busy-wait spin lock against a blocking mutex
 * guarding one shared linked list under concurrent insert, search and delete
 * phases.
 */

pub mod bench;
pub mod core;
pub mod list;
pub mod monitoring;

// Re-exports
pub use bench::{BenchConfig, BenchReport, Harness, Range, Reporter, WorkerPhase};
pub use core::errors::{BenchError, BenchResult};
pub use core::sync::LockStrategy;
pub use list::{DeleteMode, InsertStats, SharedList};
pub use monitoring::{init_tracing, LatencyAccumulator, OpKind};
