/*!
 * Error Types
 * Startup and configuration errors with thiserror and miette diagnostics
 */

use miette::Diagnostic;
use thiserror::Error;

/// Errors that abort a benchmark run before any worker starts
///
/// Runtime faults inside workers (short inserts, failed spawns, panics) are
/// never surfaced through this type; they show up as reduced counts.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum BenchError {
    #[error("Unknown lock strategy: {0}")]
    #[diagnostic(
        code(bench::invalid_strategy),
        help("Use `spin` (alias `spinlock`) or `blocking` (alias `mutex`).")
    )]
    InvalidStrategy(String),

    #[error("Unknown delete mode: {0}")]
    #[diagnostic(
        code(bench::invalid_delete_mode),
        help("Use `in_place` or `move_then_free`.")
    )]
    InvalidDeleteMode(String),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code(bench::invalid_config),
        help("worker_count and nodes_per_worker must be positive and their product must fit in i64.")
    )]
    InvalidConfig(String),

    #[error("Invalid value for {var}: {reason}")]
    #[diagnostic(
        code(bench::env),
        help("Unset the variable to fall back to the default.")
    )]
    Env { var: String, reason: String },

    #[error("No worker thread could be spawned")]
    #[diagnostic(
        code(bench::no_workers),
        help("The system refused every thread creation. Check process thread limits.")
    )]
    NoWorkersSpawned,
}

/// Result alias for harness startup
pub type BenchResult<T> = Result<T, BenchError>;
