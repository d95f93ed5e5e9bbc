/*!
 * List Lock Bench - Main Entry Point
 *
 * Reads the run configuration from the environment, runs every worker's
 * insert/search/delete sequence to completion, then stops the harness, which
 * logs the per-operation totals.
 */

use list_lock_bench::bench::config::{env as bench_env, parse_flag};
use list_lock_bench::bench::Harness;
use list_lock_bench::{init_tracing, BenchConfig};
use miette::{IntoDiagnostic, Result};
use tracing::info;

/// Also print the final report as JSON on stdout
const REPORT_JSON_ENV: &str = "LOCKBENCH_REPORT_JSON";

fn main() -> Result<()> {
    init_tracing();

    let config = BenchConfig::from_env()?;
    info!(
        workers_env = bench_env::WORKERS,
        nodes_env = bench_env::NODES,
        lock_env = bench_env::LOCK,
        "Entering {} lock benchmark...",
        config.lock_strategy
    );

    let mut harness = Harness::start(config)?;
    harness.wait_until_idle();
    let report = harness.stop();

    // The summary lines were already logged by the harness on stop
    let want_json = std::env::var(REPORT_JSON_ENV)
        .ok()
        .and_then(|v| parse_flag(&v))
        .unwrap_or(false);
    if want_json {
        println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?);
    }

    info!("exiting {} lock module", report.lock_strategy);
    Ok(())
}
