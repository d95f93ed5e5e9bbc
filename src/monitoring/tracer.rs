/*!
 * Structured Tracing
 * Subscriber setup for the benchmark binary and tests
 *
 * Features:
 * - Env-filter driven levels (RUST_LOG)
 * - JSON-formatted logs for structured parsing
 * - Thread names in every line, so worker `T<n>` output is attributable
 */

use crate::bench::config::parse_flag;
use tracing::info;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Enables JSON log output when set to `1`/`true`
pub const TRACE_JSON_ENV: &str = "LOCKBENCH_TRACE_JSON";

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - LOCKBENCH_TRACE_JSON: Enable JSON output (default: false)
///
/// Returns false if a global subscriber was already installed, which leaves
/// the existing one in place.
pub fn init_tracing() -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(TRACE_JSON_ENV)
        .ok()
        .and_then(|v| parse_flag(&v))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if use_json {
        // JSON output for production/parsing
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
            .is_ok()
    } else {
        // Human-readable output for development
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_names(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
            .is_ok()
    };

    if installed {
        info!(json = use_json, "structured tracing initialized");
    }
    installed
}
