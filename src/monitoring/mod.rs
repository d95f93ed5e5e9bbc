/*!
 * Monitoring
 * Latency accumulation and structured tracing setup
 */

mod latency;
mod tracer;

pub use latency::{LatencyAccumulator, OpKind, OpSnapshot};
pub use tracer::{init_tracing, TRACE_JSON_ENV};
