/*!
 * Benchmark Configuration
 *
 * Worker count, per-worker node count, lock strategy and the optional
 * knobs, with defaults matching the reference run (4 workers x 250,000).
 */

use super::partition::checked_range_for;
use crate::core::errors::{BenchError, BenchResult};
use crate::core::sync::LockStrategy;
use crate::list::DeleteMode;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_WORKER_COUNT: usize = 4;
pub const DEFAULT_NODES_PER_WORKER: u64 = 250_000;

/// Environment variables read by [`BenchConfig::from_env`]
pub mod env {
    pub const WORKERS: &str = "LOCKBENCH_WORKERS";
    pub const NODES: &str = "LOCKBENCH_NODES";
    pub const LOCK: &str = "LOCKBENCH_LOCK";
    pub const DELETE: &str = "LOCKBENCH_DELETE";
    pub const BARRIER: &str = "LOCKBENCH_BARRIER";
}

/// Benchmark configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct BenchConfig {
    /// Worker threads to spawn
    pub worker_count: usize,
    /// Values each worker inserts, searches and deletes
    pub nodes_per_worker: u64,
    pub lock_strategy: LockStrategy,
    pub delete_mode: DeleteMode,
    /// Make every worker finish a phase before any starts the next
    pub phase_barrier: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
            nodes_per_worker: DEFAULT_NODES_PER_WORKER,
            lock_strategy: LockStrategy::Spin,
            delete_mode: DeleteMode::MoveThenFree,
            phase_barrier: false,
        }
    }
}

impl BenchConfig {
    pub fn with_strategy(mut self, strategy: LockStrategy) -> Self {
        self.lock_strategy = strategy;
        self
    }

    pub fn with_workers(mut self, worker_count: usize, nodes_per_worker: u64) -> Self {
        self.worker_count = worker_count;
        self.nodes_per_worker = nodes_per_worker;
        self
    }

    /// Reject configurations no run could honor
    pub fn validate(&self) -> BenchResult<()> {
        if self.worker_count == 0 {
            return Err(BenchError::InvalidConfig(
                "worker_count must be positive".into(),
            ));
        }
        if self.nodes_per_worker == 0 {
            return Err(BenchError::InvalidConfig(
                "nodes_per_worker must be positive".into(),
            ));
        }
        // The last slot's range must fit; earlier ones then do too
        if checked_range_for(self.worker_count - 1, self.nodes_per_worker).is_none() {
            return Err(BenchError::InvalidConfig(format!(
                "{} workers x {} nodes overflows the value space",
                self.worker_count, self.nodes_per_worker
            )));
        }
        Ok(())
    }

    /// Total values across all worker slots
    pub fn value_space(&self) -> u64 {
        (self.worker_count as u64).saturating_mul(self.nodes_per_worker)
    }

    /// Defaults overridden by `LOCKBENCH_*` environment variables
    pub fn from_env() -> BenchResult<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable
    pub fn from_lookup<F>(lookup: F) -> BenchResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = parse_var(&lookup, env::WORKERS)? {
            config.worker_count = v;
        }
        if let Some(v) = parse_var(&lookup, env::NODES)? {
            config.nodes_per_worker = v;
        }
        if let Some(v) = lookup(env::LOCK) {
            config.lock_strategy = v.parse()?;
        }
        if let Some(v) = lookup(env::DELETE) {
            config.delete_mode = v.parse()?;
        }
        if let Some(v) = lookup(env::BARRIER) {
            config.phase_barrier = parse_flag(&v).ok_or_else(|| BenchError::Env {
                var: env::BARRIER.into(),
                reason: format!("expected a boolean, got {:?}", v),
            })?;
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_var<F, T>(lookup: &F, var: &str) -> BenchResult<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(var)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| BenchError::Env {
                var: var.to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

/// Parse a boolean switch (`1`/`true`/`yes`/`on`, `0`/`false`/`no`/`off`
/// or empty); `None` for anything else
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
