/*!
 * Lock Strategy Selection
 *
 * Runtime choice between the busy-polling spin lock and the parking
 * blocking mutex, behind a single `lock_api::RawMutex` so the shared list
 * is written once against scoped guards.
 */

use super::spinlock::RawSpinLock;
use crate::core::errors::BenchError;
use lock_api::{GuardNoSend, RawMutex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strategy type selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockStrategy {
    /// Busy-wait on an atomic flag, never parks the caller
    #[default]
    #[serde(alias = "spinlock")]
    Spin,
    /// parking_lot mutex, may park the caller until the lock is free
    #[serde(alias = "mutex")]
    Blocking,
}

impl LockStrategy {
    pub const ALL: [LockStrategy; 2] = [LockStrategy::Spin, LockStrategy::Blocking];

    pub fn name(self) -> &'static str {
        match self {
            Self::Spin => "spin",
            Self::Blocking => "blocking",
        }
    }

    /// Build the raw lock for this strategy
    pub fn raw_lock(self) -> RawListLock {
        match self {
            Self::Spin => RawListLock::Spin(RawSpinLock::new()),
            Self::Blocking => RawListLock::Blocking(<parking_lot::RawMutex as RawMutex>::INIT),
        }
    }
}

impl fmt::Display for LockStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LockStrategy {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spin" | "spinlock" => Ok(Self::Spin),
            "blocking" | "mutex" => Ok(Self::Blocking),
            other => Err(BenchError::InvalidStrategy(other.to_string())),
        }
    }
}

/// Raw lock dispatching to the selected strategy
///
/// The variant is fixed at construction; every acquire and release goes to
/// the same underlying primitive.
pub enum RawListLock {
    Spin(RawSpinLock),
    Blocking(parking_lot::RawMutex),
}

impl RawListLock {
    pub fn strategy(&self) -> LockStrategy {
        match self {
            Self::Spin(_) => LockStrategy::Spin,
            Self::Blocking(_) => LockStrategy::Blocking,
        }
    }
}

unsafe impl RawMutex for RawListLock {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = Self::Spin(RawSpinLock::new());

    // parking_lot's raw mutex must be released on the thread that locked it
    type GuardMarker = GuardNoSend;

    #[inline]
    fn lock(&self) {
        match self {
            Self::Spin(l) => l.lock(),
            Self::Blocking(l) => l.lock(),
        }
    }

    #[inline]
    fn try_lock(&self) -> bool {
        match self {
            Self::Spin(l) => l.try_lock(),
            Self::Blocking(l) => l.try_lock(),
        }
    }

    #[inline]
    unsafe fn unlock(&self) {
        match self {
            Self::Spin(l) => l.unlock(),
            Self::Blocking(l) => l.unlock(),
        }
    }

    #[inline]
    fn is_locked(&self) -> bool {
        match self {
            Self::Spin(l) => l.is_locked(),
            Self::Blocking(l) => l.is_locked(),
        }
    }
}

/// Value guarded by the configured strategy
pub type ListMutex<T> = lock_api::Mutex<RawListLock, T>;

/// Scoped acquisition of a [`ListMutex`]; releases on drop
pub type ListGuard<'a, T> = lock_api::MutexGuard<'a, RawListLock, T>;

/// Create a mutex guarding `value` with the given strategy
pub fn list_mutex<T>(strategy: LockStrategy, value: T) -> ListMutex<T> {
    lock_api::Mutex::from_raw(strategy.raw_lock(), value)
}
