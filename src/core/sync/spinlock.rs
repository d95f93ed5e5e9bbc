/*!
 * Spin Lock
 *
 * Busy-polling raw lock over a single atomic flag. The acquiring thread is
 * never parked: it burns CPU until the flag can be claimed.
 */

use crossbeam_utils::Backoff;
use lock_api::{GuardSend, RawMutex};
use std::sync::atomic::{AtomicBool, Ordering};

/// Raw spin lock
///
/// # Performance
///
/// - **Uncontended**: a single compare-exchange
/// - **Contended**: exponential `spin_loop` backoff, no syscalls, no parking
/// - **Best for**: short, bounded critical sections (pointer splices)
#[derive(Debug)]
pub struct RawSpinLock {
    locked: AtomicBool,
}

impl RawSpinLock {
    /// Create an unlocked spin lock
    pub const fn new() -> Self {
        Self {
            locked: AtomicBool::new(false),
        }
    }
}

impl Default for RawSpinLock {
    fn default() -> Self {
        Self::new()
    }
}

unsafe impl RawMutex for RawSpinLock {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = Self::new();

    type GuardMarker = GuardSend;

    fn lock(&self) {
        let backoff = Backoff::new();

        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            // Test-and-test-and-set: wait on a plain load so the cache line
            // stays shared until the holder releases it.
            while self.locked.load(Ordering::Relaxed) {
                backoff.spin();
            }
        }
    }

    #[inline]
    fn try_lock(&self) -> bool {
        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    #[inline]
    unsafe fn unlock(&self) {
        self.locked.store(false, Ordering::Release);
    }

    #[inline]
    fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }
}

/// Spin-guarded value
pub type SpinMutex<T> = lock_api::Mutex<RawSpinLock, T>;
