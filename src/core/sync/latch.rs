/*!
 * Countdown Latch
 * Blocks waiters until a fixed number of arrivals have been counted
 */

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug)]
pub struct CountdownLatch {
    remaining: Mutex<usize>,
    condvar: Condvar,
}

impl CountdownLatch {
    pub fn new(count: usize) -> Self {
        Self {
            remaining: Mutex::new(count),
            condvar: Condvar::new(),
        }
    }

    /// Record one arrival; saturates at zero
    pub fn count_down(&self) {
        let mut remaining = self.remaining.lock();
        if *remaining == 0 {
            return;
        }
        *remaining -= 1;
        if *remaining == 0 {
            drop(remaining);
            self.condvar.notify_all();
        }
    }

    pub fn remaining(&self) -> usize {
        *self.remaining.lock()
    }

    pub fn wait(&self) {
        let mut remaining = self.remaining.lock();
        while *remaining > 0 {
            self.condvar.wait(&mut remaining);
        }
    }

    /// Returns true if the count reached zero before `timeout`
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let mut remaining = self.remaining.lock();
        if *remaining > 0 {
            let _ = self.condvar.wait_while_for(&mut remaining, |r| *r > 0, timeout);
        }
        *remaining == 0
    }
}

/// One pending arrival on a latch, counted at most once
///
/// Arrives on drop if [`LatchToken::arrive`] was never called, so a thread
/// that unwinds still releases the waiters.
#[derive(Debug)]
pub struct LatchToken {
    latch: Option<Arc<CountdownLatch>>,
}

impl LatchToken {
    pub fn new(latch: Arc<CountdownLatch>) -> Self {
        Self { latch: Some(latch) }
    }

    pub fn arrive(&mut self) {
        if let Some(latch) = self.latch.take() {
            latch.count_down();
        }
    }
}

impl Drop for LatchToken {
    fn drop(&mut self) {
        self.arrive();
    }
}
