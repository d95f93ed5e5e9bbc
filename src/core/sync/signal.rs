/*!
 * Stop Signal
 *
 * One-shot cancellation flag with a condvar so idle workers block instead of
 * polling for the shutdown request.
 */

use parking_lot::{Condvar, Mutex};
use std::time::Duration;

/// Shared shutdown request
#[derive(Debug, Default)]
pub struct StopSignal {
    stopped: Mutex<bool>,
    condvar: Condvar,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request stop and wake every waiter
    ///
    /// Returns false if stop had already been requested.
    pub fn request_stop(&self) -> bool {
        let mut stopped = self.stopped.lock();
        if *stopped {
            return false;
        }
        *stopped = true;
        drop(stopped);

        self.condvar.notify_all();
        true
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        *self.stopped.lock()
    }

    /// Block until stop is requested
    pub fn wait(&self) {
        let mut stopped = self.stopped.lock();
        while !*stopped {
            self.condvar.wait(&mut stopped);
        }
    }

    /// Block until stop is requested or `timeout` elapses
    ///
    /// Returns true if stop was requested.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let mut stopped = self.stopped.lock();
        if !*stopped {
            // Spurious wakeups just end the wait early; the flag is the answer
            let _ = self.condvar.wait_for(&mut stopped, timeout);
        }
        *stopped
    }
}
