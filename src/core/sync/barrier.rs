/*!
 * Phase Barrier
 *
 * Reusable generation barrier for workers that want every participant to
 * finish a phase before any starts the next one. Unused unless enabled in
 * the bench configuration; without it phases of different workers overlap.
 */

use parking_lot::{Condvar, Mutex};

#[derive(Debug)]
struct BarrierState {
    parties: usize,
    arrived: usize,
    generation: u64,
}

/// Generation barrier whose party count can shrink after creation
///
/// Sized to the requested worker count. A worker task that is dropped
/// before finishing (failed spawn, panic, stop request) calls
/// [`PhaseBarrier::leave`], so survivors never wait on a missing thread.
#[derive(Debug)]
pub struct PhaseBarrier {
    state: Mutex<BarrierState>,
    condvar: Condvar,
}

impl PhaseBarrier {
    pub fn new(parties: usize) -> Self {
        Self {
            state: Mutex::new(BarrierState {
                parties,
                arrived: 0,
                generation: 0,
            }),
            condvar: Condvar::new(),
        }
    }

    /// Block until all current parties have arrived
    ///
    /// Returns true for exactly one caller per generation (the last to arrive).
    pub fn wait(&self) -> bool {
        let mut state = self.state.lock();
        state.arrived += 1;

        if state.arrived >= state.parties {
            Self::release(&mut state);
            drop(state);
            self.condvar.notify_all();
            return true;
        }

        let generation = state.generation;
        while state.generation == generation {
            self.condvar.wait(&mut state);
        }
        false
    }

    /// Permanently remove one party
    pub fn leave(&self) {
        let mut state = self.state.lock();
        state.parties = state.parties.saturating_sub(1);

        if state.arrived > 0 && state.arrived >= state.parties {
            Self::release(&mut state);
            drop(state);
            self.condvar.notify_all();
        }
    }

    pub fn parties(&self) -> usize {
        self.state.lock().parties
    }

    fn release(state: &mut BarrierState) {
        state.arrived = 0;
        state.generation = state.generation.wrapping_add(1);
    }
}
