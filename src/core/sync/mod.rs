/*!
 * Synchronization Primitives
 *
 * Lock strategies and coordination primitives used by the benchmark:
 * - Spin lock (busy-poll, never parks)
 * - Blocking mutex (parking_lot, parks under contention)
 * - Stop signal, countdown latch and optional phase barrier for workers
 *
 * # Architecture
 *
 * Both lock strategies implement `lock_api::RawMutex`; `RawListLock`
 * dispatches to whichever was selected at startup so guarded data is always
 * a `ListMutex<T>` with scoped, drop-released guards.
 */

mod barrier;
mod latch;
mod signal;
mod spinlock;
mod strategy;

pub use barrier::PhaseBarrier;
pub use latch::{CountdownLatch, LatchToken};
pub use signal::StopSignal;
pub use spinlock::{RawSpinLock, SpinMutex};
pub use strategy::{list_mutex, ListGuard, ListMutex, LockStrategy, RawListLock};
