/*!
 * Shared List
 * Arena-backed doubly-linked list mutated only under the configured lock
 */

pub mod segment;
mod shared;

pub use segment::{Batch, BatchFull, Node, NodeId};
pub use shared::{DeleteMode, InsertStats, SharedList};
