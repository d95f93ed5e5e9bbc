/*!
 * Shared List
 *
 * Doubly-linked, insertion-ordered list of integer nodes guarded by a single
 * lock of the configured strategy. Every traversal or mutation happens inside
 * one scoped acquisition; nothing outside this module touches node links.
 *
 * # Critical sections
 *
 * - **insert**: nodes are allocated into a private batch first; the lock only
 *   covers the O(1) tail splice
 * - **search**: one traversal, stops once the whole range has been seen
 * - **delete**: in-place (free under lock) or move-then-free (unlink under
 *   lock, release storage after unlocking)
 */

use super::segment::{Batch, Node, NodeId, Segment};
use crate::bench::partition::Range;
use crate::core::errors::BenchError;
use crate::core::sync::{list_mutex, ListGuard, ListMutex, LockStrategy};
use ahash::RandomState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// How `delete_range` releases removed nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteMode {
    /// Unlink and free each node while holding the lock
    #[serde(alias = "in-place")]
    InPlace,
    /// Unlink under the lock, free after releasing it
    #[default]
    #[serde(alias = "move-then-free")]
    MoveThenFree,
}

impl DeleteMode {
    pub fn name(self) -> &'static str {
        match self {
            Self::InPlace => "in_place",
            Self::MoveThenFree => "move_then_free",
        }
    }
}

impl fmt::Display for DeleteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DeleteMode {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "in_place" | "inplace" => Ok(Self::InPlace),
            "move_then_free" | "move" => Ok(Self::MoveThenFree),
            other => Err(BenchError::InvalidDeleteMode(other.to_string())),
        }
    }
}

/// Lock-protected list state
#[derive(Debug, Default)]
struct ListInner {
    segments: HashMap<u64, Segment, RandomState>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    len: usize,
}

impl ListInner {
    #[inline]
    fn node(&self, id: NodeId) -> Option<&Node> {
        self.segments.get(&id.segment)?.node(id.slot)
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.segments.get_mut(&id.segment)?.node_mut(id.slot)
    }

    /// Append a sealed segment after the current tail
    fn append(&mut self, id: u64, mut segment: Segment) -> usize {
        let (Some(first), Some(last)) = (segment.first_id(id), segment.last_id(id)) else {
            return 0;
        };
        let added = segment.live();

        match self.tail {
            Some(tail) => {
                if let Some(node) = self.node_mut(tail) {
                    node.next = Some(first);
                }
                if let Some(node) = segment.node_mut(first.slot) {
                    node.prev = Some(tail);
                }
            }
            None => self.head = Some(first),
        }
        self.tail = Some(last);
        self.len += added;
        self.segments.insert(id, segment);
        added
    }

    /// Unlink `id` from the chain
    ///
    /// Returns the owning segment when this removal left it with no live
    /// nodes; the caller decides where that storage is released.
    fn unlink(&mut self, id: NodeId) -> Option<Option<Segment>> {
        let segment = self.segments.get_mut(&id.segment)?;
        let node = segment.take(id.slot)?;
        let emptied = segment.live() == 0;

        match node.prev {
            Some(prev) => {
                if let Some(p) = self.node_mut(prev) {
                    p.next = node.next;
                }
            }
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => {
                if let Some(n) = self.node_mut(next) {
                    n.prev = node.prev;
                }
            }
            None => self.tail = node.prev,
        }
        self.len -= 1;

        Some(if emptied {
            self.segments.remove(&id.segment)
        } else {
            None
        })
    }
}

/// Outcome of one timed insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertStats {
    pub inserted: u64,
    /// Lock acquisition plus the tail splice
    pub locked: Duration,
}

/// Storage unlinked under the lock and released after it
#[derive(Debug, Default)]
struct Detached {
    segments: Vec<Segment>,
    removed: u64,
}

/// Shared list guarded by one lock
pub struct SharedList {
    inner: ListMutex<ListInner>,
    strategy: LockStrategy,
    next_segment: AtomicU64,
    /// Segments currently linked; read without the lock as a sizing hint
    segment_count: AtomicUsize,
    contended: AtomicU64,
}

impl SharedList {
    pub fn new(strategy: LockStrategy) -> Self {
        Self::with_capacity(strategy, 0)
    }

    /// Pre-size segment bookkeeping so splices of up to `batches` concurrent
    /// batches do not reallocate under the lock
    pub fn with_capacity(strategy: LockStrategy, batches: usize) -> Self {
        let inner = ListInner {
            segments: HashMap::with_capacity_and_hasher(batches, RandomState::new()),
            ..ListInner::default()
        };

        Self {
            inner: list_mutex(strategy, inner),
            strategy,
            next_segment: AtomicU64::new(0),
            segment_count: AtomicUsize::new(0),
            contended: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn strategy(&self) -> LockStrategy {
        self.strategy
    }

    /// Acquire the list lock, counting acquisitions that found it held
    #[inline]
    fn acquire(&self) -> ListGuard<'_, ListInner> {
        if let Some(guard) = self.inner.try_lock() {
            return guard;
        }
        self.contended.fetch_add(1, Ordering::Relaxed);
        self.inner.lock()
    }

    /// Start a private batch; no lock is taken
    pub fn new_batch(&self) -> Batch {
        Batch::new(self.next_segment.fetch_add(1, Ordering::Relaxed))
    }

    /// Merge a finished batch onto the tail in one critical section
    ///
    /// Returns the number of nodes added.
    pub fn splice(&self, batch: Batch) -> usize {
        self.splice_timed(batch).0
    }

    /// [`splice`](Self::splice), also measuring lock acquisition plus the
    /// splice itself
    fn splice_timed(&self, batch: Batch) -> (usize, Duration) {
        let id = batch.id();
        let segment = batch.into_segment();
        if segment.live() == 0 {
            return (0, Duration::ZERO);
        }

        let start = Instant::now();
        let mut inner = self.acquire();
        let added = inner.append(id, segment);
        self.segment_count.store(inner.segments.len(), Ordering::Relaxed);
        drop(inner);
        (added, start.elapsed())
    }

    /// Insert one node per value of `range`, ascending
    ///
    /// Returns how many nodes were inserted; fewer than `range.len()` means
    /// allocation stopped early and the partial batch was merged anyway.
    pub fn insert_range(&self, range: Range) -> u64 {
        self.insert_range_limited(range, None)
    }

    /// [`insert_range`](Self::insert_range) with a cap on nodes allocated
    pub fn insert_range_limited(&self, range: Range, max_nodes: Option<u64>) -> u64 {
        self.insert_range_timed(range, max_nodes).inserted
    }

    /// Insert `range` (capped at `max_nodes`) and report how long the lock
    /// was waited for and held
    ///
    /// Building the batch is not part of [`InsertStats::locked`]; only the
    /// acquisition and the O(1) splice are.
    pub fn insert_range_timed(&self, range: Range, max_nodes: Option<u64>) -> InsertStats {
        let mut batch = self.new_batch().with_limit(max_nodes);

        for value in range.values() {
            if let Err(reason) = batch.push(value) {
                warn!(
                    %range,
                    built = batch.len(),
                    reason = ?reason,
                    "node allocation stopped early, merging partial batch"
                );
                break;
            }
        }

        let (added, locked) = self.splice_timed(batch);
        InsertStats {
            inserted: added as u64,
            locked,
        }
    }

    /// Count nodes whose value lies in `range`
    ///
    /// Stops as soon as `range.len()` matches are seen, otherwise walks the
    /// whole list. The count reflects the list as it was while the lock was
    /// held.
    pub fn count_in_range(&self, range: Range) -> u64 {
        if range.is_empty() {
            return 0;
        }
        let expected = range.len();

        let inner = self.acquire();
        let mut found = 0u64;
        let mut cursor = inner.head;

        while let Some(id) = cursor {
            let Some(node) = inner.node(id) else {
                break;
            };
            if range.contains(node.value) {
                found += 1;
                if found == expected {
                    break;
                }
            }
            cursor = node.next;
        }

        found
    }

    /// Remove every node whose value lies in `range`
    ///
    /// Surviving nodes keep their relative order. Returns the number removed.
    pub fn delete_range(&self, range: Range, mode: DeleteMode) -> u64 {
        if range.is_empty() {
            return 0;
        }

        match mode {
            DeleteMode::InPlace => self.delete_in_place(range),
            DeleteMode::MoveThenFree => {
                let detached = self.detach_range(range);
                let removed = detached.removed;
                // Segment storage is released here, after the lock is gone
                drop(detached);
                removed
            }
        }
    }

    fn delete_in_place(&self, range: Range) -> u64 {
        let mut inner = self.acquire();
        let mut removed = 0u64;
        let mut cursor = inner.head;

        while let Some(id) = cursor {
            let Some(node) = inner.node(id) else {
                break;
            };
            cursor = node.next;

            if range.contains(node.value) {
                if let Some(emptied) = inner.unlink(id) {
                    removed += 1;
                    drop(emptied);
                }
            }
        }

        self.segment_count
            .store(inner.segments.len(), Ordering::Relaxed);
        removed
    }

    fn detach_range(&self, range: Range) -> Detached {
        // Sized before locking so emptied segments never grow the vec under it
        let mut detached = Detached {
            segments: Vec::with_capacity(self.segment_count.load(Ordering::Relaxed) + 1),
            removed: 0,
        };

        let mut inner = self.acquire();
        let mut cursor = inner.head;

        while let Some(id) = cursor {
            let Some(node) = inner.node(id) else {
                break;
            };
            cursor = node.next;

            if range.contains(node.value) {
                if let Some(emptied) = inner.unlink(id) {
                    detached.removed += 1;
                    detached.segments.extend(emptied);
                }
            }
        }

        self.segment_count
            .store(inner.segments.len(), Ordering::Relaxed);
        detached
    }

    /// Remove every node left in the list
    ///
    /// Storage is released after the lock is dropped. Calling it on an empty
    /// list is a no-op. Returns the number of nodes drained.
    pub fn drain(&self) -> u64 {
        let (segments, drained) = {
            let mut inner = self.acquire();
            let drained = inner.len as u64;
            inner.head = None;
            inner.tail = None;
            inner.len = 0;
            self.segment_count.store(0, Ordering::Relaxed);
            (std::mem::take(&mut inner.segments), drained)
        };

        if drained > 0 {
            debug!(drained, segments = segments.len(), "drained shared list");
        }
        drained
    }

    pub fn len(&self) -> usize {
        self.acquire().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values in list order (walks the whole list under the lock)
    pub fn values(&self) -> Vec<i64> {
        let inner = self.acquire();
        let mut out = Vec::with_capacity(inner.len);
        let mut cursor = inner.head;

        while let Some(id) = cursor {
            let Some(node) = inner.node(id) else {
                break;
            };
            out.push(node.value);
            cursor = node.next;
        }
        out
    }

    /// Acquisitions that found the lock already held
    pub fn contended_acquisitions(&self) -> u64 {
        self.contended.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for SharedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedList")
            .field("strategy", &self.strategy)
            .field("contended", &self.contended_acquisitions())
            .finish_non_exhaustive()
    }
}
