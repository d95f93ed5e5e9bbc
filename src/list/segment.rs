/*!
 * List Segments
 *
 * Node storage for the shared list. Every insert batch becomes one segment:
 * a slab of nodes built privately, outside any lock, with its internal
 * links already in place. Splicing a segment into the list only rewires the
 * two boundary links.
 */

use std::collections::TryReserveError;

/// Stable address of a node: owning segment plus slot inside it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub segment: u64,
    pub slot: u32,
}

/// List node
///
/// `prev`/`next` are relations between node ids, not references; only the
/// list itself rewrites them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub value: i64,
    pub(crate) prev: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
}

/// Why a batch stopped growing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchFull {
    /// The allocator refused more memory
    Alloc(TryReserveError),
    /// The configured node budget is used up
    Limit,
    /// Slot addresses are exhausted for this segment
    Slots,
}

/// Private, unshared run of nodes in insertion order
///
/// Built without holding the list lock. Once full (or finished) it is handed
/// to [`SharedList::splice`](super::SharedList::splice).
#[derive(Debug)]
pub struct Batch {
    id: u64,
    slots: Vec<Option<Node>>,
    limit: Option<u64>,
}

impl Batch {
    pub(crate) fn new(id: u64) -> Self {
        Self {
            id,
            slots: Vec::new(),
            limit: None,
        }
    }

    /// Cap the number of nodes this batch may hold
    pub fn with_limit(mut self, limit: Option<u64>) -> Self {
        self.limit = limit;
        self
    }

    /// Allocate one node holding `value` and link it after the current tail
    pub fn push(&mut self, value: i64) -> Result<NodeId, BatchFull> {
        if let Some(limit) = self.limit {
            if self.slots.len() as u64 >= limit {
                return Err(BatchFull::Limit);
            }
        }
        let slot = u32::try_from(self.slots.len()).map_err(|_| BatchFull::Slots)?;
        self.slots.try_reserve(1).map_err(BatchFull::Alloc)?;

        let id = NodeId {
            segment: self.id,
            slot,
        };
        let prev = slot.checked_sub(1).map(|p| NodeId {
            segment: self.id,
            slot: p,
        });
        if let Some(Some(tail)) = self.slots.last_mut() {
            tail.next = Some(id);
        }

        self.slots.push(Some(Node {
            value,
            prev,
            next: None,
        }));
        Ok(id)
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn into_segment(self) -> Segment {
        Segment {
            live: self.slots.len(),
            slots: self.slots,
        }
    }
}

/// Node slab owned by the shared list
#[derive(Debug)]
pub(crate) struct Segment {
    slots: Vec<Option<Node>>,
    live: usize,
}

impl Segment {
    #[inline]
    pub(crate) fn node(&self, slot: u32) -> Option<&Node> {
        self.slots.get(slot as usize).and_then(Option::as_ref)
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, slot: u32) -> Option<&mut Node> {
        self.slots.get_mut(slot as usize).and_then(Option::as_mut)
    }

    /// Vacate a slot, returning its node; storage is released with the segment
    pub(crate) fn take(&mut self, slot: u32) -> Option<Node> {
        let node = self.slots.get_mut(slot as usize)?.take()?;
        self.live -= 1;
        Some(node)
    }

    #[inline]
    pub(crate) fn live(&self) -> usize {
        self.live
    }

    pub(crate) fn first_id(&self, segment: u64) -> Option<NodeId> {
        (!self.slots.is_empty()).then_some(NodeId { segment, slot: 0 })
    }

    pub(crate) fn last_id(&self, segment: u64) -> Option<NodeId> {
        let slot = u32::try_from(self.slots.len().checked_sub(1)?).ok()?;
        Some(NodeId { segment, slot })
    }
}
