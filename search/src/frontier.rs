//! Indexed best-first frontier.
//!
//! One binary min-heap of arena ids ordered by `f = g + h`, plus an
//! id → heap-slot map kept in lockstep so that an in-place node improvement
//! becomes a decrease-key instead of the remove-and-reinsert the original
//! priority queues needed. The heap stores ids only; every priority read
//! goes through the arena, the single source of truth for node state.

use std::collections::HashMap;

use crate::node::{AllocError, NodeArena, NodeId};

/// Min-heap over arena ids with O(log n) decrease-key.
///
/// Ties on `f` break toward the older (lower) arena id, so seed nodes are
/// expanded before nodes discovered later at equal priority.
#[derive(Debug, Default)]
pub struct Frontier {
    heap: Vec<NodeId>,
    slots: HashMap<NodeId, usize>,
}

impl Frontier {
    #[must_use]
    pub fn new() -> Self {
        Self {
            heap: Vec::new(),
            slots: HashMap::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Lowest `f` currently queued, without removing it.
    #[must_use]
    pub fn peek_min(&self) -> Option<NodeId> {
        self.heap.first().copied()
    }

    /// `g` of the minimum-priority node. In Dijkstra mode (`h = 0`) this is
    /// the fill's frontier distance: nothing closer than it can still be
    /// waiting in the open list.
    #[must_use]
    pub fn peek_min_g(&self, arena: &NodeArena) -> Option<f32> {
        self.peek_min().map(|id| arena.get(id).g)
    }

    /// Insert a node id, reporting allocation failure instead of aborting.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if the heap or slot map cannot grow.
    pub fn push(&mut self, arena: &NodeArena, id: NodeId) -> Result<(), AllocError> {
        debug_assert!(!self.slots.contains_key(&id), "id already queued");
        if self.heap.len() == self.heap.capacity() {
            self.heap
                .try_reserve(self.heap.len().max(64))
                .map_err(|_| AllocError)?;
        }
        self.slots.try_reserve(1).map_err(|_| AllocError)?;
        let slot = self.heap.len();
        self.heap.push(id);
        self.slots.insert(id, slot);
        self.sift_up(arena, slot);
        Ok(())
    }

    /// Remove and return the lowest-`f` node id.
    pub fn pop_min(&mut self, arena: &NodeArena) -> Option<NodeId> {
        let min = *self.heap.first()?;
        self.slots.remove(&min);
        let last = self.heap.pop().filter(|_| !self.heap.is_empty());
        if let Some(last) = last {
            self.heap[0] = last;
            self.slots.insert(last, 0);
            self.sift_down(arena, 0);
        }
        Some(min)
    }

    /// Restore heap order after the arena node behind `id` changed priority.
    ///
    /// Relaxation only ever lowers `f`, so this is a decrease-key; the
    /// downward sift is kept for safety should a caller raise a priority.
    pub fn reprioritize(&mut self, arena: &NodeArena, id: NodeId) {
        if let Some(&slot) = self.slots.get(&id) {
            let slot = self.sift_up(arena, slot);
            self.sift_down(arena, slot);
        }
    }

    fn less(&self, arena: &NodeArena, a: usize, b: usize) -> bool {
        let na = arena.get(self.heap[a]);
        let nb = arena.get(self.heap[b]);
        match na.f().total_cmp(&nb.f()) {
            std::cmp::Ordering::Less => true,
            std::cmp::Ordering::Greater => false,
            std::cmp::Ordering::Equal => self.heap[a].index() < self.heap[b].index(),
        }
    }

    fn swap_slots(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.slots.insert(self.heap[a], a);
        self.slots.insert(self.heap[b], b);
    }

    fn sift_up(&mut self, arena: &NodeArena, mut slot: usize) -> usize {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.less(arena, slot, parent) {
                self.swap_slots(slot, parent);
                slot = parent;
            } else {
                break;
            }
        }
        slot
    }

    fn sift_down(&mut self, arena: &NodeArena, mut slot: usize) {
        loop {
            let left = 2 * slot + 1;
            if left >= self.heap.len() {
                break;
            }
            let right = left + 1;
            let mut smallest = slot;
            if self.less(arena, left, smallest) {
                smallest = left;
            }
            if right < self.heap.len() && self.less(arena, right, smallest) {
                smallest = right;
            }
            if smallest == slot {
                break;
            }
            self.swap_slots(slot, smallest);
            slot = smallest;
        }
    }
}
