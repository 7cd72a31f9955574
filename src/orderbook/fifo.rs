//! Intrusive FIFO queue threaded through order records.
//!
//! The queue itself stores only head and tail identifiers. Links live inside
//! the order records as [`FifoNode`]s and every link or unlink resolves
//! `id -> node` through a [`NodeLookup`], so there are no pointers into the
//! index and rehashing cannot invalidate anything.

use super::order::OrderKey;

/// Queue links carried inside an order record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FifoNode<Id> {
    pub(crate) prev: Option<Id>,
    pub(crate) next: Option<Id>,
    pub(crate) in_queue: bool,
}

impl<Id> FifoNode<Id> {
    /// Whether the node is presently linked into a level queue.
    #[inline]
    #[must_use]
    pub fn in_queue(&self) -> bool {
        self.in_queue
    }

    pub(crate) fn reset(&mut self) {
        self.prev = None;
        self.next = None;
        self.in_queue = false;
    }
}

impl<Id> Default for FifoNode<Id> {
    fn default() -> Self {
        Self {
            prev: None,
            next: None,
            in_queue: false,
        }
    }
}

/// Resolves an order identifier to its queue node.
///
/// The order index implements this; the queue never holds references of its
/// own.
pub trait NodeLookup<Id> {
    /// Shared access to the node for `id`.
    fn node(&self, id: Id) -> &FifoNode<Id>;
    /// Exclusive access to the node for `id`.
    fn node_mut(&mut self, id: Id) -> &mut FifoNode<Id>;
}

/// Doubly linked FIFO of order identifiers for one price level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FifoQueue<Id> {
    head: Option<Id>,
    tail: Option<Id>,
}

impl<Id> Default for FifoQueue<Id> {
    fn default() -> Self {
        Self {
            head: None,
            tail: None,
        }
    }
}

impl<Id: OrderKey> FifoQueue<Id> {
    /// Whether the queue holds no orders.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Identifier at the head of the queue.
    #[inline]
    #[must_use]
    pub fn front(&self) -> Option<Id> {
        self.head
    }

    /// Identifier at the tail of the queue.
    #[inline]
    #[must_use]
    pub fn back(&self) -> Option<Id> {
        self.tail
    }

    /// Append `id` to the tail.
    ///
    /// # Panics
    ///
    /// Panics if the node for `id` is already linked.
    pub fn push_back<N: NodeLookup<Id>>(&mut self, id: Id, nodes: &mut N) {
        let tail = self.tail;
        {
            let node = nodes.node_mut(id);
            assert!(!node.in_queue, "order {id:?} already queued");
            node.prev = tail;
            node.next = None;
            node.in_queue = true;
        }
        match tail {
            Some(tail_id) => nodes.node_mut(tail_id).next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
    }

    /// Unlink `id` from wherever it sits in the queue.
    ///
    /// # Panics
    ///
    /// Panics if the node for `id` is not linked.
    pub fn erase<N: NodeLookup<Id>>(&mut self, id: Id, nodes: &mut N) {
        let (prev, next) = {
            let node = nodes.node_mut(id);
            assert!(node.in_queue, "order {id:?} not queued");
            let links = (node.prev, node.next);
            node.reset();
            links
        };
        match prev {
            Some(prev_id) => nodes.node_mut(prev_id).next = next,
            None => self.head = next,
        }
        match next {
            Some(next_id) => nodes.node_mut(next_id).prev = prev,
            None => self.tail = prev,
        }
    }

    /// Send `id` to the tail, losing its queue priority. No-op when the node
    /// is unlinked or already last.
    pub fn move_to_back<N: NodeLookup<Id>>(&mut self, id: Id, nodes: &mut N) {
        {
            let node = nodes.node(id);
            if !node.in_queue || node.next.is_none() {
                return;
            }
        }
        self.erase(id, nodes);
        self.push_back(id, nodes);
    }

    /// Unlink every node and empty the queue.
    pub fn clear<N: NodeLookup<Id>>(&mut self, nodes: &mut N) {
        let mut current = self.head;
        while let Some(id) = current {
            let node = nodes.node_mut(id);
            current = node.next;
            node.reset();
        }
        self.reset();
    }

    /// Drop the head and tail without touching any nodes. Only valid when
    /// the nodes are being destroyed wholesale alongside the queue.
    pub(crate) fn reset(&mut self) {
        self.head = None;
        self.tail = None;
    }
}
