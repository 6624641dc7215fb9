//! Arena-backed doubly-linked list
//!
//! Nodes live in a `Vec` and link to each other through integer handles, so
//! there are no ownership cycles and no unsafe code. Two permanent sentinel
//! nodes bound the list: linking and unlinking never special-case an empty
//! list or the first/last element. Freed slots are recycled via a free list.

use std::iter::FusedIterator;

/// Stable handle to a node in a [`LinkedSlab`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

const HEAD: NodeId = NodeId(0);
const TAIL: NodeId = NodeId(1);

#[derive(Debug)]
enum Slot<T> {
    /// Boundary marker, never part of the logical content
    Sentinel,
    Occupied(T),
    Vacant { next_free: Option<NodeId> },
}

#[derive(Debug)]
struct Node<T> {
    slot: Slot<T>,
    prev: NodeId,
    next: NodeId,
}

/// Doubly-linked list stored in an arena. Front is the head side.
#[derive(Debug)]
pub(crate) struct LinkedSlab<T> {
    nodes: Vec<Node<T>>,
    free_head: Option<NodeId>,
    len: usize,
}

impl<T> Default for LinkedSlab<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LinkedSlab<T> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Self::sentinels(),
            free_head: None,
            len: 0,
        }
    }

    fn sentinels() -> Vec<Node<T>> {
        vec![
            Node {
                slot: Slot::Sentinel,
                prev: HEAD,
                next: TAIL,
            },
            Node {
                slot: Slot::Sentinel,
                prev: HEAD,
                next: TAIL,
            },
        ]
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of data slots allocated, live or recycled
    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> usize {
        self.nodes.len() - 2
    }

    pub(crate) fn back(&self) -> Option<NodeId> {
        let id = self.nodes[TAIL.0].prev;
        (id != HEAD).then_some(id)
    }

    /// Neighbour towards the front, `None` at the head or for a dead handle
    pub(crate) fn prev(&self, id: NodeId) -> Option<NodeId> {
        if !self.is_occupied(id) {
            return None;
        }
        let prev = self.nodes[id.0].prev;
        (prev != HEAD).then_some(prev)
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&T> {
        match &self.nodes.get(id.0)?.slot {
            Slot::Occupied(value) => Some(value),
            _ => None,
        }
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        match &mut self.nodes.get_mut(id.0)?.slot {
            Slot::Occupied(value) => Some(value),
            _ => None,
        }
    }

    pub(crate) fn push_front(&mut self, value: T) -> NodeId {
        let id = self.alloc(value);
        self.link_after(id, HEAD);
        self.len += 1;
        id
    }

    pub(crate) fn push_back(&mut self, value: T) -> NodeId {
        let id = self.alloc(value);
        self.link_before(id, TAIL);
        self.len += 1;
        id
    }

    /// Detach a node and hand its value back. The handle becomes dead.
    pub(crate) fn remove(&mut self, id: NodeId) -> Option<T> {
        if !self.is_occupied(id) {
            return None;
        }
        self.unlink(id);
        let slot = std::mem::replace(
            &mut self.nodes[id.0].slot,
            Slot::Vacant {
                next_free: self.free_head,
            },
        );
        self.free_head = Some(id);
        self.len -= 1;
        match slot {
            Slot::Occupied(value) => Some(value),
            _ => None,
        }
    }

    pub(crate) fn pop_back(&mut self) -> Option<T> {
        let id = self.back()?;
        self.remove(id)
    }

    pub(crate) fn move_to_front(&mut self, id: NodeId) -> bool {
        if !self.is_occupied(id) {
            return false;
        }
        self.unlink(id);
        self.link_after(id, HEAD);
        true
    }

    /// Relink `id` directly in front of `anchor`
    pub(crate) fn move_before(&mut self, id: NodeId, anchor: NodeId) -> bool {
        if id == anchor || !self.is_occupied(id) || !self.is_occupied(anchor) {
            return false;
        }
        self.unlink(id);
        self.link_before(id, anchor);
        true
    }

    pub(crate) fn clear(&mut self) {
        self.nodes = Self::sentinels();
        self.free_head = None;
        self.len = 0;
    }

    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            slab: self,
            front: self.nodes[HEAD.0].next,
            back: self.nodes[TAIL.0].prev,
            remaining: self.len,
        }
    }

    fn is_occupied(&self, id: NodeId) -> bool {
        matches!(
            self.nodes.get(id.0).map(|node| &node.slot),
            Some(Slot::Occupied(_))
        )
    }

    fn alloc(&mut self, value: T) -> NodeId {
        if let Some(id) = self.free_head {
            let node = &mut self.nodes[id.0];
            self.free_head = match node.slot {
                Slot::Vacant { next_free } => next_free,
                _ => None,
            };
            node.slot = Slot::Occupied(value);
            id
        } else {
            let id = NodeId(self.nodes.len());
            self.nodes.push(Node {
                slot: Slot::Occupied(value),
                prev: id,
                next: id,
            });
            id
        }
    }

    fn unlink(&mut self, id: NodeId) {
        let prev = self.nodes[id.0].prev;
        let next = self.nodes[id.0].next;
        self.nodes[prev.0].next = next;
        self.nodes[next.0].prev = prev;
    }

    fn link_after(&mut self, id: NodeId, anchor: NodeId) {
        let next = self.nodes[anchor.0].next;
        self.nodes[id.0].prev = anchor;
        self.nodes[id.0].next = next;
        self.nodes[anchor.0].next = id;
        self.nodes[next.0].prev = id;
    }

    fn link_before(&mut self, id: NodeId, anchor: NodeId) {
        let prev = self.nodes[anchor.0].prev;
        self.link_after(id, prev);
    }
}

/// Iterator over live values, front to back (reversible)
pub(crate) struct Iter<'a, T> {
    slab: &'a LinkedSlab<T>,
    front: NodeId,
    back: NodeId,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (NodeId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front;
        let node = &self.slab.nodes[id.0];
        self.front = node.next;
        self.remaining -= 1;
        match &node.slot {
            Slot::Occupied(value) => Some((id, value)),
            _ => None,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back;
        let node = &self.slab.nodes[id.0];
        self.back = node.prev;
        self.remaining -= 1;
        match &node.slot {
            Slot::Occupied(value) => Some((id, value)),
            _ => None,
        }
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
