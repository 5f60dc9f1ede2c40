//! Slot storage for tree nodes. Nodes refer to each other through [`NodeId`] handles instead of
//! pointers so the parent back-reference is a plain value and can't form an ownership cycle.

use std::mem;
use std::ops::{Index, IndexMut};

/// A stable handle to a node. A handle stays valid until its node is removed from the tree; the
/// slot may then be reused by a later insert.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// A vertex of the tree. Which children it has, and what `meta` caches about its subtree, is
/// maintained by [`RawTree`][crate::raw::RawTree].
#[derive(Clone, Debug)]
pub(crate) struct Node<K, M> {
    pub(crate) key: K,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) meta: M,
}

/// Owns every node of one tree. Freed slots are recycled before the backing `Vec` grows.
#[derive(Clone, Debug)]
pub(crate) struct Arena<K, M> {
    slots: Vec<Option<Node<K, M>>>,
    free: Vec<usize>,
}

impl<K, M> Default for Arena<K, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, M> Arena<K, M> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Stores `node` and returns its handle.
    pub(crate) fn alloc(&mut self, node: Node<K, M>) -> NodeId {
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                NodeId(slot)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Takes the node out of the arena. Its handle must not be used afterwards.
    ///
    /// ## Panics
    ///
    /// When `id` was already released.
    pub(crate) fn release(&mut self, id: NodeId) -> Node<K, M> {
        let node = self.slots[id.0]
            .take()
            .unwrap_or_else(|| panic!("{id:?} released twice"));
        self.free.push(id.0);
        node
    }

    /// Exchanges the keys stored in two live nodes, leaving links and metadata alone.
    pub(crate) fn swap_keys(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }
        let (low, high) = (a.0.min(b.0), a.0.max(b.0));
        let (head, tail) = self.slots.split_at_mut(high);
        match (head[low].as_mut(), tail[0].as_mut()) {
            (Some(x), Some(y)) => mem::swap(&mut x.key, &mut y.key),
            _ => panic!("swapping keys of a released node ({a:?}, {b:?})"),
        }
    }

    /// Drops every node.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

impl<K, M> Index<NodeId> for Arena<K, M> {
    type Output = Node<K, M>;

    fn index(&self, id: NodeId) -> &Self::Output {
        match self.slots.get(id.0) {
            Some(Some(node)) => node,
            _ => panic!("dangling node handle {id:?}"),
        }
    }
}

impl<K, M> IndexMut<NodeId> for Arena<K, M> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        match self.slots.get_mut(id.0) {
            Some(Some(node)) => node,
            _ => panic!("dangling node handle {id:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(key: i32) -> Node<i32, ()> {
        Node {
            key,
            left: None,
            right: None,
            parent: None,
            meta: (),
        }
    }

    #[test]
    fn released_slots_are_reused() {
        let mut arena = Arena::new();
        let a = arena.alloc(leaf(1));
        let b = arena.alloc(leaf(2));

        assert_eq!(arena.release(a).key, 1);
        let c = arena.alloc(leaf(3));

        assert_eq!(a, c);
        assert_eq!(arena[b].key, 2);
        assert_eq!(arena[c].key, 3);
    }

    #[test]
    fn swap_keys_in_either_order() {
        let mut arena = Arena::new();
        let a = arena.alloc(leaf(1));
        let b = arena.alloc(leaf(2));

        arena.swap_keys(b, a);
        assert_eq!(arena[a].key, 2);
        assert_eq!(arena[b].key, 1);

        arena.swap_keys(a, a);
        assert_eq!(arena[a].key, 2);
    }

    #[test]
    #[should_panic(expected = "dangling node handle")]
    fn released_handle_panics() {
        let mut arena = Arena::new();
        let a = arena.alloc(leaf(1));
        arena.release(a);
        let _ = &arena[a];
    }
}
