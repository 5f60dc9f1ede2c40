//! The primitives every engine is built from: locating keys, linking nodes in and out, and the two
//! rotations. Nothing here decides *when* to rotate; that policy belongs to each engine.

use std::cmp::Ordering;
use std::fmt::{self, Write};

use tracing::trace;

use crate::arena::{Arena, Node, NodeId};
use crate::node::{Metadata, NodeRef};
use crate::util::Side;

/// Where a key lives in the tree, or where it would be attached if it isn't there.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Locate {
    /// A node already holds the key.
    Found(NodeId),
    /// The key is absent and belongs in this empty slot.
    Vacant(Slot),
}

/// An empty position in the tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Slot {
    /// The tree is empty.
    Root,
    /// The given child slot of a node.
    Child(NodeId, Side),
}

/// A binary search tree with parent links and no balancing policy of its own.
#[derive(Clone)]
pub(crate) struct RawTree<K, M> {
    nodes: Arena<K, M>,
    root: Option<NodeId>,
}

impl<K, M> Default for RawTree<K, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, M> RawTree<K, M> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
        }
    }

    pub(crate) fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub(crate) fn node_ref(&self, id: NodeId) -> NodeRef<'_, K, M> {
        NodeRef::new(self, id)
    }

    pub(crate) fn key(&self, id: NodeId) -> &K {
        &self.nodes[id].key
    }

    pub(crate) fn left(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].left
    }

    pub(crate) fn right(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].right
    }

    pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub(crate) fn child(&self, id: NodeId, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.nodes[id].left,
            Side::Right => self.nodes[id].right,
        }
    }

    pub(crate) fn meta(&self, id: NodeId) -> M
    where
        M: Copy,
    {
        self.nodes[id].meta
    }

    pub(crate) fn meta_ref(&self, id: NodeId) -> &M {
        &self.nodes[id].meta
    }

    pub(crate) fn set_meta(&mut self, id: NodeId, meta: M) {
        self.nodes[id].meta = meta;
    }

    /// Which slot of its parent `id` hangs from, or `None` for the root.
    ///
    /// ## Panics
    ///
    /// When the parent doesn't link back to `id`, which means the tree is corrupt.
    pub(crate) fn side_of(&self, id: NodeId) -> Option<Side> {
        let parent = self.nodes[id].parent?;
        if self.nodes[parent].left == Some(id) {
            Some(Side::Left)
        } else if self.nodes[parent].right == Some(id) {
            Some(Side::Right)
        } else {
            panic!("{id:?} is not a child of its parent {parent:?}")
        }
    }

    /// Puts `child` in `id`'s `side` slot. Only the downward link changes; the caller fixes
    /// `child`'s parent link.
    fn set_child(&mut self, id: NodeId, side: Side, child: Option<NodeId>) {
        match side {
            Side::Left => self.nodes[id].left = child,
            Side::Right => self.nodes[id].right = child,
        }
    }

    /// Puts `child` in `id`'s `side` slot and points `child` back at `id`.
    pub(crate) fn adopt(&mut self, id: NodeId, side: Side, child: Option<NodeId>) {
        self.set_child(id, side, child);
        if let Some(child) = child {
            self.nodes[child].parent = Some(id);
        }
    }

    /// Finds the node holding `key`, or the empty slot it would be attached to.
    pub(crate) fn locate(&self, key: &K) -> Locate
    where
        K: Ord,
    {
        let mut slot = Slot::Root;
        let mut current = self.root;
        while let Some(id) = current {
            let side = match key.cmp(&self.nodes[id].key) {
                Ordering::Less => Side::Left,
                Ordering::Equal => return Locate::Found(id),
                Ordering::Greater => Side::Right,
            };
            slot = Slot::Child(id, side);
            current = self.child(id, side);
        }
        Locate::Vacant(slot)
    }

    pub(crate) fn search(&self, key: &K) -> Option<NodeId>
    where
        K: Ord,
    {
        match self.locate(key) {
            Locate::Found(id) => Some(id),
            Locate::Vacant(_) => None,
        }
    }

    /// The leftmost node of the subtree rooted at `id`.
    pub(crate) fn minimum(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.nodes[id].left {
            id = left;
        }
        id
    }

    /// The rightmost node of the subtree rooted at `id`.
    pub(crate) fn maximum(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.nodes[id].right {
            id = right;
        }
        id
    }

    /// The node with the next larger key, if any.
    pub(crate) fn successor(&self, id: NodeId) -> Option<NodeId> {
        self.neighbor(id, Side::Right)
    }

    /// The node with the next smaller key, if any.
    pub(crate) fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        self.neighbor(id, Side::Left)
    }

    /// The in-order neighbor on the given side: the extreme node of that subtree if there is one,
    /// otherwise the first ancestor reached from the opposite side.
    fn neighbor(&self, id: NodeId, side: Side) -> Option<NodeId> {
        if let Some(child) = self.child(id, side) {
            return Some(match side {
                Side::Left => self.maximum(child),
                Side::Right => self.minimum(child),
            });
        }

        let mut current = id;
        while self.side_of(current) == Some(side) {
            current = self.nodes[current].parent?;
        }
        self.nodes[current].parent
    }

    /// Replaces the subtree rooted at `u` with the subtree rooted at `v` in `u`'s parent slot, or
    /// as the new root. `u`'s own links and `v`'s children are left for the caller to fix.
    pub(crate) fn transplant(&mut self, u: NodeId, v: Option<NodeId>) {
        let parent = self.nodes[u].parent;
        match (parent, self.side_of(u)) {
            (Some(parent), Some(side)) => self.set_child(parent, side, v),
            _ => self.root = v,
        }
        if let Some(v) = v {
            self.nodes[v].parent = parent;
        }
    }

    /// Takes a node that is no longer linked into the tree out of the arena.
    pub(crate) fn release(&mut self, id: NodeId) -> K {
        self.nodes.release(id).key
    }

    /// Swaps the keys of two nodes without moving the nodes. The caller keeps the order intact.
    pub(crate) fn swap_keys(&mut self, a: NodeId, b: NodeId) {
        self.nodes.swap_keys(a, b);
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Iterates over the keys in ascending order.
    pub(crate) fn iter(&self) -> Iter<'_, K, M> {
        Iter {
            tree: self,
            next: self.root.map(|root| self.minimum(root)),
        }
    }

    /// Renders the tree as an indented outline, one node per line, left child before right.
    /// Left children are drawn with `├── ` and right children with `└── `, so a lone child
    /// still shows its side.
    ///
    /// ```text
    /// └── 20 (h=2)
    ///     ├── 10 (h=1)
    ///     └── 30 (h=1)
    /// ```
    pub(crate) fn render(&self) -> String
    where
        K: fmt::Debug,
        M: fmt::Display,
    {
        let mut out = String::new();
        // Explicit stack so a degenerate tree can't overflow the call stack.
        let mut stack: Vec<(NodeId, String, bool)> = self
            .root
            .map(|root| (root, String::new(), false))
            .into_iter()
            .collect();
        while let Some((id, prefix, is_left)) = stack.pop() {
            let node = &self.nodes[id];
            let branch = if is_left { "├── " } else { "└── " };
            writeln!(out, "{prefix}{branch}{:?}{}", node.key, node.meta)
                .expect("writing to a String cannot fail");

            let child_prefix = format!("{prefix}{}", if is_left { "│   " } else { "    " });
            if let Some(right) = node.right {
                stack.push((right, child_prefix.clone(), false));
            }
            if let Some(left) = node.left {
                stack.push((left, child_prefix, true));
            }
        }
        out
    }
}

impl<K, M> RawTree<K, M>
where
    M: Metadata,
{
    /// Creates a node for `key` in the empty `slot`.
    pub(crate) fn attach(&mut self, key: K, slot: Slot) -> NodeId {
        let parent = match slot {
            Slot::Root => None,
            Slot::Child(parent, _) => Some(parent),
        };
        let id = self.nodes.alloc(Node {
            key,
            left: None,
            right: None,
            parent,
            meta: M::leaf(),
        });
        match slot {
            Slot::Root => self.root = Some(id),
            Slot::Child(parent, side) => self.set_child(parent, side, Some(id)),
        }
        id
    }

    /// Recomputes the metadata of `id` from its children.
    pub(crate) fn refresh(&mut self, id: NodeId) {
        let node = &self.nodes[id];
        let left = node.left.map(|l| self.nodes[l].meta);
        let right = node.right.map(|r| self.nodes[r].meta);
        let meta = node.meta.recompute(left, right);
        self.nodes[id].meta = meta;
    }

    /// Rotates `z` down towards `direction`, lifting its child from the other side into its place.
    /// Returns the lifted child, which is the new root of the subtree.
    ///
    /// ## Panics
    ///
    /// When `z` has no child on the side opposite `direction`.
    ///
    /// # Diagram
    ///
    /// Rotating to the left:
    ///
    /// ```text
    ///   Option<parent>                Option<parent>
    ///      /                             /
    ///     z                            pivot
    ///    / \                           /   \
    ///   a   pivot     rotate ->       z     c
    ///       /   \                    / \
    ///      b     c                  a   b
    /// ```
    ///
    /// Only `z`, `pivot` and `b` get new parents. `z` is refreshed before `pivot` because it is
    /// now below it.
    pub(crate) fn rotate(&mut self, z: NodeId, direction: Side) -> NodeId {
        let lift = direction.flip();
        let pivot = self
            .child(z, lift)
            .unwrap_or_else(|| panic!("rotating {z:?} {direction:?} requires a {lift:?} child"));
        let inner = self.child(pivot, direction);
        let parent = self.nodes[z].parent;
        let side = self.side_of(z);

        trace!(?z, ?pivot, ?direction, "rotate");

        self.adopt(z, lift, inner);

        self.nodes[pivot].parent = parent;
        match (parent, side) {
            (Some(parent), Some(side)) => self.set_child(parent, side, Some(pivot)),
            _ => self.root = Some(pivot),
        }

        self.adopt(pivot, direction, Some(z));

        self.refresh(z);
        self.refresh(pivot);
        pivot
    }

    /// Lifts the right child of `z` into its place. See [`RawTree::rotate`].
    pub(crate) fn rotate_left(&mut self, z: NodeId) -> NodeId {
        self.rotate(z, Side::Left)
    }

    /// Lifts the left child of `z` into its place. See [`RawTree::rotate`].
    pub(crate) fn rotate_right(&mut self, z: NodeId) -> NodeId {
        self.rotate(z, Side::Right)
    }

    /// Unlinks `id` with the textbook three cases and frees it:
    ///
    /// 1. no left child: the right subtree takes its place;
    /// 2. no right child: the left subtree takes its place;
    /// 3. both: its in-order successor takes its place, after handing its own right subtree to
    ///    its old parent.
    ///
    /// Returns the removed key and the lowest node whose subtree lost height, which is where a
    /// height-balancing engine starts retracing. Metadata on the path above it is stale.
    pub(crate) fn remove_node(&mut self, id: NodeId) -> (K, Option<NodeId>) {
        let node = &self.nodes[id];
        let (left, right, parent) = (node.left, node.right, node.parent);

        let lowest_changed = match (left, right) {
            (None, _) => {
                self.transplant(id, right);
                parent
            }
            (_, None) => {
                self.transplant(id, left);
                parent
            }
            (Some(left), Some(right)) => {
                let successor = self.minimum(right);
                let lowest_changed = if self.nodes[successor].parent == Some(id) {
                    successor
                } else {
                    let successor_parent = self.nodes[successor]
                        .parent
                        .expect("a successor below the right child has a parent");
                    let successor_right = self.nodes[successor].right;
                    self.transplant(successor, successor_right);
                    self.adopt(successor, Side::Right, Some(right));
                    successor_parent
                };
                self.transplant(id, Some(successor));
                self.adopt(successor, Side::Left, Some(left));
                Some(lowest_changed)
            }
        };

        (self.release(id), lowest_changed)
    }
}

/// An iterator over the keys of a tree in ascending order. Each step follows one successor link,
/// so a full pass is `O(n)`.
pub struct Iter<'a, K, M> {
    tree: &'a RawTree<K, M>,
    next: Option<NodeId>,
}

impl<'a, K, M> Iterator for Iter<'a, K, M> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.tree.successor(id);
        Some(self.tree.key(id))
    }
}

impl<K, M> std::iter::FusedIterator for Iter<'_, K, M> {}
