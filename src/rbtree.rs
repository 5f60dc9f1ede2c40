//! A red-black search tree. Nodes are colored so that no red node has a red child and every path
//! down to an empty slot meets the same number of black nodes, which keeps the tree at most
//! 2 lg(N + 1) tall.
//!
//! # Examples
//!
//! ```
//! use ordtree::rbtree::{Color, RbTree};
//!
//! let mut tree = RbTree::new();
//!
//! tree.insert(1);
//! tree.insert(2);
//! tree.insert(3);
//!
//! // Three ascending keys force a rotation, and the root is always black.
//! let root = tree.root().unwrap();
//! assert_eq!(*root.key(), 2);
//! assert_eq!(root.color(), Color::Black);
//! assert_eq!(root.left().map(|n| n.color()), Some(Color::Red));
//!
//! assert_eq!(tree.remove(&2), Some(2));
//! assert!(tree.check().is_ok());
//! ```

use std::fmt;

use tracing::{debug, trace};

use crate::arena::NodeId;
use crate::invariants::{self, Violation};
use crate::node::{Metadata, NodeRef};
use crate::raw::{Iter, Locate, RawTree};
use crate::search_tree::SearchTree;
use crate::util::Side;

/// The color of a red-black node. An absent child counts as black.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    /// Freshly inserted nodes are red.
    Red,
    /// The root is always black.
    Black,
}

impl Metadata for Color {
    fn leaf() -> Self {
        Self::Red
    }

    fn recompute(self, _left: Option<Self>, _right: Option<Self>) -> Self {
        self
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => f.write_str(" (red)"),
            Self::Black => f.write_str(" (black)"),
        }
    }
}

impl<K> NodeRef<'_, K, Color> {
    /// The color of this node.
    pub fn color(&self) -> Color {
        self.meta()
    }
}

/// A self-balancing binary search tree using red-black coloring.
pub struct RbTree<K> {
    raw: RawTree<K, Color>,
}

impl<K> Default for RbTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone> Clone for RbTree<K> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for RbTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RbTree").field("root", &self.root()).finish()
    }
}

/// Draws the tree with [`RbTree::render`].
impl<K: fmt::Debug> fmt::Display for RbTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl<K> RbTree<K> {
    /// Generates a new, empty `RbTree`.
    pub fn new() -> Self {
        Self {
            raw: RawTree::new(),
        }
    }

    /// The root node, or `None` when the tree is empty.
    pub fn root(&self) -> Option<NodeRef<'_, K, Color>> {
        self.raw.root().map(|id| self.raw.node_ref(id))
    }

    /// The node with the smallest key.
    pub fn minimum(&self) -> Option<NodeRef<'_, K, Color>> {
        self.raw
            .root()
            .map(|root| self.raw.node_ref(self.raw.minimum(root)))
    }

    /// The node with the largest key.
    pub fn maximum(&self) -> Option<NodeRef<'_, K, Color>> {
        self.raw
            .root()
            .map(|root| self.raw.node_ref(self.raw.maximum(root)))
    }

    /// Whether the tree has no keys.
    pub fn is_empty(&self) -> bool {
        self.raw.root().is_none()
    }

    /// Counts the keys by walking the tree.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Iterates over the keys in ascending order.
    pub fn iter(&self) -> Iter<'_, K, Color> {
        self.raw.iter()
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// An indented drawing of the tree with each node's color, for debugging. Not a stable format.
    pub fn render(&self) -> String
    where
        K: fmt::Debug,
    {
        self.raw.render()
    }

    /// The color of a possibly absent node. Absent nodes are black.
    fn color(&self, id: Option<NodeId>) -> Color {
        id.map_or(Color::Black, |id| self.raw.meta(id))
    }

    fn is_red(&self, id: Option<NodeId>) -> bool {
        self.color(id) == Color::Red
    }

    fn paint(&mut self, id: NodeId, color: Color) {
        self.raw.set_meta(id, color);
    }
}

impl<K: Ord> RbTree<K> {
    /// Potentially finds the node holding the given key. If no node has it, `None` is returned.
    pub fn search(&self, key: &K) -> Option<NodeRef<'_, K, Color>> {
        self.raw.search(key).map(|id| self.raw.node_ref(id))
    }

    /// Whether some node holds `key`.
    pub fn contains(&self, key: &K) -> bool {
        self.raw.search(key).is_some()
    }

    /// The node with the next larger key after `key`. `None` when `key` is the largest key or
    /// isn't in the tree.
    pub fn successor(&self, key: &K) -> Option<NodeRef<'_, K, Color>> {
        let id = self.raw.search(key)?;
        self.raw.successor(id).map(|id| self.raw.node_ref(id))
    }

    /// The node with the next smaller key before `key`. `None` when `key` is the smallest key or
    /// isn't in the tree.
    pub fn predecessor(&self, key: &K) -> Option<NodeRef<'_, K, Color>> {
        let id = self.raw.search(key)?;
        self.raw.predecessor(id).map(|id| self.raw.node_ref(id))
    }

    /// Inserts `key` as a red node and repairs any red-red edge on the way up. Returns `false`,
    /// leaving the tree untouched, if the key was already present.
    pub fn insert(&mut self, key: K) -> bool {
        let slot = match self.raw.locate(&key) {
            Locate::Found(_) => {
                debug!("ignoring duplicate key");
                return false;
            }
            Locate::Vacant(slot) => slot,
        };
        let id = self.raw.attach(key, slot);
        self.fix_insert(id);
        true
    }

    /// Removes the node holding `key` and returns the key. If the tree does not contain the key,
    /// nothing happens.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::rbtree::RbTree;
    ///
    /// let mut tree: RbTree<_> = (1..=10).collect();
    ///
    /// assert_eq!(tree.remove(&4), Some(4));
    /// assert_eq!(tree.remove(&4), None);
    /// assert!(tree.check().is_ok());
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<K> {
        let Some(mut id) = self.raw.search(key) else {
            debug!("removing absent key");
            return None;
        };

        // A node with two children trades keys with its successor, which has no left child, and
        // the successor's node is removed instead.
        if let (Some(_), Some(right)) = (self.raw.left(id), self.raw.right(id)) {
            let successor = self.raw.minimum(right);
            self.raw.swap_keys(id, successor);
            id = successor;
        }

        let child = self.raw.left(id).or(self.raw.right(id));
        let parent = self.raw.parent(id);
        let removed_color = self.raw.meta(id);

        self.raw.transplant(id, child);
        let key = self.raw.release(id);

        // Removing a red node can't change any black-height.
        if removed_color == Color::Black {
            self.fix_remove(child, parent);
        }
        Some(key)
    }

    /// Checks key order, parent links and the red-black coloring rules.
    pub fn check(&self) -> Result<(), Violation<K>>
    where
        K: Clone + fmt::Debug,
    {
        invariants::check_structure(&self.raw)?;
        invariants::check_colors(&self.raw)
    }
}

impl<K> RbTree<K> {
    /// Restores the coloring after `node` was inserted red. Each pass either finishes or moves
    /// the red-red conflict two levels up.
    fn fix_insert(&mut self, mut node: NodeId) {
        while let Some(parent) = self.raw.parent(node).filter(|&p| self.is_red(Some(p))) {
            let grandparent = self
                .raw
                .parent(parent)
                .expect("a red node is never the root");
            let side = self
                .raw
                .side_of(parent)
                .expect("a node with a parent has a side");
            let uncle = self.raw.child(grandparent, side.flip());

            if let Some(uncle) = uncle.filter(|&u| self.is_red(Some(u))) {
                trace!(?node, "insert: red uncle, recolor");
                self.paint(parent, Color::Black);
                self.paint(uncle, Color::Black);
                self.paint(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            let mut parent = parent;
            if self.raw.side_of(node) != Some(side) {
                trace!(?node, "insert: inner grandchild, straighten");
                node = parent;
                self.raw.rotate(node, side);
                parent = self.raw.parent(node).expect("rotation put a parent above node");
            }

            trace!(?node, "insert: outer grandchild, rotate grandparent");
            self.paint(parent, Color::Black);
            self.paint(grandparent, Color::Red);
            self.raw.rotate(grandparent, side.flip());
        }

        if let Some(root) = self.raw.root() {
            self.paint(root, Color::Black);
        }
    }

    /// Repairs the missing black on the path through `node`, which sits under `parent` (both may
    /// be absent: `node` when the removed node had no children, `parent` when it was the root).
    fn fix_remove(&mut self, mut node: Option<NodeId>, mut parent: Option<NodeId>) {
        while node != self.raw.root() && !self.is_red(node) {
            let Some(p) = parent else {
                break;
            };
            // The sibling of a double-black position always exists because its subtree must hold
            // at least one black node. That makes an absent `node` unambiguous too.
            let side = if self.raw.left(p) == node {
                Side::Left
            } else {
                Side::Right
            };
            let mut sibling = self
                .raw
                .child(p, side.flip())
                .expect("a double-black node has a sibling");

            if self.is_red(Some(sibling)) {
                trace!(?p, "remove: red sibling");
                self.paint(sibling, Color::Black);
                self.paint(p, Color::Red);
                self.raw.rotate(p, side);
                sibling = self
                    .raw
                    .child(p, side.flip())
                    .expect("a red sibling's children are black nodes");
            }

            let near = self.raw.child(sibling, side);
            let far = self.raw.child(sibling, side.flip());

            if !self.is_red(near) && !self.is_red(far) {
                trace!(?p, "remove: black sibling with black children, move up");
                self.paint(sibling, Color::Red);
                node = Some(p);
                parent = self.raw.parent(p);
                continue;
            }

            if !self.is_red(far) {
                trace!(?p, "remove: red near nephew, rotate sibling");
                let near = near.expect("a red near nephew exists");
                self.paint(near, Color::Black);
                self.paint(sibling, Color::Red);
                self.raw.rotate(sibling, side.flip());
                sibling = near;
            }

            trace!(?p, "remove: red far nephew, rotate parent");
            let far = self
                .raw
                .child(sibling, side.flip())
                .expect("the far nephew is red here");
            self.paint(sibling, self.raw.meta(p));
            self.paint(p, Color::Black);
            self.paint(far, Color::Black);
            self.raw.rotate(p, side);
            node = self.raw.root();
            break;
        }

        if let Some(node) = node {
            self.paint(node, Color::Black);
        }
    }
}

impl<K: Ord> FromIterator<K> for RbTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord> Extend<K> for RbTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K> IntoIterator for &'a RbTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K, Color>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Ord> SearchTree<K> for RbTree<K> {
    type Meta = Color;

    fn insert(&mut self, key: K) -> bool {
        RbTree::insert(self, key)
    }

    fn search(&self, key: &K) -> Option<NodeRef<'_, K, Color>> {
        RbTree::search(self, key)
    }

    fn remove(&mut self, key: &K) -> Option<K> {
        RbTree::remove(self, key)
    }

    fn minimum(&self) -> Option<NodeRef<'_, K, Color>> {
        RbTree::minimum(self)
    }

    fn maximum(&self) -> Option<NodeRef<'_, K, Color>> {
        RbTree::maximum(self)
    }

    fn successor(&self, key: &K) -> Option<NodeRef<'_, K, Color>> {
        RbTree::successor(self, key)
    }

    fn root(&self) -> Option<NodeRef<'_, K, Color>> {
        RbTree::root(self)
    }

    fn check(&self) -> Result<(), Violation<K>>
    where
        K: Clone + fmt::Debug,
    {
        RbTree::check(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(tree: &RbTree<i32>) -> Vec<i32> {
        tree.iter().copied().collect()
    }

    fn color_of(tree: &RbTree<i32>, key: i32) -> Option<Color> {
        tree.search(&key).map(|n| n.color())
    }

    #[test]
    fn ascending_inserts_stay_valid() {
        let mut tree = RbTree::new();
        for key in 1..=64 {
            tree.insert(key);
            assert_eq!(tree.check(), Ok(()));
        }
        assert_eq!(keys(&tree), (1..=64).collect::<Vec<_>>());
    }

    #[test]
    fn descending_inserts_stay_valid() {
        let mut tree = RbTree::new();
        for key in (1..=64).rev() {
            tree.insert(key);
            assert_eq!(tree.check(), Ok(()));
        }
        assert_eq!(tree.len(), 64);
    }

    #[test]
    fn red_uncle_recolors() {
        let mut tree: RbTree<_> = [10, 5, 15].into_iter().collect();
        tree.insert(1);

        // 5 and 15 were red; inserting under 5 pushes the red up to 10, which the root rule
        // turns back black.
        assert_eq!(color_of(&tree, 10), Some(Color::Black));
        assert_eq!(color_of(&tree, 5), Some(Color::Black));
        assert_eq!(color_of(&tree, 15), Some(Color::Black));
        assert_eq!(color_of(&tree, 1), Some(Color::Red));
    }

    #[test]
    fn inner_grandchild_double_rotation() {
        let tree: RbTree<_> = [10, 5, 7].into_iter().collect();

        let root = tree.root().unwrap();
        assert_eq!(*root.key(), 7);
        assert_eq!(root.color(), Color::Black);
        assert_eq!(root.left().map(|n| *n.key()), Some(5));
        assert_eq!(root.right().map(|n| *n.key()), Some(10));
        assert_eq!(root.left().and_then(|n| n.parent()), Some(root));
        assert_eq!(root.right().and_then(|n| n.parent()), Some(root));
        assert_eq!(tree.check(), Ok(()));
    }

    #[test]
    fn duplicate_insert_is_ignored() {
        let mut tree: RbTree<_> = [2, 1, 3].into_iter().collect();
        let before = tree.render();

        assert!(!tree.insert(1));
        assert_eq!(tree.render(), before);
    }

    #[test]
    fn remove_red_leaf() {
        let mut tree: RbTree<_> = [10, 5, 15].into_iter().collect();

        assert_eq!(tree.remove(&5), Some(5));
        assert_eq!(keys(&tree), [10, 15]);
        assert_eq!(tree.check(), Ok(()));
    }

    #[test]
    fn remove_black_leaf_with_red_sibling() {
        // 20 ends up black with a red sibling 40 whose children are black.
        let mut tree: RbTree<_> = [20, 10, 30, 40, 50, 60].into_iter().collect();
        assert_eq!(tree.check(), Ok(()));

        for key in [10, 20, 30] {
            assert_eq!(tree.remove(&key), Some(key));
            assert_eq!(tree.check(), Ok(()));
        }
        assert_eq!(keys(&tree), [40, 50, 60]);
    }

    #[test]
    fn remove_node_with_two_children() {
        let mut tree: RbTree<_> = (1..=15).collect();
        let root = *tree.root().unwrap().key();

        assert_eq!(tree.remove(&root), Some(root));
        assert!(!tree.contains(&root));
        assert_eq!(tree.check(), Ok(()));
        assert_eq!(tree.len(), 14);
    }

    #[test]
    fn remove_everything() {
        let mut tree: RbTree<_> = (0..100).map(|x| (x * 37) % 101).collect();

        for x in 0..100 {
            let key = (x * 53) % 101;
            tree.remove(&key);
            assert_eq!(tree.check(), Ok(()));
        }
        assert!(tree.iter().all(|&key| (0..100).all(|x| (x * 53) % 101 != key)));
    }

    #[test]
    fn remove_absent_key_leaves_tree_alone() {
        let mut tree: RbTree<_> = (1..=5).collect();
        let before = tree.render();

        assert_eq!(tree.remove(&42), None);
        assert_eq!(tree.render(), before);
    }

    #[test]
    fn remove_root_only() {
        let mut tree = RbTree::new();
        tree.insert(1);

        assert_eq!(tree.remove(&1), Some(1));
        assert!(tree.is_empty());
        assert_eq!(tree.check(), Ok(()));
    }

    #[test]
    fn successor_of_maximum_is_none() {
        let tree: RbTree<_> = (1..=5).collect();

        assert_eq!(tree.successor(&5).map(|n| *n.key()), None);
        assert_eq!(tree.successor(&3).map(|n| *n.key()), Some(4));
        assert_eq!(tree.predecessor(&1).map(|n| *n.key()), None);
    }

    #[test]
    fn render_shows_colors() {
        let tree: RbTree<_> = [1, 2, 3].into_iter().collect();

        assert_eq!(
            tree.to_string(),
            "└── 2 (black)\n    ├── 1 (red)\n    └── 3 (red)\n"
        );
    }
}
