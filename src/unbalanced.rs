//! A plain binary search tree with no balancing at all. It shares every primitive with the
//! balanced engines, which makes it the baseline they are measured against: sorted input turns it
//! into a linked list.
//!
//! # Examples
//!
//! ```
//! use ordtree::unbalanced::UnbalancedTree;
//!
//! let tree: UnbalancedTree<_> = (1..=4).collect();
//!
//! // Every key went right.
//! let depth = std::iter::successors(tree.root(), |n| n.right()).count();
//! assert_eq!(depth, 4);
//! ```

use std::fmt;

use tracing::debug;

use crate::invariants::{self, Violation};
use crate::node::{Metadata, NodeRef};
use crate::raw::{Iter, Locate, RawTree};
use crate::search_tree::SearchTree;

/// Metadata for nodes that don't need any.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Bare;

impl Metadata for Bare {
    fn leaf() -> Self {
        Self
    }

    fn recompute(self, _left: Option<Self>, _right: Option<Self>) -> Self {
        self
    }
}

impl fmt::Display for Bare {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}

/// A binary search tree that never rebalances.
pub struct UnbalancedTree<K> {
    raw: RawTree<K, Bare>,
}

impl<K> Default for UnbalancedTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone> Clone for UnbalancedTree<K> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for UnbalancedTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Draws the tree with [`UnbalancedTree::render`].
impl<K: fmt::Debug> fmt::Display for UnbalancedTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl<K> UnbalancedTree<K> {
    /// Generates a new, empty `UnbalancedTree`.
    pub fn new() -> Self {
        Self {
            raw: RawTree::new(),
        }
    }

    /// The root node, or `None` when the tree is empty.
    pub fn root(&self) -> Option<NodeRef<'_, K, Bare>> {
        self.raw.root().map(|id| self.raw.node_ref(id))
    }

    /// The node with the smallest key.
    pub fn minimum(&self) -> Option<NodeRef<'_, K, Bare>> {
        self.raw
            .root()
            .map(|root| self.raw.node_ref(self.raw.minimum(root)))
    }

    /// The node with the largest key.
    pub fn maximum(&self) -> Option<NodeRef<'_, K, Bare>> {
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
    pub fn iter(&self) -> Iter<'_, K, Bare> {
        self.raw.iter()
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// An indented drawing of the tree, for debugging. Not a stable format.
    pub fn render(&self) -> String
    where
        K: fmt::Debug,
    {
        self.raw.render()
    }
}

impl<K: Ord> UnbalancedTree<K> {
    /// Potentially finds the node holding the given key.
    pub fn search(&self, key: &K) -> Option<NodeRef<'_, K, Bare>> {
        self.raw.search(key).map(|id| self.raw.node_ref(id))
    }

    /// Whether some node holds `key`.
    pub fn contains(&self, key: &K) -> bool {
        self.raw.search(key).is_some()
    }

    /// The node with the next larger key after `key`.
    pub fn successor(&self, key: &K) -> Option<NodeRef<'_, K, Bare>> {
        let id = self.raw.search(key)?;
        self.raw.successor(id).map(|id| self.raw.node_ref(id))
    }

    /// The node with the next smaller key before `key`.
    pub fn predecessor(&self, key: &K) -> Option<NodeRef<'_, K, Bare>> {
        let id = self.raw.search(key)?;
        self.raw.predecessor(id).map(|id| self.raw.node_ref(id))
    }

    /// Inserts `key` where the search for it ends. Duplicates are ignored like in the balanced
    /// trees, returning `false`.
    pub fn insert(&mut self, key: K) -> bool {
        match self.raw.locate(&key) {
            Locate::Found(_) => {
                debug!("ignoring duplicate key");
                false
            }
            Locate::Vacant(slot) => {
                self.raw.attach(key, slot);
                true
            }
        }
    }

    /// Removes the node holding `key` and returns the key.
    pub fn remove(&mut self, key: &K) -> Option<K> {
        let Some(id) = self.raw.search(key) else {
            debug!("removing absent key");
            return None;
        };
        let (key, _) = self.raw.remove_node(id);
        Some(key)
    }

    /// Checks key order and parent links.
    pub fn check(&self) -> Result<(), Violation<K>>
    where
        K: Clone + fmt::Debug,
    {
        invariants::check_structure(&self.raw)
    }
}

impl<K: Ord> FromIterator<K> for UnbalancedTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord> Extend<K> for UnbalancedTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K> IntoIterator for &'a UnbalancedTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K, Bare>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Ord> SearchTree<K> for UnbalancedTree<K> {
    type Meta = Bare;

    fn insert(&mut self, key: K) -> bool {
        UnbalancedTree::insert(self, key)
    }

    fn search(&self, key: &K) -> Option<NodeRef<'_, K, Bare>> {
        UnbalancedTree::search(self, key)
    }

    fn remove(&mut self, key: &K) -> Option<K> {
        UnbalancedTree::remove(self, key)
    }

    fn minimum(&self) -> Option<NodeRef<'_, K, Bare>> {
        UnbalancedTree::minimum(self)
    }

    fn maximum(&self) -> Option<NodeRef<'_, K, Bare>> {
        UnbalancedTree::maximum(self)
    }

    fn successor(&self, key: &K) -> Option<NodeRef<'_, K, Bare>> {
        UnbalancedTree::successor(self, key)
    }

    fn root(&self) -> Option<NodeRef<'_, K, Bare>> {
        UnbalancedTree::root(self)
    }

    fn check(&self) -> Result<(), Violation<K>>
    where
        K: Clone + fmt::Debug,
    {
        UnbalancedTree::check(self)
    }
}
