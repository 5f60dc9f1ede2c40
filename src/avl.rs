//! A height-balanced (AVL) search tree. Every node caches the height of its subtree and no node's
//! subtrees differ in height by more than one, so the tree is at most ~1.44 lg N tall.
//!
//! # Examples
//!
//! ```
//! use ordtree::avl::AvlTree;
//!
//! let mut tree = AvlTree::new();
//!
//! // Nothing in here yet.
//! assert!(tree.search(&1).is_none());
//!
//! // Ascending inserts would make a plain BST a linked list. Here the root moves instead.
//! tree.insert(10);
//! tree.insert(20);
//! tree.insert(30);
//! assert_eq!(tree.root().map(|n| *n.key()), Some(20));
//!
//! // Inserting a key twice does nothing.
//! assert!(!tree.insert(20));
//!
//! // Removing a key hands it back.
//! assert_eq!(tree.remove(&20), Some(20));
//! assert!(tree.search(&20).is_none());
//! ```

use std::fmt;

use tracing::{debug, trace};

use crate::arena::NodeId;
use crate::invariants::{self, Violation};
use crate::node::{Metadata, NodeRef};
use crate::raw::{Iter, Locate, RawTree};
use crate::search_tree::SearchTree;

/// How many levels are in the subtree rooted at a node. A node with no children has a height of
/// 1; an absent subtree counts as 0.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Height(usize);

impl Height {
    /// The height as a number.
    pub fn get(self) -> usize {
        self.0
    }
}

impl Metadata for Height {
    fn leaf() -> Self {
        Self(1)
    }

    fn recompute(self, left: Option<Self>, right: Option<Self>) -> Self {
        let left = left.map_or(0, Self::get);
        let right = right.map_or(0, Self::get);
        Self(left.max(right) + 1)
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " (h={})", self.0)
    }
}

impl<K> NodeRef<'_, K, Height> {
    /// The height of the subtree rooted at this node.
    pub fn height(&self) -> usize {
        self.meta().get()
    }

    /// The height of the left subtree minus the height of the right subtree. Always in `-1..=1`
    /// for a node of a well-formed AVL tree.
    pub fn balance_factor(&self) -> isize {
        let left = self.left().map_or(0, |n| n.height());
        let right = self.right().map_or(0, |n| n.height());
        left as isize - right as isize
    }
}

/// A self-balancing binary search tree using the AVL height rule.
pub struct AvlTree<K> {
    raw: RawTree<K, Height>,
}

impl<K> Default for AvlTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone> Clone for AvlTree<K> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for AvlTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvlTree").field("root", &self.root()).finish()
    }
}

/// Draws the tree with [`AvlTree::render`].
impl<K: fmt::Debug> fmt::Display for AvlTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl<K> AvlTree<K> {
    /// Generates a new, empty `AvlTree`.
    pub fn new() -> Self {
        Self {
            raw: RawTree::new(),
        }
    }

    /// The root node, or `None` when the tree is empty.
    pub fn root(&self) -> Option<NodeRef<'_, K, Height>> {
        self.raw.root().map(|id| self.raw.node_ref(id))
    }

    /// The node with the smallest key.
    pub fn minimum(&self) -> Option<NodeRef<'_, K, Height>> {
        self.raw
            .root()
            .map(|root| self.raw.node_ref(self.raw.minimum(root)))
    }

    /// The node with the largest key.
    pub fn maximum(&self) -> Option<NodeRef<'_, K, Height>> {
        self.raw
            .root()
            .map(|root| self.raw.node_ref(self.raw.maximum(root)))
    }

    /// The height of the whole tree; 0 when empty.
    pub fn height(&self) -> usize {
        self.root().map_or(0, |root| root.height())
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
    pub fn iter(&self) -> Iter<'_, K, Height> {
        self.raw.iter()
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// An indented drawing of the tree with each node's height, for debugging. Not a stable
    /// format.
    pub fn render(&self) -> String
    where
        K: fmt::Debug,
    {
        self.raw.render()
    }
}

impl<K: Ord> AvlTree<K> {
    /// Potentially finds the node holding the given key. If no node has it, `None` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::avl::AvlTree;
    ///
    /// let tree: AvlTree<_> = [2, 1, 3].into_iter().collect();
    ///
    /// assert_eq!(tree.search(&1).map(|n| n.height()), Some(1));
    /// assert!(tree.search(&42).is_none());
    /// ```
    pub fn search(&self, key: &K) -> Option<NodeRef<'_, K, Height>> {
        self.raw.search(key).map(|id| self.raw.node_ref(id))
    }

    /// Whether some node holds `key`.
    pub fn contains(&self, key: &K) -> bool {
        self.raw.search(key).is_some()
    }

    /// The node with the next larger key after `key`. `None` when `key` is the largest key or
    /// isn't in the tree.
    pub fn successor(&self, key: &K) -> Option<NodeRef<'_, K, Height>> {
        let id = self.raw.search(key)?;
        self.raw.successor(id).map(|id| self.raw.node_ref(id))
    }

    /// The node with the next smaller key before `key`. `None` when `key` is the smallest key or
    /// isn't in the tree.
    pub fn predecessor(&self, key: &K) -> Option<NodeRef<'_, K, Height>> {
        let id = self.raw.search(key)?;
        self.raw.predecessor(id).map(|id| self.raw.node_ref(id))
    }

    /// Inserts `key` and rebalances every ancestor of the new node. Returns `false`, leaving the
    /// tree untouched, if the key was already present.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::avl::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    ///
    /// assert!(tree.insert(1));
    /// assert!(!tree.insert(1));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K) -> bool {
        let slot = match self.raw.locate(&key) {
            Locate::Found(_) => {
                debug!("ignoring duplicate key");
                return false;
            }
            Locate::Vacant(slot) => slot,
        };
        let id = self.raw.attach(key, slot);
        self.retrace(self.raw.parent(id));
        true
    }

    /// Removes the node holding `key` and returns the key. If the tree does not contain the key,
    /// nothing happens.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::avl::AvlTree;
    ///
    /// let mut tree: AvlTree<_> = (1..=7).collect();
    ///
    /// assert_eq!(tree.remove(&4), Some(4));
    /// assert_eq!(tree.remove(&4), None);
    /// assert!(tree.check().is_ok());
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<K> {
        let Some(id) = self.raw.search(key) else {
            debug!("removing absent key");
            return None;
        };
        let (key, lowest_changed) = self.raw.remove_node(id);
        self.retrace(lowest_changed);
        Some(key)
    }

    /// Checks key order, parent links, cached heights and balance factors.
    pub fn check(&self) -> Result<(), Violation<K>>
    where
        K: Clone + fmt::Debug,
    {
        invariants::check_structure(&self.raw)?;
        invariants::check_heights(&self.raw)
    }
}

impl<K> AvlTree<K> {
    /// Walks from `start` to the root, refreshing heights and rebalancing each node on the way.
    /// Insertion needs at most one rotation along the path but deletion may need one per level,
    /// so the walk never stops early.
    fn retrace(&mut self, start: Option<NodeId>) {
        let mut current = start;
        while let Some(id) = current {
            let subtree = self.rebalance(id);
            current = self.raw.parent(subtree);
        }
    }

    /// Left height minus right height of `id`.
    fn balance_factor(&self, id: NodeId) -> isize {
        let height = |child: Option<NodeId>| child.map_or(0, |c| self.raw.meta(c).get());
        height(self.raw.left(id)) as isize - height(self.raw.right(id)) as isize
    }

    /// Restores the AVL rule at `id`, assuming it already holds for both children, and returns
    /// the root of the rebalanced subtree.
    ///
    /// See <https://en.wikipedia.org/wiki/AVL_tree#Rebalancing> for the case names.
    fn rebalance(&mut self, id: NodeId) -> NodeId {
        self.raw.refresh(id);
        let factor = self.balance_factor(id);

        let subtree = if factor > 1 {
            let left = self.raw.left(id).expect("left-heavy node has a left child");
            if self.balance_factor(left) < 0 {
                trace!(?id, "left-right case");
                self.raw.rotate_left(left);
            } else {
                trace!(?id, "left-left case");
            }
            self.raw.rotate_right(id)
        } else if factor < -1 {
            let right = self.raw.right(id).expect("right-heavy node has a right child");
            if self.balance_factor(right) > 0 {
                trace!(?id, "right-left case");
                self.raw.rotate_right(right);
            } else {
                trace!(?id, "right-right case");
            }
            self.raw.rotate_left(id)
        } else {
            id
        };

        if cfg!(debug_assertions) {
            let factor = self.balance_factor(subtree);
            assert!(factor.abs() <= 1, "{subtree:?} still has balance factor {factor}");
        }
        subtree
    }
}

impl<K: Ord> FromIterator<K> for AvlTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord> Extend<K> for AvlTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K> IntoIterator for &'a AvlTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K, Height>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Ord> SearchTree<K> for AvlTree<K> {
    type Meta = Height;

    fn insert(&mut self, key: K) -> bool {
        AvlTree::insert(self, key)
    }

    fn search(&self, key: &K) -> Option<NodeRef<'_, K, Height>> {
        AvlTree::search(self, key)
    }

    fn remove(&mut self, key: &K) -> Option<K> {
        AvlTree::remove(self, key)
    }

    fn minimum(&self) -> Option<NodeRef<'_, K, Height>> {
        AvlTree::minimum(self)
    }

    fn maximum(&self) -> Option<NodeRef<'_, K, Height>> {
        AvlTree::maximum(self)
    }

    fn successor(&self, key: &K) -> Option<NodeRef<'_, K, Height>> {
        AvlTree::successor(self, key)
    }

    fn root(&self) -> Option<NodeRef<'_, K, Height>> {
        AvlTree::root(self)
    }

    fn check(&self) -> Result<(), Violation<K>>
    where
        K: Clone + fmt::Debug,
    {
        AvlTree::check(self)
    }
}
