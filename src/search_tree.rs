use std::fmt;

use crate::invariants::Violation;
use crate::node::{Metadata, NodeRef};

/// The operations every tree in this crate supports. Each engine implements them on its own;
/// nothing about rebalancing is shared through this trait.
///
/// Useful for code that wants to run the same workload against several engines:
///
/// ```
/// use ordtree::{avl::AvlTree, rbtree::RbTree, SearchTree};
///
/// fn load<T: SearchTree<i32> + Default>(keys: &[i32]) -> T {
///     let mut tree = T::default();
///     for &key in keys {
///         tree.insert(key);
///     }
///     tree
/// }
///
/// let avl: AvlTree<i32> = load(&[3, 1, 2]);
/// let rb: RbTree<i32> = load(&[3, 1, 2]);
///
/// assert_eq!(avl.root().map(|n| *n.key()), Some(2));
/// assert_eq!(rb.root().map(|n| *n.key()), Some(2));
/// ```
pub trait SearchTree<K: Ord> {
    /// The balancing data each node carries.
    type Meta: Metadata;

    /// Inserts `key`. Returns `false` and changes nothing if it was already present.
    fn insert(&mut self, key: K) -> bool;

    /// The node holding `key`, if any.
    fn search(&self, key: &K) -> Option<NodeRef<'_, K, Self::Meta>>;

    /// Removes `key`, returning it. Returns `None` and changes nothing if it was absent.
    fn remove(&mut self, key: &K) -> Option<K>;

    /// The node with the smallest key. `None` only when the tree is empty.
    fn minimum(&self) -> Option<NodeRef<'_, K, Self::Meta>>;

    /// The node with the largest key. `None` only when the tree is empty.
    fn maximum(&self) -> Option<NodeRef<'_, K, Self::Meta>>;

    /// The in-order successor of the node holding `key`. `None` when `key` is the largest key or
    /// isn't present.
    fn successor(&self, key: &K) -> Option<NodeRef<'_, K, Self::Meta>>;

    /// The root node. `None` only when the tree is empty.
    fn root(&self) -> Option<NodeRef<'_, K, Self::Meta>>;

    /// Whether some node holds `key`.
    fn contains(&self, key: &K) -> bool {
        self.search(key).is_some()
    }

    /// Verifies every invariant the engine promises, reporting the first one broken.
    fn check(&self) -> Result<(), Violation<K>>
    where
        K: Clone + fmt::Debug;
}
