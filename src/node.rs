//! Read-only views of tree nodes and the per-strategy metadata they carry.

use std::fmt;
use std::ptr;

use crate::arena::NodeId;
use crate::raw::RawTree;

/// Balancing data cached on every node. Each engine picks one: [`Height`][crate::avl::Height]
/// for AVL trees, [`Color`][crate::rbtree::Color] for red-black trees and
/// [`Bare`][crate::unbalanced::Bare] for the plain tree.
///
/// The rotation primitive calls [`Metadata::recompute`] on exactly the two nodes whose subtrees
/// changed, lower node first, so an engine never has to remember to do it after rotating.
pub trait Metadata: Copy + fmt::Debug + fmt::Display {
    /// The value a freshly inserted node starts with.
    fn leaf() -> Self;

    /// The value for a node whose children now carry `left` and `right` (`None` for an absent
    /// child). Metadata that doesn't depend on the children returns `self`.
    fn recompute(self, left: Option<Self>, right: Option<Self>) -> Self;
}

/// A borrowed view of one node of a tree. Following [`left`][NodeRef::left],
/// [`right`][NodeRef::right] and [`parent`][NodeRef::parent] walks the tree in any direction.
pub struct NodeRef<'a, K, M> {
    tree: &'a RawTree<K, M>,
    id: NodeId,
}

impl<K, M> Clone for NodeRef<'_, K, M> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<K, M> Copy for NodeRef<'_, K, M> {}

/// Two views are equal when they are the same node of the same tree, not when their keys match.
impl<K, M> PartialEq for NodeRef<'_, K, M> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}
impl<K, M> Eq for NodeRef<'_, K, M> {}

impl<'a, K, M> NodeRef<'a, K, M> {
    pub(crate) fn new(tree: &'a RawTree<K, M>, id: NodeId) -> Self {
        Self { tree, id }
    }

    /// The handle of this node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The key stored in this node.
    pub fn key(&self) -> &'a K {
        self.tree.key(self.id)
    }

    /// The root of this node's left subtree.
    pub fn left(&self) -> Option<Self> {
        self.tree.left(self.id).map(|id| Self::new(self.tree, id))
    }

    /// The root of this node's right subtree.
    pub fn right(&self) -> Option<Self> {
        self.tree.right(self.id).map(|id| Self::new(self.tree, id))
    }

    /// The node this one hangs from. `None` only for the root.
    pub fn parent(&self) -> Option<Self> {
        self.tree.parent(self.id).map(|id| Self::new(self.tree, id))
    }

    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.tree.left(self.id).is_none() && self.tree.right(self.id).is_none()
    }

    pub(crate) fn meta(&self) -> M
    where
        M: Copy,
    {
        self.tree.meta(self.id)
    }
}

impl<K, M> fmt::Debug for NodeRef<'_, K, M>
where
    K: fmt::Debug,
    M: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", self.key())
            .field("meta", self.tree.meta_ref(self.id))
            .field("left", &self.left())
            .field("right", &self.right())
            .finish()
    }
}
