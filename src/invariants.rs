//! Structural checks for trees. Engines keep these properties by construction; the checks exist so
//! tests (and the CLI) can prove it after every operation instead of trusting it.
//!
//! Every tree is checked for key order and parent links. AVL trees are additionally checked for
//! cached heights and balance factors, red-black trees for the coloring rules.

use std::fmt;

use thiserror::Error;

use crate::arena::NodeId;
use crate::avl::Height;
use crate::rbtree::Color;
use crate::raw::RawTree;
use crate::util::Side;

/// A broken tree invariant, naming the keys of the nodes involved.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Violation<K: fmt::Debug> {
    /// In-order traversal produced `next` right after `prev` but `next` isn't larger.
    #[error("key {next:?} follows {prev:?} in order but is not greater")]
    OutOfOrder {
        /// The earlier key.
        prev: K,
        /// The key that should have been larger.
        next: K,
    },
    /// The root records a parent.
    #[error("root {root:?} has a parent link")]
    RootHasParent {
        /// The root's key.
        root: K,
    },
    /// A child's parent link doesn't point at the node that owns it.
    #[error("child {child:?} of {node:?} does not link back to it")]
    WrongParent {
        /// The owning node.
        node: K,
        /// The child with the wrong back-link.
        child: K,
    },
    /// A cached AVL height doesn't match the subtree.
    #[error("node {node:?} caches height {cached} but its subtree is {actual} tall")]
    StaleHeight {
        /// The node with the stale height.
        node: K,
        /// The height stored on the node.
        cached: usize,
        /// The height of its subtree.
        actual: usize,
    },
    /// An AVL node's subtrees differ in height by more than one.
    #[error("node {node:?} has balance factor {factor}")]
    Unbalanced {
        /// The unbalanced node.
        node: K,
        /// Left height minus right height.
        factor: isize,
    },
    /// A red-black tree's root is red.
    #[error("root {root:?} is red")]
    RedRoot {
        /// The root's key.
        root: K,
    },
    /// A red node has a red child.
    #[error("red node {parent:?} has a red child {child:?}")]
    RedRed {
        /// The red parent.
        parent: K,
        /// The red child.
        child: K,
    },
    /// The two subtrees of a red-black node have different black-heights.
    #[error("node {node:?} has black-height {left} on the left but {right} on the right")]
    BlackHeight {
        /// The node whose subtrees disagree.
        node: K,
        /// Black-height of the left subtree.
        left: usize,
        /// Black-height of the right subtree.
        right: usize,
    },
}

/// Checks the root's parent link, every child's back-link, and that the keys are strictly
/// increasing in order.
pub(crate) fn check_structure<K, M>(tree: &RawTree<K, M>) -> Result<(), Violation<K>>
where
    K: Ord + Clone + fmt::Debug,
{
    let Some(root) = tree.root() else {
        return Ok(());
    };
    if tree.parent(root).is_some() {
        return Err(Violation::RootHasParent {
            root: tree.key(root).clone(),
        });
    }

    // Links are checked before iterating because the iterator follows parent links.
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        for side in [Side::Left, Side::Right] {
            if let Some(child) = tree.child(id, side) {
                if tree.parent(child) != Some(id) {
                    return Err(Violation::WrongParent {
                        node: tree.key(id).clone(),
                        child: tree.key(child).clone(),
                    });
                }
                stack.push(child);
            }
        }
    }

    let mut keys = tree.iter();
    if let Some(mut prev) = keys.next() {
        for next in keys {
            if next <= prev {
                return Err(Violation::OutOfOrder {
                    prev: prev.clone(),
                    next: next.clone(),
                });
            }
            prev = next;
        }
    }
    Ok(())
}

/// Checks every cached height against the real subtree height and every balance factor.
pub(crate) fn check_heights<K>(tree: &RawTree<K, Height>) -> Result<(), Violation<K>>
where
    K: Clone + fmt::Debug,
{
    fn subtree_height<K>(
        tree: &RawTree<K, Height>,
        id: Option<NodeId>,
    ) -> Result<usize, Violation<K>>
    where
        K: Clone + fmt::Debug,
    {
        let Some(id) = id else {
            return Ok(0);
        };
        let left = subtree_height(tree, tree.left(id))?;
        let right = subtree_height(tree, tree.right(id))?;
        let actual = left.max(right) + 1;

        let cached = tree.meta(id).get();
        if cached != actual {
            return Err(Violation::StaleHeight {
                node: tree.key(id).clone(),
                cached,
                actual,
            });
        }
        let factor = left as isize - right as isize;
        if factor.abs() > 1 {
            return Err(Violation::Unbalanced {
                node: tree.key(id).clone(),
                factor,
            });
        }
        Ok(actual)
    }

    subtree_height(tree, tree.root()).map(|_| ())
}

/// Checks that the root is black, no red node has a red child, and black-heights agree.
pub(crate) fn check_colors<K>(tree: &RawTree<K, Color>) -> Result<(), Violation<K>>
where
    K: Clone + fmt::Debug,
{
    fn black_height<K>(
        tree: &RawTree<K, Color>,
        id: Option<NodeId>,
    ) -> Result<usize, Violation<K>>
    where
        K: Clone + fmt::Debug,
    {
        let Some(id) = id else {
            return Ok(0);
        };
        let color = tree.meta(id);
        for child in [tree.left(id), tree.right(id)].into_iter().flatten() {
            if color == Color::Red && tree.meta(child) == Color::Red {
                return Err(Violation::RedRed {
                    parent: tree.key(id).clone(),
                    child: tree.key(child).clone(),
                });
            }
        }

        let left = black_height(tree, tree.left(id))?;
        let right = black_height(tree, tree.right(id))?;
        if left != right {
            return Err(Violation::BlackHeight {
                node: tree.key(id).clone(),
                left,
                right,
            });
        }

        // Black-height excludes the node itself, so this node counts towards its parent's.
        Ok(left + usize::from(color == Color::Black))
    }

    if let Some(root) = tree.root() {
        if tree.meta(root) == Color::Red {
            return Err(Violation::RedRoot {
                root: tree.key(root).clone(),
            });
        }
    }
    black_height(tree, tree.root()).map(|_| ())
}
