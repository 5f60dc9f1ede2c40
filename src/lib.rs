//! This crate exposes ordered key stores backed by self-balancing Binary Search Trees (BSTs):
//! an [AVL tree][avl::AvlTree] and a [red-black tree][rbtree::RbTree], plus an
//! [unbalanced tree][unbalanced::UnbalancedTree] to compare them against.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored keys. Each `Node` stores a key and has
//! at most two child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    key less than its own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    key greater than its own key.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching takes `O(height)`. Inserting sorted keys into a plain BST makes
//! its height `N`; the balanced trees here restructure themselves with
//! rotations so their height stays `O(lg N)` whatever the input order.
//!
//! ## Parent links
//!
//! Every node also knows its parent, so successors can be found and
//! rebalancing can walk back up towards the root without recursion. Nodes live
//! in an arena and refer to each other by [`NodeId`] handles, which keeps the
//! parent link a plain value rather than a second owner. Every operation keeps
//! these links consistent, and each tree's `check` method proves it.
//!
//! # Examples
//!
//! ```
//! use ordtree::{avl::AvlTree, rbtree::RbTree, SearchTree};
//!
//! let mut avl: AvlTree<_> = (1..=100).collect();
//! let mut rb: RbTree<_> = (1..=100).collect();
//!
//! assert_eq!(avl.height(), 7);
//! assert_eq!(avl.successor(&42).map(|n| *n.key()), Some(43));
//!
//! for key in (1..=100).step_by(3) {
//!     avl.remove(&key);
//!     rb.remove(&key);
//! }
//! assert!(avl.iter().eq(rb.iter()));
//! assert!(avl.check().is_ok() && rb.check().is_ok());
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

mod arena;
pub mod avl;
pub mod invariants;
mod node;
mod raw;
pub mod rbtree;
mod search_tree;
pub mod sort;
pub mod unbalanced;
mod util;


pub use arena::NodeId;
pub use node::{Metadata, NodeRef};
pub use raw::Iter;
pub use search_tree::SearchTree;
