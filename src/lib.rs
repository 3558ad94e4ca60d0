//! An ordered map implemented with an AVL tree.
//!
//! Nodes are linked to their children and to their parent. Insertion and removal
//! walk back up from the changed position to the root, refreshing heights and
//! balance factors and rotating wherever a subtree has become two levels
//! out of balance. The parent links also give cheap in-order successor and
//! predecessor steps, which drive ordered iteration in both directions.
//!
//! The crate also carries a plain, unbalanced [`BinaryTree`] and a seedable
//! [`KeyGenerator`] used by the `avl-demo` binary.
//!
//! Tracing output goes through the [`log`] facade at `trace` level.

mod bst;
mod error;
pub mod map;
mod random;

pub use bst::BinaryTree;
pub use error::Error;
pub use map::{AvlTreeMap, Iter, NodeRef, Order};
pub use random::KeyGenerator;
