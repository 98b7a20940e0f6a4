//! Derived, mutable structures built from a [`TreeSequence`] store: the
//! sparse-tree iterator and the store itself.

mod tree;
mod treeseq;

pub use tree::Tree;
pub use treeseq::TreeSequence;
