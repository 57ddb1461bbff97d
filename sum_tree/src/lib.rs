//! Persistent summarized B+ tree with dimensioned cursors.
//!
//! A [`SumTree`] is an ordered sequence of items balanced as a B+ tree.
//! Every node caches the monoidal [`Summary`] of its subtree, so positional
//! queries, prefix sums, and [`Dimension`]-directed seeks all run in
//! logarithmic time. Structural edits (insert, delete, split, concat) copy
//! only the touched root-to-leaf path and share every other node with the
//! input, which makes cloned trees cheap snapshots.
//!
//! An optional [`Extension`] maintains a second, user-defined aggregate
//! alongside the base summary at every node.

mod cursor;
mod dimension;
mod error;
mod extension;
mod summary;
mod tree;

pub use cursor::{Cursor, Items, Seek};
pub use dimension::Dimension;
pub use error::TreeError;
pub use extension::{ExtValue, Extension};
pub use summary::{Item, Summary};
pub use tree::{SumTree, TreeConfig, MAX_NODE_WIDTH};
