//! Dimension-directed seek and in-order iteration.

use crate::{
    tree::{locate_owner, Node},
    Dimension, Item, SumTree, TreeError,
};
use std::marker::PhantomData;

/// The result of a seek: the index of the first item whose inclusive
/// accumulated projection reaches the target, and the accumulated position
/// after that item. Past-the-end targets yield the item count and the
/// tree's total projection.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Seek<D> {
    pub index: usize,
    pub position: D,
}

/// A one-shot forward seek over a tree snapshot, directed by a dimension.
///
/// Cursors are read-only and retain no state between calls; seeking the
/// same target against an unchanged tree returns the same result.
pub struct Cursor<'a, T: Item, D: Dimension> {
    tree: &'a SumTree<T>,
    _dimension: PhantomData<D>,
}

impl<'a, T: Item, D: Dimension> Cursor<'a, T, D> {
    pub fn new(tree: &'a SumTree<T>) -> Self {
        Self {
            tree,
            _dimension: PhantomData,
        }
    }

    /// Descends to the first item whose inclusive accumulation reaches
    /// `target`.
    pub fn seek(&self, target: &D) -> Result<Seek<D>, TreeError> {
        let mut total = D::zero();
        total.add_summary(&self.tree.summary());
        if *target > total {
            return Ok(Seek {
                index: self.tree.len(),
                position: total,
            });
        }
        let Some(root) = self.tree.root_node() else {
            return Ok(Seek {
                index: 0,
                position: D::zero(),
            });
        };
        let mut acc = D::zero();
        let mut index = 0;
        let mut node = root;
        'descend: loop {
            match node {
                Node::Internal { children, .. } => {
                    for child in children {
                        let mut after = acc.clone();
                        after.add_summary(&child.summary());
                        debug_assert!(after >= acc, "dimension must be monotone");
                        if after < *target {
                            index += child.len();
                            acc = after;
                        } else {
                            node = child.as_ref();
                            continue 'descend;
                        }
                    }
                    // The target was within this subtree's projection but no
                    // child reached it; the dimension shrank somewhere.
                    return Err(TreeError::InvalidDimension);
                }
                Node::Leaf { item_summaries, .. } => {
                    for summary in item_summaries {
                        let mut after = acc.clone();
                        after.add_summary(summary);
                        debug_assert!(after >= acc, "dimension must be monotone");
                        if after >= *target {
                            return Ok(Seek {
                                index,
                                position: after,
                            });
                        }
                        index += 1;
                        acc = after;
                    }
                    return Err(TreeError::InvalidDimension);
                }
            }
        }
    }
}

/// In-order iterator over a tree's items. The traversal carries its own
/// explicit stack, so nodes need no parent pointers.
pub struct Items<'a, T: Item> {
    stack: Vec<(&'a Node<T>, usize)>,
}

impl<'a, T: Item> Items<'a, T> {
    pub(crate) fn new(tree: &'a SumTree<T>) -> Self {
        Self {
            stack: tree.root_node().map(|root| (root, 0)).into_iter().collect(),
        }
    }

    /// An iterator positioned on the item at `index`; empty when `index`
    /// is past the end.
    pub(crate) fn starting_at(tree: &'a SumTree<T>, index: usize) -> Self {
        if index >= tree.len() {
            return Self { stack: Vec::new() };
        }
        let Some(root) = tree.root_node() else {
            return Self { stack: Vec::new() };
        };
        let mut stack = Vec::new();
        let mut node = root;
        let mut remaining = index;
        loop {
            match node {
                Node::Leaf { .. } => {
                    stack.push((node, remaining));
                    return Self { stack };
                }
                Node::Internal { children, .. } => {
                    let (slot, inner) = locate_owner(children, remaining);
                    stack.push((node, slot + 1));
                    node = children[slot].as_ref();
                    remaining = inner;
                }
            }
        }
    }
}

impl<'a, T: Item> Iterator for Items<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            let (node, index) = *self.stack.last()?;
            match node {
                Node::Leaf { items, .. } => {
                    if index < items.len() {
                        if let Some(top) = self.stack.last_mut() {
                            top.1 += 1;
                        }
                        return Some(&items[index]);
                    }
                    self.stack.pop();
                }
                Node::Internal { children, .. } => {
                    if index < children.len() {
                        if let Some(top) = self.stack.last_mut() {
                            top.1 += 1;
                        }
                        self.stack.push((children[index].as_ref(), 0));
                    } else {
                        self.stack.pop();
                    }
                }
            }
        }
    }
}

impl<T: Item> SumTree<T> {
    pub fn cursor<D: Dimension>(&self) -> Cursor<'_, T, D> {
        Cursor::new(self)
    }

    pub fn iter(&self) -> Items<'_, T> {
        Items::new(self)
    }

    pub fn iter_from(&self, index: usize) -> Items<'_, T> {
        Items::starting_at(self, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Summary, TreeConfig};

    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    struct Piece(usize);

    impl Item for Piece {
        fn summary(&self) -> Summary {
            Summary {
                bytes: self.0,
                chars: 1,
                lines: 0,
            }
        }
    }

    /// Projection onto accumulated byte count.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
    struct Bytes(usize);

    impl Dimension for Bytes {
        fn zero() -> Self {
            Self(0)
        }

        fn add_summary(&mut self, summary: &Summary) {
            self.0 += summary.bytes;
        }
    }

    fn tree_of(sizes: &[usize]) -> SumTree<Piece> {
        SumTree::new(TreeConfig::default())
            .insert_at(0, sizes.iter().copied().map(Piece))
            .expect("bulk insert")
    }

    #[test]
    fn seek_finds_the_item_reaching_the_target() {
        // Sizes 10, 10, 10, ... so item k covers bytes [10k, 10k + 10).
        let sizes: Vec<usize> = std::iter::repeat(10).take(100).collect();
        let tree = tree_of(&sizes);
        let cursor = tree.cursor::<Bytes>();

        let hit = cursor.seek(&Bytes(1)).expect("seek");
        assert_eq!((hit.index, hit.position), (0, Bytes(10)));

        // An exact boundary belongs to the item ending there.
        let hit = cursor.seek(&Bytes(10)).expect("seek");
        assert_eq!((hit.index, hit.position), (0, Bytes(10)));

        let hit = cursor.seek(&Bytes(11)).expect("seek");
        assert_eq!((hit.index, hit.position), (1, Bytes(20)));

        let hit = cursor.seek(&Bytes(995)).expect("seek");
        assert_eq!((hit.index, hit.position), (99, Bytes(1000)));
    }

    #[test]
    fn seek_past_the_end_reports_the_total() {
        let tree = tree_of(&[5, 5, 5]);
        let cursor = tree.cursor::<Bytes>();
        let hit = cursor.seek(&Bytes(100)).expect("seek");
        assert_eq!((hit.index, hit.position), (3, Bytes(15)));
    }

    #[test]
    fn seek_on_the_empty_tree_is_at_the_start() {
        let tree: SumTree<Piece> = SumTree::new(TreeConfig::default());
        let cursor = tree.cursor::<Bytes>();
        let hit = cursor.seek(&Bytes(0)).expect("seek");
        assert_eq!((hit.index, hit.position), (0, Bytes(0)));
    }

    #[test]
    fn seek_is_idempotent_against_a_snapshot() {
        let sizes: Vec<usize> = (1..200).collect();
        let tree = tree_of(&sizes);
        let cursor = tree.cursor::<Bytes>();
        let first = cursor.seek(&Bytes(777)).expect("seek");
        let second = cursor.seek(&Bytes(777)).expect("seek");
        assert_eq!(first, second);
    }

    #[test]
    fn items_iterate_in_order() {
        let sizes: Vec<usize> = (0..250).collect();
        let tree = tree_of(&sizes);
        let collected: Vec<usize> = tree.iter().map(|piece| piece.0).collect();
        assert_eq!(collected, sizes);
    }

    #[test]
    fn iter_from_starts_mid_tree() {
        let sizes: Vec<usize> = (0..250).collect();
        let tree = tree_of(&sizes);
        let tail: Vec<usize> = tree.iter_from(200).map(|piece| piece.0).collect();
        assert_eq!(tail, (200..250).collect::<Vec<_>>());
        assert_eq!(tree.iter_from(250).count(), 0);
    }
}
