//! Incremental construction of cords from string pieces.

use crate::{
    chunk::{Chunk, MAX_BASE},
    Cord,
};
use cordage_sum_tree::{Extension, SumTree, TreeConfig};
use std::sync::Arc;

/// Accumulates text into maximal rune-aligned chunks, then bulk-loads a
/// tree in one pass.
///
/// Consecutive pushes coalesce: a push first tops up the previous chunk to
/// capacity (never cutting a rune in half) before opening new chunks.
pub struct CordBuilder {
    chunks: Vec<Chunk>,
    extension: Option<Arc<dyn Extension<Chunk>>>,
}

impl CordBuilder {
    pub fn new() -> Self {
        Self {
            chunks: Vec::new(),
            extension: None,
        }
    }

    /// A builder whose cord will aggregate `extension` alongside the base
    /// summary.
    pub fn with_extension(extension: Arc<dyn Extension<Chunk>>) -> Self {
        Self {
            chunks: Vec::new(),
            extension: Some(extension),
        }
    }

    pub fn push(&mut self, mut text: &str) {
        // Top up the last chunk first so small pushes coalesce.
        if let Some(last) = self.chunks.last_mut() {
            let available = MAX_BASE - last.len();
            if available > 0 && !text.is_empty() {
                let mut take = available.min(text.len());
                while !text.is_char_boundary(take) {
                    take -= 1;
                }
                if take > 0 {
                    let head = Chunk::from_valid(text[..take].as_bytes());
                    if let Some(combined) = last.append(&head.as_slice()) {
                        *last = combined;
                        text = &text[take..];
                    }
                }
            }
        }

        while !text.is_empty() {
            let mut split_ix = MAX_BASE.min(text.len());
            while !text.is_char_boundary(split_ix) {
                split_ix -= 1;
            }
            let (piece, remainder) = text.split_at(split_ix);
            self.chunks.push(Chunk::from_valid(piece.as_bytes()));
            text = remainder;
        }
    }

    pub fn build(self) -> Cord {
        let tree = match self.extension {
            Some(extension) => SumTree::with_extension(TreeConfig::default(), extension),
            None => SumTree::new(TreeConfig::default()),
        };
        let tree = tree
            .insert_at(0, self.chunks)
            .expect("bulk insert into an empty tree at index 0");
        Cord::from_tree(tree)
    }
}

impl Default for CordBuilder {
    fn default() -> Self {
        Self::new()
    }
}
