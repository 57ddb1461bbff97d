//! Seek dimensions over the text summary.

use cordage_sum_tree::{Dimension, Summary};

/// Navigate by byte offset.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ByteOffset(pub usize);

impl Dimension for ByteOffset {
    fn zero() -> Self {
        Self(0)
    }

    fn add_summary(&mut self, summary: &Summary) {
        self.0 += summary.bytes;
    }
}

/// Navigate by rune count.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct CharOffset(pub usize);

impl Dimension for CharOffset {
    fn zero() -> Self {
        Self(0)
    }

    fn add_summary(&mut self, summary: &Summary) {
        self.0 += summary.chars;
    }
}

/// Navigate by newline count.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct LineOffset(pub usize);

impl Dimension for LineOffset {
    fn zero() -> Self {
        Self(0)
    }

    fn add_summary(&mut self, summary: &Summary) {
        self.0 += summary.lines;
    }
}
