//! Range iterators over chunks and text segments.

use crate::{chunk::Chunk, Cord};
use cordage_sum_tree::Items;
use std::ops::Range;

/// Visits the chunks intersecting a byte range, in order, with each
/// chunk's absolute start offset.
pub struct ChunkIter<'a> {
    items: Items<'a, Chunk>,
    position: usize,
    end: usize,
}

impl<'a> ChunkIter<'a> {
    pub(crate) fn new(cord: &'a Cord, range: Range<usize>) -> Self {
        let len = cord.len();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        let (index, chunk_start) = cord.chunk_at(start).unwrap_or((cord.chunk_count(), start));
        Self {
            items: cord.tree().iter_from(index),
            position: chunk_start,
            end,
        }
    }
}

impl<'a> Iterator for ChunkIter<'a> {
    type Item = (usize, &'a Chunk);

    fn next(&mut self) -> Option<(usize, &'a Chunk)> {
        if self.position >= self.end {
            return None;
        }
        let chunk = self.items.next()?;
        let start = self.position;
        self.position += chunk.len();
        Some((start, chunk))
    }
}

/// Visits the text segments of a byte range: chunk contents clipped to the
/// range, with each segment's absolute start offset.
///
/// Both endpoints of the range must be char boundaries; checked surfaces
/// like [`Cord::report`] validate before iterating.
pub struct SegmentIter<'a> {
    chunks: ChunkIter<'a>,
    start: usize,
    end: usize,
}

impl<'a> SegmentIter<'a> {
    pub(crate) fn new(cord: &'a Cord, range: Range<usize>) -> Self {
        let len = cord.len();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        Self {
            chunks: ChunkIter::new(cord, start..end),
            start,
            end,
        }
    }
}

impl<'a> Iterator for SegmentIter<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<(usize, &'a str)> {
        let (chunk_start, chunk) = self.chunks.next()?;
        let from = self.start.saturating_sub(chunk_start);
        let to = (self.end - chunk_start).min(chunk.len());
        Some((chunk_start + from, &chunk.as_str()[from..to]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::MAX_BASE;

    fn sample() -> Cord {
        // Three full chunks plus a partial one.
        Cord::from_string(&"abcdefgh".repeat(MAX_BASE / 2))
    }

    #[test]
    fn chunks_cover_the_requested_range() {
        let cord = sample();
        let chunks: Vec<(usize, usize)> = cord
            .range_chunks(70..200)
            .map(|(start, chunk)| (start, chunk.len()))
            .collect();
        assert!(!chunks.is_empty());
        // The first chunk starts at or before 70, the last reaches 200.
        assert!(chunks[0].0 <= 70);
        let (last_start, last_len) = chunks[chunks.len() - 1];
        assert!(last_start + last_len >= 200);
        // Starts are contiguous.
        for pair in chunks.windows(2) {
            assert_eq!(pair[0].0 + pair[0].1, pair[1].0);
        }
    }

    #[test]
    fn segments_clip_to_the_range() {
        let cord = sample();
        let text = cord.to_string();
        let collected: String = cord
            .range_segments(70..200)
            .map(|(_, segment)| segment)
            .collect();
        assert_eq!(collected, &text[70..200]);

        let (first_start, _) = cord.range_segments(70..200).next().expect("segment");
        assert_eq!(first_start, 70);
    }

    #[test]
    fn empty_and_out_of_range_iterations_yield_nothing() {
        let cord = sample();
        assert_eq!(cord.range_chunks(5..5).count(), 0);
        assert_eq!(cord.range_segments(cord.len()..cord.len() + 10).count(), 0);
        assert_eq!(Cord::new().range_chunks(0..10).count(), 0);
    }

    #[test]
    fn full_range_reassembles_the_text() {
        let cord = Cord::from_string("tiny");
        let collected: String = cord
            .range_segments(0..cord.len())
            .map(|(_, segment)| segment)
            .collect();
        assert_eq!(collected, "tiny");
    }
}
