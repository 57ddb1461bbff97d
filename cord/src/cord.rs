//! The rope adapter: persistent UTF-8 text over a tree of chunks.

use crate::{
    builder::CordBuilder,
    char_cursor::CharCursor,
    chunk::Chunk,
    dimensions::{ByteOffset, LineOffset},
    iter::{ChunkIter, SegmentIter},
    reader::CordReader,
    CordError,
};
use cordage_sum_tree::{Extension, ExtValue, Seek, SumTree, Summary};
use std::{fmt, ops::Range, sync::Arc};

/// An immutable rope of UTF-8 text.
///
/// Every operation returns a new cord that shares untouched chunks and
/// tree nodes with its inputs, so clones, split-off halves, and substrings
/// are cheap snapshots. Two versions can be read concurrently without
/// synchronisation.
///
/// Across the whole cord the chunk bytes concatenate to valid UTF-8 and no
/// chunk ends inside a multi-byte rune; operations that would violate this
/// fail with [`CordError::NotCharBoundary`].
#[derive(Clone)]
pub struct Cord {
    tree: SumTree<Chunk>,
}

impl Cord {
    /// The empty cord.
    pub fn new() -> Self {
        Self {
            tree: SumTree::default(),
        }
    }

    pub fn from_string(text: &str) -> Self {
        let mut builder = CordBuilder::new();
        builder.push(text);
        builder.build()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CordError> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::from_string(text))
    }

    /// A cord that also aggregates `extension` over its chunks.
    pub fn from_string_with_extension(
        text: &str,
        extension: Arc<dyn Extension<Chunk>>,
    ) -> Self {
        let mut builder = CordBuilder::with_extension(extension);
        builder.push(text);
        builder.build()
    }

    /// This cord's chunks re-aggregated under `extension`.
    pub fn with_extension(&self, extension: Arc<dyn Extension<Chunk>>) -> Result<Self, CordError> {
        let empty = SumTree::with_extension(self.tree.config(), extension);
        let tree = empty.insert_at(0, self.tree.iter().cloned())?;
        Ok(Self { tree })
    }

    pub(crate) fn from_tree(tree: SumTree<Chunk>) -> Self {
        Self { tree }
    }

    pub(crate) fn tree(&self) -> &SumTree<Chunk> {
        &self.tree
    }

    /// Total byte length.
    pub fn len(&self) -> usize {
        self.tree.summary().bytes
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// True for the cord with no text.
    pub fn is_void(&self) -> bool {
        self.is_empty()
    }

    pub fn summary(&self) -> Summary {
        self.tree.summary()
    }

    /// Total rune count.
    pub fn char_count(&self) -> usize {
        self.tree.summary().chars
    }

    /// Number of `\n` bytes.
    pub fn newline_count(&self) -> usize {
        self.tree.summary().lines
    }

    /// Number of lines; one more than the newline count.
    pub fn line_count(&self) -> usize {
        self.newline_count() + 1
    }

    /// Number of chunks backing this cord.
    pub fn chunk_count(&self) -> usize {
        self.tree.len()
    }

    /// The item index and absolute byte start of the chunk containing
    /// byte `offset`.
    pub(crate) fn chunk_at(&self, offset: usize) -> Option<(usize, usize)> {
        if offset >= self.len() {
            return None;
        }
        let seek = self
            .tree
            .cursor::<ByteOffset>()
            .seek(&ByteOffset(offset + 1))
            .ok()?;
        let chunk_len = self.tree.at(seek.index).ok()?.len();
        Some((seek.index, seek.position.0 - chunk_len))
    }

    /// The chunk containing byte `offset` and the offset within it.
    pub fn index(&self, offset: usize) -> Result<(Chunk, usize), CordError> {
        let len = self.len();
        let (index, start) = self
            .chunk_at(offset)
            .ok_or(CordError::OutOfBounds { offset, len })?;
        let chunk = self.tree.at(index)?.clone();
        Ok((chunk, offset - start))
    }

    /// True when `offset` does not land inside a multi-byte rune.
    pub fn is_char_boundary(&self, offset: usize) -> bool {
        if offset == 0 || offset == self.len() {
            return true;
        }
        match self.index(offset) {
            Ok((chunk, local)) => chunk.is_char_boundary(local),
            Err(_) => false,
        }
    }

    /// The substring of `count` bytes starting at byte `offset`,
    /// materialised as a string. Both ends of the range must be char
    /// boundaries.
    pub fn report(&self, offset: usize, count: usize) -> Result<String, CordError> {
        let len = self.len();
        let end = offset.checked_add(count).ok_or(CordError::IllegalArguments {
            reason: "range length overflows",
        })?;
        if end > len {
            return Err(CordError::OutOfBounds { offset: end, len });
        }
        if !self.is_char_boundary(offset) {
            return Err(CordError::NotCharBoundary { offset });
        }
        if !self.is_char_boundary(end) {
            return Err(CordError::NotCharBoundary { offset: end });
        }
        let mut out = String::with_capacity(count);
        for (_, segment) in self.range_segments(offset..end) {
            out.push_str(segment);
        }
        Ok(out)
    }

    /// The substring as a cord, sharing as many chunks as possible with
    /// `self`.
    pub fn substr(&self, offset: usize, count: usize) -> Result<Cord, CordError> {
        let len = self.len();
        let end = offset.checked_add(count).ok_or(CordError::IllegalArguments {
            reason: "range length overflows",
        })?;
        if end > len {
            return Err(CordError::OutOfBounds { offset: end, len });
        }
        let (_, rest) = self.split(offset)?;
        let (mid, _) = rest.split(count)?;
        Ok(mid)
    }

    /// Splits into the bytes `[0, offset)` and `[offset, len)`. The offset
    /// must be a char boundary.
    pub fn split(&self, offset: usize) -> Result<(Cord, Cord), CordError> {
        let len = self.len();
        if offset > len {
            return Err(CordError::OutOfBounds { offset, len });
        }
        if offset == 0 {
            return Ok((self.empty_like(), self.clone()));
        }
        if offset == len {
            return Ok((self.clone(), self.empty_like()));
        }
        let Seek { index, position } = self.tree.cursor::<ByteOffset>().seek(&ByteOffset(offset))?;
        let chunk = self.tree.at(index)?;
        let chunk_len = chunk.len();
        let local = offset - (position.0 - chunk_len);
        if local == chunk_len {
            let (left, right) = self.tree.split_at(index + 1)?;
            return Ok((Self::from_tree(left), Self::from_tree(right)));
        }
        if local == 0 {
            let (left, right) = self.tree.split_at(index)?;
            return Ok((Self::from_tree(left), Self::from_tree(right)));
        }
        if !chunk.is_char_boundary(local) {
            return Err(CordError::NotCharBoundary { offset });
        }
        let (head, tail) = chunk.split_at(local)?;
        let head = head.to_chunk();
        let tail = tail.to_chunk();
        tracing::trace!(offset, chunk = index, local, "splicing a chunk at a rope seam");
        let (left, right) = self.tree.split_at(index)?;
        let right = right.delete_at(0)?;
        let left = left.insert_at(left.len(), [head])?;
        let right = right.insert_at(0, [tail])?;
        Ok((Self::from_tree(left), Self::from_tree(right)))
    }

    /// Joins `self` and `other`. Fails when the cords carry different
    /// extension identities.
    pub fn concat(&self, other: &Cord) -> Result<Cord, CordError> {
        Ok(Self::from_tree(self.tree.concat(&other.tree)?))
    }

    /// Splices `other` in at byte `offset`.
    pub fn insert(&self, other: &Cord, offset: usize) -> Result<Cord, CordError> {
        let (left, right) = self.split(offset)?;
        left.concat(other)?.concat(&right)
    }

    /// Removes `count` bytes at `offset`, returning the remainder and the
    /// removed middle.
    pub fn cut(&self, offset: usize, count: usize) -> Result<(Cord, Cord), CordError> {
        let (left, rest) = self.split(offset)?;
        let (mid, right) = rest.split(count)?;
        Ok((left.concat(&right)?, mid))
    }

    /// The cord without the `count` bytes at `offset`.
    pub fn delete(&self, offset: usize, count: usize) -> Result<Cord, CordError> {
        Ok(self.cut(offset, count)?.0)
    }

    /// The cord with `text` appended, chunked under the same extension.
    pub fn append_str(&self, text: &str) -> Result<Cord, CordError> {
        if text.is_empty() {
            return Ok(self.clone());
        }
        self.concat(&self.cord_of(text))
    }

    /// Replaces the `count` bytes at `offset` with `text`.
    pub fn replace(&self, offset: usize, count: usize, text: &str) -> Result<Cord, CordError> {
        let (left, rest) = self.split(offset)?;
        let (_, right) = rest.split(count)?;
        left.concat(&self.cord_of(text))?.concat(&right)
    }

    /// A new cord over `text` carrying this cord's extension, so the two
    /// remain concatenable.
    fn cord_of(&self, text: &str) -> Cord {
        let mut builder = match self.tree.extension() {
            Some(extension) => CordBuilder::with_extension(extension.clone()),
            None => CordBuilder::new(),
        };
        builder.push(text);
        builder.build()
    }

    /// Byte offset of the start of line `line` (0-based; line `n` begins
    /// just past the `n`-th newline).
    pub fn byte_offset_of_line(&self, line: usize) -> Result<usize, CordError> {
        let total = self.newline_count();
        if line == 0 {
            return Ok(0);
        }
        if line > total {
            return Err(CordError::OutOfBounds {
                offset: line,
                len: total,
            });
        }
        let Seek { index, .. } = self.tree.cursor::<LineOffset>().seek(&LineOffset(line))?;
        let chunk = self.tree.at(index)?;
        let prefix = self.tree.prefix_summary(index)?;
        Ok(prefix.bytes + chunk.byte_after_newline(line - prefix.lines))
    }

    /// The line containing byte `offset`: the number of newlines strictly
    /// before it.
    pub fn line_of_byte(&self, offset: usize) -> Result<usize, CordError> {
        let len = self.len();
        if offset > len {
            return Err(CordError::OutOfBounds { offset, len });
        }
        if offset == len {
            return Ok(self.newline_count());
        }
        let (index, start) = self
            .chunk_at(offset)
            .ok_or(CordError::OutOfBounds { offset, len })?;
        let chunk = self.tree.at(index)?;
        let prefix = self.tree.prefix_summary(index)?;
        Ok(prefix.lines + chunk.newlines_before(offset - start))
    }

    /// The contents of line `line` as a cord, including its trailing
    /// newline if any.
    pub fn line(&self, line: usize) -> Result<Cord, CordError> {
        let start = self.byte_offset_of_line(line)?;
        let end = if line == self.newline_count() {
            self.len()
        } else {
            self.byte_offset_of_line(line + 1)?
        };
        self.substr(start, end - start)
    }

    /// Byte offset of the boundary after `runes` runes.
    pub fn char_to_byte(&self, runes: usize) -> Result<usize, CordError> {
        Ok(self.pos_from_runes(runes)?.bytepos())
    }

    /// Rune count of the boundary at byte `offset`.
    pub fn byte_to_char(&self, offset: usize) -> Result<usize, CordError> {
        Ok(self.pos_from_byte(offset)?.runes())
    }

    /// A forward-only byte reader over this cord.
    pub fn reader(&self) -> CordReader<'_> {
        CordReader::new(self)
    }

    /// The cord's runes in order.
    pub fn chars(&self) -> CharCursor<'_> {
        CharCursor::new(self)
    }

    /// Chunks intersecting the byte range, with each chunk's absolute
    /// start offset.
    pub fn range_chunks(&self, range: Range<usize>) -> ChunkIter<'_> {
        ChunkIter::new(self, range)
    }

    /// Text segments clipped to the byte range, with each segment's
    /// absolute start offset. Both endpoints must be char boundaries.
    pub fn range_segments(&self, range: Range<usize>) -> SegmentIter<'_> {
        SegmentIter::new(self, range)
    }

    /// The root extension aggregate. Fails when the cord was built without
    /// an extension.
    pub fn ext(&self) -> Result<ExtValue, CordError> {
        Ok(self.tree.ext()?)
    }

    /// The extension aggregate over the first `chunk_index` chunks.
    pub fn prefix_ext(&self, chunk_index: usize) -> Result<ExtValue, CordError> {
        Ok(self.tree.prefix_ext(chunk_index)?)
    }

    fn empty_like(&self) -> Self {
        Self {
            tree: self.tree.empty_like(),
        }
    }
}

impl Default for Cord {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Cord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.tree.iter() {
            f.write_str(chunk.as_str())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Cord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cord({:?})", self.to_string())
    }
}

impl From<&str> for Cord {
    fn from(text: &str) -> Self {
        Self::from_string(text)
    }
}

impl PartialEq for Cord {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        // Chunk boundaries of equal cords may differ; compare streamed.
        let mut left = self.tree.iter();
        let mut right = other.tree.iter();
        let mut lbuf: &[u8] = &[];
        let mut rbuf: &[u8] = &[];
        loop {
            if lbuf.is_empty() {
                lbuf = match left.next() {
                    Some(chunk) => chunk.as_bytes(),
                    None => break,
                };
            }
            if rbuf.is_empty() {
                rbuf = match right.next() {
                    Some(chunk) => chunk.as_bytes(),
                    None => return false,
                };
            }
            let n = lbuf.len().min(rbuf.len());
            if lbuf[..n] != rbuf[..n] {
                return false;
            }
            lbuf = &lbuf[n..];
            rbuf = &rbuf[n..];
        }
        rbuf.is_empty() && right.next().is_none()
    }
}

impl Eq for Cord {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::MAX_BASE;

    #[test]
    fn split_mid_chunk_splices_at_the_seam() {
        let cord = Cord::from_string("hello world");
        let (left, right) = cord.split(5).expect("split");
        assert_eq!(left.to_string(), "hello");
        assert_eq!(right.to_string(), " world");
        assert_eq!(left.len(), 5);
        assert_eq!(right.len(), 6);
        // The original is a snapshot, untouched by the split.
        assert_eq!(cord.to_string(), "hello world");
    }

    #[test]
    fn split_at_every_boundary_round_trips() {
        let text = "caf\u{00e9} \u{4e16}\u{754c}\n".repeat(30);
        let cord = Cord::from_string(&text);
        assert!(cord.chunk_count() > 1);
        let boundaries: Vec<usize> = text
            .char_indices()
            .map(|(offset, _)| offset)
            .chain([text.len()])
            .collect();
        for &offset in &boundaries {
            let (left, right) = cord.split(offset).expect("split");
            assert_eq!(left.to_string(), &text[..offset]);
            assert_eq!(right.to_string(), &text[offset..]);
            assert_eq!(left.summary() + right.summary(), cord.summary());
            let rejoined = left.concat(&right).expect("concat");
            assert_eq!(rejoined, cord);
        }
    }

    #[test]
    fn split_inside_a_rune_is_rejected() {
        let cord = Cord::from_string("a\u{1F600}z");
        for offset in 2..5 {
            assert!(matches!(
                cord.split(offset),
                Err(CordError::NotCharBoundary { .. })
            ));
        }
        assert!(matches!(
            cord.split(10),
            Err(CordError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn report_materialises_ranges() {
        let text = "0123456789".repeat(20);
        let cord = Cord::from_string(&text);
        assert_eq!(cord.report(0, 10).expect("report"), &text[..10]);
        assert_eq!(cord.report(63, 70).expect("report"), &text[63..133]);
        assert_eq!(cord.report(0, text.len()).expect("report"), text);
        assert_eq!(cord.report(text.len(), 0).expect("report"), "");
        assert!(matches!(
            cord.report(195, 10),
            Err(CordError::OutOfBounds { .. })
        ));
        assert!(matches!(
            cord.report(usize::MAX, 2),
            Err(CordError::IllegalArguments { .. })
        ));
    }

    #[test]
    fn report_rejects_mid_rune_endpoints() {
        let cord = Cord::from_string("a\u{1F600}z");
        assert!(matches!(
            cord.report(2, 2),
            Err(CordError::NotCharBoundary { offset: 2 })
        ));
        assert!(matches!(
            cord.report(0, 3),
            Err(CordError::NotCharBoundary { offset: 3 })
        ));
    }

    #[test]
    fn substr_agrees_with_report() {
        let text = "lorem ipsum dolor sit amet\n".repeat(10);
        let cord = Cord::from_string(&text);
        for (offset, count) in [(0, 5), (20, 40), (100, 0), (250, 20)] {
            assert_eq!(
                cord.substr(offset, count).expect("substr").to_string(),
                cord.report(offset, count).expect("report")
            );
        }
        assert!(cord.substr(text.len(), 1).is_err());
    }

    #[test]
    fn insert_and_cut_are_inverse() {
        let cord = Cord::from_string("Hello World");
        let inserted = cord
            .insert(&Cord::from_string(", there"), 5)
            .expect("insert");
        assert_eq!(inserted.to_string(), "Hello, there World");
        let (rest, mid) = inserted.cut(5, 7).expect("cut");
        assert_eq!(rest, cord);
        assert_eq!(mid.to_string(), ", there");
    }

    #[test]
    fn delete_drops_the_window() {
        let cord = Cord::from_string("abcdefgh");
        assert_eq!(cord.delete(2, 3).expect("delete").to_string(), "abfgh");
        assert_eq!(cord.delete(0, 8).expect("all").to_string(), "");
        assert!(cord.delete(6, 3).is_err());
    }

    #[test]
    fn index_finds_the_owning_chunk() {
        let text = "a".repeat(MAX_BASE) + "bbb";
        let cord = Cord::from_string(&text);
        assert_eq!(cord.chunk_count(), 2);
        let (chunk, local) = cord.index(0).expect("index");
        assert_eq!((chunk.len(), local), (MAX_BASE, 0));
        let (chunk, local) = cord.index(MAX_BASE - 1).expect("index");
        assert_eq!((chunk.len(), local), (MAX_BASE, MAX_BASE - 1));
        let (chunk, local) = cord.index(MAX_BASE).expect("index");
        assert_eq!((chunk.as_str(), local), ("bbb", 0));
        assert!(cord.index(text.len()).is_err());
    }

    #[test]
    fn line_lookups_cross_chunks() {
        let text = "one\ntwo\nthree\n".repeat(20);
        let cord = Cord::from_string(&text);
        assert_eq!(cord.newline_count(), 60);
        assert_eq!(cord.line_count(), 61);
        assert_eq!(cord.byte_offset_of_line(0).expect("line 0"), 0);
        assert_eq!(cord.byte_offset_of_line(1).expect("line 1"), 4);
        assert_eq!(cord.byte_offset_of_line(3).expect("line 3"), 14);
        assert_eq!(cord.byte_offset_of_line(60).expect("last line"), text.len());
        assert!(cord.byte_offset_of_line(61).is_err());

        assert_eq!(cord.line_of_byte(0).expect("line of 0"), 0);
        assert_eq!(cord.line_of_byte(3).expect("line of 3"), 0);
        assert_eq!(cord.line_of_byte(4).expect("line of 4"), 1);
        assert_eq!(cord.line_of_byte(text.len()).expect("line of end"), 60);
    }

    #[test]
    fn append_str_extends_without_touching_the_receiver() {
        let cord = Cord::from_string("hello");
        let longer = cord.append_str(" world").expect("append");
        assert_eq!(longer.to_string(), "hello world");
        assert_eq!(cord.to_string(), "hello");
        assert_eq!(cord.append_str("").expect("noop"), cord);
    }

    #[test]
    fn replace_swaps_the_window() {
        let cord = Cord::from_string("hello world");
        assert_eq!(
            cord.replace(0, 5, "goodbye").expect("replace").to_string(),
            "goodbye world"
        );
        assert_eq!(
            cord.replace(5, 1, "").expect("delete via replace").to_string(),
            "helloworld"
        );
        assert_eq!(
            cord.replace(11, 0, "!").expect("append via replace").to_string(),
            "hello world!"
        );
        assert!(cord.replace(10, 5, "x").is_err());
    }

    #[test]
    fn chars_iterates_the_runes() {
        let text = "a\u{00e9}\u{1F600}";
        let cord = Cord::from_string(text);
        let collected: String = cord.chars().collect();
        assert_eq!(collected, text);
    }

    #[test]
    fn line_extracts_whole_lines() {
        let cord = Cord::from_string("one\ntwo\nthree");
        assert_eq!(cord.line(0).expect("line 0").to_string(), "one\n");
        assert_eq!(cord.line(1).expect("line 1").to_string(), "two\n");
        assert_eq!(cord.line(2).expect("line 2").to_string(), "three");
        assert!(cord.line(3).is_err());
    }

    #[test]
    fn from_bytes_validates_utf8() {
        assert!(Cord::from_bytes("ok\n".as_bytes()).is_ok());
        assert!(matches!(
            Cord::from_bytes(&[b'a', 0xFF]),
            Err(CordError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn equality_ignores_chunk_boundaries() {
        let whole = Cord::from_string("abcdef");
        let pieced = Cord::from_string("abc")
            .concat(&Cord::from_string("def"))
            .expect("concat");
        assert_eq!(whole, pieced);
        assert_ne!(whole, Cord::from_string("abcdeg"));
        assert_eq!(Cord::new(), Cord::from_string(""));
    }

    #[test]
    fn summaries_track_the_text() {
        let text = "caf\u{00e9}\nna\u{00ef}ve\n\u{1F600}";
        let cord = Cord::from_string(text);
        assert_eq!(cord.len(), text.len());
        assert_eq!(cord.char_count(), text.chars().count());
        assert_eq!(cord.newline_count(), text.matches('\n').count());
        assert!(!cord.is_void());
        assert!(Cord::new().is_void());
    }
}
