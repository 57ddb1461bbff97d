//! Bit-indexed fixed-capacity UTF-8 chunks.

use crate::CordError;
use cordage_sum_tree::{Item, Summary};
use smallvec::SmallVec;
use std::fmt;

/// Chunk capacity in bytes. Must not exceed the bitmap width, so every
/// local query is a single word operation.
pub const MAX_BASE: usize = 64;

const BITMAP_WIDTH: usize = 64;

/// A single bit at `offset`; no bit past the bitmap width.
#[inline]
fn bit(offset: usize) -> u64 {
    if offset < BITMAP_WIDTH {
        1 << offset
    } else {
        0
    }
}

/// All bits in `[0, k)`.
#[inline]
fn prefix_mask(k: usize) -> u64 {
    if k >= BITMAP_WIDTH {
        u64::MAX
    } else {
        (1u64 << k) - 1
    }
}

/// All bits in `[i, j)`.
#[inline]
fn range_mask(i: usize, j: usize) -> u64 {
    prefix_mask(j) & !prefix_mask(i)
}

#[inline]
fn shift_down(bits: u64, amount: usize) -> u64 {
    if amount >= BITMAP_WIDTH {
        0
    } else {
        bits >> amount
    }
}

/// An immutable fixed-capacity UTF-8 byte buffer with char-start and
/// newline bitmaps.
///
/// Bit `i` of `chars` is set iff byte `i` starts a rune, bit `i` of
/// `newlines` iff byte `i` is `\n`, which makes rune counts, newline
/// counts, and boundary tests single popcounts or bit probes. All
/// "mutations" return new chunks.
#[derive(Clone, PartialEq, Eq)]
pub struct Chunk {
    text: SmallVec<[u8; MAX_BASE]>,
    chars: u64,
    newlines: u64,
}

impl Chunk {
    /// A chunk over `text`, which must fit the capacity.
    pub fn new(text: &str) -> Result<Self, CordError> {
        if text.len() > MAX_BASE {
            return Err(CordError::ChunkTooLarge {
                len: text.len(),
                max: MAX_BASE,
            });
        }
        Ok(Self::from_valid(text.as_bytes()))
    }

    /// As [`new`](Chunk::new), validating the bytes as UTF-8 first.
    pub fn new_bytes(bytes: &[u8]) -> Result<Self, CordError> {
        if bytes.len() > MAX_BASE {
            return Err(CordError::ChunkTooLarge {
                len: bytes.len(),
                max: MAX_BASE,
            });
        }
        std::str::from_utf8(bytes)?;
        Ok(Self::from_valid(bytes))
    }

    /// Computes both bitmaps in one pass. Callers guarantee `bytes` is
    /// valid UTF-8 within capacity.
    pub(crate) fn from_valid(bytes: &[u8]) -> Self {
        debug_assert!(bytes.len() <= MAX_BASE);
        debug_assert!(std::str::from_utf8(bytes).is_ok());
        let mut chars = 0u64;
        let mut newlines = 0u64;
        for (offset, &byte) in bytes.iter().enumerate() {
            if byte & 0xC0 != 0x80 {
                chars |= bit(offset);
            }
            if byte == b'\n' {
                newlines |= bit(offset);
            }
        }
        Self {
            text: SmallVec::from_slice(bytes),
            chars,
            newlines,
        }
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_str(&self) -> &str {
        // SAFETY: construction validates UTF-8 and every derived chunk is
        // cut at rune boundaries only.
        unsafe { std::str::from_utf8_unchecked(&self.text) }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.text
    }

    /// The raw char-start bitmap.
    pub fn chars(&self) -> u64 {
        self.chars
    }

    /// The raw newline bitmap.
    pub fn newlines(&self) -> u64 {
        self.newlines
    }

    /// True at 0, at `len`, and wherever a rune starts.
    pub fn is_char_boundary(&self, offset: usize) -> bool {
        offset == 0
            || offset == self.len()
            || (offset < self.len() && self.chars & bit(offset) != 0)
    }

    /// A view of bytes `[start, end)`. Both endpoints must be char
    /// boundaries.
    pub fn slice(&self, start: usize, end: usize) -> Result<ChunkSlice<'_>, CordError> {
        if start > end || end > self.len() {
            return Err(CordError::OutOfBounds {
                offset: start.max(end),
                len: self.len(),
            });
        }
        if !self.is_char_boundary(start) {
            return Err(CordError::NotCharBoundary { offset: start });
        }
        if !self.is_char_boundary(end) {
            return Err(CordError::NotCharBoundary { offset: end });
        }
        let mask = range_mask(start, end);
        Ok(ChunkSlice {
            text: &self.as_str()[start..end],
            chars: shift_down(self.chars & mask, start),
            newlines: shift_down(self.newlines & mask, start),
        })
    }

    /// The views `[0, mid)` and `[mid, len)`.
    pub fn split_at(&self, mid: usize) -> Result<(ChunkSlice<'_>, ChunkSlice<'_>), CordError> {
        Ok((self.slice(0, mid)?, self.slice(mid, self.len())?))
    }

    /// A view of the whole chunk.
    pub fn as_slice(&self) -> ChunkSlice<'_> {
        ChunkSlice {
            text: self.as_str(),
            chars: self.chars,
            newlines: self.newlines,
        }
    }

    /// The chunk extended by `slice`, or `None` when the combination would
    /// exceed capacity. The receiver is never modified.
    pub fn append(&self, slice: &ChunkSlice<'_>) -> Option<Chunk> {
        if slice.is_empty() {
            return Some(self.clone());
        }
        let base = self.len();
        if base + slice.len() > MAX_BASE {
            return None;
        }
        let mut text = self.text.clone();
        text.extend_from_slice(slice.text.as_bytes());
        // A non-empty slice fits, so base < BITMAP_WIDTH and the shifts
        // stay in range.
        Some(Chunk {
            text,
            chars: self.chars | (slice.chars << base),
            newlines: self.newlines | (slice.newlines << base),
        })
    }

    pub fn summary(&self) -> Summary {
        Summary {
            bytes: self.len(),
            chars: (self.chars & prefix_mask(self.len())).count_ones() as usize,
            lines: (self.newlines & prefix_mask(self.len())).count_ones() as usize,
        }
    }

    /// Number of rune starts in `[0, offset)`.
    pub fn runes_before(&self, offset: usize) -> usize {
        (self.chars & prefix_mask(offset)).count_ones() as usize
    }

    /// Number of newlines in `[0, offset)`.
    pub fn newlines_before(&self, offset: usize) -> usize {
        (self.newlines & prefix_mask(offset)).count_ones() as usize
    }

    /// Byte offset of the `count`-th (0-based) rune start; the chunk
    /// length when `count` equals the rune count.
    pub(crate) fn byte_of_rune(&self, count: usize) -> usize {
        let mut seen = 0;
        for offset in 0..self.len() {
            if self.chars & bit(offset) != 0 {
                if seen == count {
                    return offset;
                }
                seen += 1;
            }
        }
        self.len()
    }

    /// Byte offset just past the `count`-th (1-based) newline; the chunk
    /// length when fewer newlines exist.
    pub(crate) fn byte_after_newline(&self, count: usize) -> usize {
        let mut seen = 0;
        for offset in 0..self.len() {
            if self.newlines & bit(offset) != 0 {
                seen += 1;
                if seen == count {
                    return offset + 1;
                }
            }
        }
        self.len()
    }
}

impl Item for Chunk {
    fn summary(&self) -> Summary {
        Chunk::summary(self)
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Chunk").field(&self.as_str()).finish()
    }
}

/// A read-only view into a chunk, bitmaps re-based so offset 0 of the view
/// is bit 0.
#[derive(Copy, Clone, Debug)]
pub struct ChunkSlice<'a> {
    text: &'a str,
    chars: u64,
    newlines: u64,
}

impl<'a> ChunkSlice<'a> {
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_str(&self) -> &'a str {
        self.text
    }

    pub fn chars(&self) -> u64 {
        self.chars
    }

    pub fn newlines(&self) -> u64 {
        self.newlines
    }

    pub fn summary(&self) -> Summary {
        Summary {
            bytes: self.len(),
            chars: (self.chars & prefix_mask(self.len())).count_ones() as usize,
            lines: (self.newlines & prefix_mask(self.len())).count_ones() as usize,
        }
    }

    /// An owned chunk with this view's contents.
    pub fn to_chunk(&self) -> Chunk {
        Chunk {
            text: SmallVec::from_slice(self.text.as_bytes()),
            chars: self.chars,
            newlines: self.newlines,
        }
    }
}
