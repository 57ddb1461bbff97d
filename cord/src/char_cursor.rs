//! Bidirectional rune stepping over a cord snapshot.

use crate::{Cord, CordError, Position};

/// A character cursor over a cord snapshot.
///
/// The cursor always rests on a rune boundary and tracks both coordinates
/// of its position. Forward stepping is also available through the
/// [`Iterator`] implementation.
pub struct CharCursor<'a> {
    cord: &'a Cord,
    bytepos: usize,
    runepos: usize,
}

impl<'a> CharCursor<'a> {
    /// A cursor at the start of the cord.
    pub fn new(cord: &'a Cord) -> Self {
        Self {
            cord,
            bytepos: 0,
            runepos: 0,
        }
    }

    /// Repositions to the boundary after `runes` runes.
    pub fn seek_runes(&mut self, runes: usize) -> Result<(), CordError> {
        let pos = self.cord.pos_from_runes(runes)?;
        self.bytepos = pos.bytepos();
        self.runepos = pos.runes();
        Ok(())
    }

    /// Validates `pos` against the cord, then adopts it.
    pub fn seek_pos(&mut self, pos: &Position) -> Result<(), CordError> {
        self.cord.validate_pos(pos)?;
        self.bytepos = pos.bytepos();
        self.runepos = pos.runes();
        Ok(())
    }

    pub fn position(&self) -> Position {
        Position::new(self.runepos, self.bytepos)
    }

    pub fn byte_offset(&self) -> usize {
        self.bytepos
    }

    pub fn rune_offset(&self) -> usize {
        self.runepos
    }

    /// The rune before the cursor, stepping back over it; `None` at the
    /// start.
    pub fn prev(&mut self) -> Option<char> {
        if self.bytepos == 0 {
            return None;
        }
        // The chunk holding the last byte of the previous rune also holds
        // its start, since chunks never end inside a rune.
        let (chunk, local) = self.cord.index(self.bytepos - 1).ok()?;
        let mut start = local;
        while !chunk.is_char_boundary(start) {
            start -= 1;
        }
        let ch = chunk.as_str()[start..].chars().next()?;
        self.bytepos -= local - start + 1;
        self.runepos -= 1;
        Some(ch)
    }
}

impl Iterator for CharCursor<'_> {
    type Item = char;

    /// The rune after the cursor, advancing past it; `None` at the end.
    fn next(&mut self) -> Option<char> {
        if self.bytepos >= self.cord.len() {
            return None;
        }
        let (chunk, local) = self.cord.index(self.bytepos).ok()?;
        let ch = chunk.as_str()[local..].chars().next()?;
        self.bytepos += ch.len_utf8();
        self.runepos += 1;
        Some(ch)
    }
}
