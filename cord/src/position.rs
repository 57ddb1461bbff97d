//! Rune-aware positions bound to a cord.

use crate::{
    dimensions::{ByteOffset, CharOffset},
    Cord, CordError,
};
use cordage_sum_tree::Seek;

/// A rune offset paired with its byte offset in a specific cord.
///
/// Positions are validated on use: a position is accepted only when its
/// byte offset resolves back to the same rune count against the cord at
/// hand. That rejects positions from other cords as well as positions
/// whose byte offset no longer falls on the same rune structure.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Position {
    runes: usize,
    bytepos: usize,
}

impl Position {
    pub(crate) fn new(runes: usize, bytepos: usize) -> Self {
        Self { runes, bytepos }
    }

    pub fn runes(&self) -> usize {
        self.runes
    }

    pub fn bytepos(&self) -> usize {
        self.bytepos
    }
}

impl Cord {
    /// The position before the first rune.
    pub fn pos_start(&self) -> Position {
        Position::new(0, 0)
    }

    /// The position after the last rune.
    pub fn pos_end(&self) -> Position {
        let summary = self.summary();
        Position::new(summary.chars, summary.bytes)
    }

    /// The position at byte `offset`, which must be a char boundary.
    pub fn pos_from_byte(&self, offset: usize) -> Result<Position, CordError> {
        let len = self.len();
        if offset > len {
            return Err(CordError::OutOfBounds { offset, len });
        }
        if offset == 0 {
            return Ok(self.pos_start());
        }
        let Seek { index, position } =
            self.tree().cursor::<ByteOffset>().seek(&ByteOffset(offset))?;
        let chunk = self.tree().at(index)?;
        let local = offset - (position.0 - chunk.len());
        if !chunk.is_char_boundary(local) {
            return Err(CordError::IllegalPosition { bytepos: offset });
        }
        let prefix = self.tree().prefix_summary(index)?;
        Ok(Position::new(prefix.chars + chunk.runes_before(local), offset))
    }

    /// The position after `runes` runes, scanning the destination chunk's
    /// char bitmap for the matching byte offset.
    pub fn pos_from_runes(&self, runes: usize) -> Result<Position, CordError> {
        let total = self.summary().chars;
        if runes > total {
            return Err(CordError::OutOfBounds {
                offset: runes,
                len: total,
            });
        }
        if runes == 0 {
            return Ok(self.pos_start());
        }
        let Seek { index, .. } = self.tree().cursor::<CharOffset>().seek(&CharOffset(runes))?;
        let chunk = self.tree().at(index)?;
        let prefix = self.tree().prefix_summary(index)?;
        let local_byte = chunk.byte_of_rune(runes - prefix.chars);
        Ok(Position::new(runes, prefix.bytes + local_byte))
    }

    /// Validates `pos` against this cord and returns its byte offset.
    pub fn byte_offset(&self, pos: &Position) -> Result<usize, CordError> {
        self.validate_pos(pos)?;
        Ok(pos.bytepos)
    }

    /// Accepts `pos` only if its byte offset re-resolves to the same rune
    /// count against this cord.
    pub fn validate_pos(&self, pos: &Position) -> Result<(), CordError> {
        let len = self.len();
        if pos.bytepos > len {
            return Err(CordError::OutOfBounds {
                offset: pos.bytepos,
                len,
            });
        }
        let resolved = self.pos_from_byte(pos.bytepos)?;
        if resolved.runes != pos.runes {
            return Err(CordError::IllegalPosition {
                bytepos: pos.bytepos,
            });
        }
        Ok(())
    }
}
