//! Error taxonomy for cord operations.

use cordage_sum_tree::TreeError;
use thiserror::Error;

/// Errors reported by cord, chunk, position, and cursor operations.
///
/// Every failing operation leaves no partial state; the cord it was called
/// on is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CordError {
    #[error("offset {offset} out of bounds for length {len}")]
    OutOfBounds { offset: usize, len: usize },

    #[error("illegal arguments: {reason}")]
    IllegalArguments { reason: &'static str },

    #[error("invalid utf-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("chunk of {len} bytes exceeds the {max} byte capacity")]
    ChunkTooLarge { len: usize, max: usize },

    #[error("byte offset {offset} is not a char boundary")]
    NotCharBoundary { offset: usize },

    #[error("position at byte {bytepos} does not belong to this cord")]
    IllegalPosition { bytepos: usize },

    #[error(transparent)]
    Tree(#[from] TreeError),
}
