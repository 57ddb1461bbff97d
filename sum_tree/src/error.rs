//! Error taxonomy for tree operations.

use compact_str::CompactString;
use thiserror::Error;

/// Errors reported by tree operations.
///
/// All of these are caller-precondition failures; the operation that
/// returns one leaves no partial state behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("index {index} out of bounds for tree of {len} items")]
    OutOfBounds { index: usize, len: usize },

    #[error("invalid tree configuration: {reason}")]
    InvalidConfig { reason: &'static str },

    #[error("incompatible extensions: {left:?} vs {right:?}")]
    IncompatibleExtension {
        left: Option<CompactString>,
        right: Option<CompactString>,
    },

    #[error("tree has no extension configured")]
    ExtensionUnavailable,

    #[error("dimension never reached its seek target")]
    InvalidDimension,
}
