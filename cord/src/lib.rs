//! Persistent UTF-8 rope over bit-indexed fixed-capacity chunks.
//!
//! A [`Cord`] stores large immutable text as a balanced tree of small
//! fixed-capacity [`Chunk`]s, each carrying bitmaps of its rune starts and
//! newlines. Concatenation, splitting, substring, insertion, and deletion
//! are non-destructive and logarithmic: results share every untouched
//! chunk and tree node with their inputs.
//!
//! Byte, rune, and line coordinates interconvert through the tree's
//! summaries; [`Position`]s pair a rune offset with its byte offset, and
//! [`CharCursor`] steps a cord one rune at a time in either direction.
//!
//! # Example
//!
//! ```
//! use cordage_cord::Cord;
//!
//! let cord = Cord::from_string("Hello World");
//! let (hello, world) = cord.split(5)?;
//! assert_eq!(hello.to_string(), "Hello");
//! assert_eq!(world.to_string(), " World");
//! # Ok::<(), cordage_cord::CordError>(())
//! ```

mod builder;
mod char_cursor;
mod chunk;
mod cord;
mod dimensions;
mod error;
mod iter;
mod position;
mod reader;

pub use builder::CordBuilder;
pub use char_cursor::CharCursor;
pub use chunk::{Chunk, ChunkSlice, MAX_BASE};
pub use cord::Cord;
pub use dimensions::{ByteOffset, CharOffset, LineOffset};
pub use error::CordError;
pub use iter::{ChunkIter, SegmentIter};
pub use position::Position;
pub use reader::CordReader;

// The tree-facing vocabulary extension implementors need.
pub use cordage_sum_tree::{ExtValue, Extension, Summary, TreeError};
