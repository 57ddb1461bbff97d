//! Dimensions project summaries onto seekable scalars.

use crate::Summary;

/// A projection of [`Summary`] onto a totally ordered scalar, used by
/// [`Cursor::seek`](crate::Cursor::seek).
///
/// Law: `add_summary` must be monotone non-decreasing — accumulating any
/// summary never moves the projection backwards. Seek checks this with
/// debug assertions and reports `InvalidDimension` when a broken dimension
/// strands it.
pub trait Dimension: Ord + Clone {
    fn zero() -> Self;

    fn add_summary(&mut self, summary: &Summary);
}
