//! User-defined monoidal aggregates cached alongside base summaries.

use crate::Summary;
use std::{any::Any, sync::Arc};

/// A dynamically typed extension aggregate value.
///
/// Extensions choose their own concrete type behind this; [`Extension`]
/// implementations downcast inside `add`.
pub type ExtValue = Arc<dyn Any + Send + Sync>;

/// An optional second aggregate maintained next to [`Summary`] at every
/// node of an extension-enabled tree.
///
/// The trait is an interface object: a tree stores one `Arc<dyn Extension>`
/// and derives a value per leaf item with [`from_item`](Extension::from_item),
/// combining values upward with the monoid `zero`/`add`.
///
/// `magic` is the extension's stable identity. Two trees may only be
/// concatenated when their identities are equal; the values of distinct
/// extensions are not mutually combinable even when their concrete types
/// happen to match.
pub trait Extension<T>: Send + Sync {
    /// Stable identity of this extension.
    fn magic(&self) -> &str;

    /// The monoid identity value.
    fn zero(&self) -> ExtValue;

    /// The associative combine.
    fn add(&self, left: &ExtValue, right: &ExtValue) -> ExtValue;

    /// Derives the aggregate of a single leaf item. The item's base summary
    /// is supplied so derivations over counts need not recompute it.
    fn from_item(&self, item: &T, summary: &Summary) -> ExtValue;
}
