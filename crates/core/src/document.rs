//! Stored document abstraction shared by products and sales.

use crate::id::DocumentId;

/// A record that lives in a named document collection, keyed by a
/// store-assigned [`DocumentId`].
pub trait Document: Clone + Send + Sync + 'static {
    /// Collection (table) name the document is stored under.
    const COLLECTION: &'static str;

    fn id(&self) -> &DocumentId;
}
