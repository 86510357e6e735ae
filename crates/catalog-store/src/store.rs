use std::sync::Arc;

use bson::Document;
use catalog_query::{FilterGroup, Query};

use crate::error::StoreError;

/// A document store holding named collections.
///
/// Implementations must be safe to share across request handlers; any
/// per-insert atomicity is the implementation's responsibility.
pub trait Store: Send + Sync {
    /// Documents in `collection` matching `query.filter`, ordered by
    /// `query.sort`. With no sort keys the store's default order is used.
    fn find(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError>;

    /// Insert one document and return it as stored.
    ///
    /// A document without `_id` is assigned one.
    fn insert_one(&self, collection: &str, doc: Document) -> Result<Document, StoreError>;

    fn count(&self, collection: &str, filter: Option<&FilterGroup>) -> Result<u64, StoreError>;
}

impl<S: Store + ?Sized> Store for Arc<S> {
    fn find(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        (**self).find(collection, query)
    }

    fn insert_one(&self, collection: &str, doc: Document) -> Result<Document, StoreError> {
        (**self).insert_one(collection, doc)
    }

    fn count(&self, collection: &str, filter: Option<&FilterGroup>) -> Result<u64, StoreError> {
        (**self).count(collection, filter)
    }
}
