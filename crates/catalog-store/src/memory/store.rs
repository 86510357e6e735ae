use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use arc_swap::ArcSwap;
use bson::oid::ObjectId;
use bson::{Bson, Document};
use catalog_query::{FilterGroup, Query};
use imbl::OrdMap;

use crate::error::StoreError;
use crate::expression::Expression;
use crate::sort::sort_documents;
use crate::store::Store;

/// One collection's contents. Cloning is cheap due to imbl structural sharing.
#[derive(Clone, Default)]
struct CollectionData {
    /// Keyed by insertion sequence, so iteration yields insertion order.
    records: OrdMap<u64, Document>,
    /// `_id` to insertion sequence.
    ids: OrdMap<String, u64>,
    next_seq: u64,
}

/// In-process document store.
///
/// Readers load a snapshot of a collection and never block. Writers are
/// serialized by `write_lock`, build the next version of the collection and
/// publish it with a single swap.
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Arc<ArcSwap<CollectionData>>>>,
    write_lock: Mutex<()>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            write_lock: Mutex::new(()),
        }
    }

    fn snapshot(&self, name: &str) -> Result<Option<Arc<CollectionData>>, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|e| StoreError::Storage(format!("collection map poisoned: {e}")))?;
        Ok(collections.get(name).map(|data| data.load_full()))
    }

    /// Get a collection's handle, creating the collection on first use.
    fn handle(&self, name: &str) -> Result<Arc<ArcSwap<CollectionData>>, StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|e| StoreError::Storage(format!("collection map poisoned: {e}")))?;
        let handle = collections
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(ArcSwap::from_pointee(CollectionData::default())));
        Ok(Arc::clone(handle))
    }

    fn matching(
        &self,
        collection: &str,
        filter: Option<&FilterGroup>,
    ) -> Result<Vec<Document>, StoreError> {
        let expr = Expression::compile(filter)?;
        let Some(data) = self.snapshot(collection)? else {
            return Ok(Vec::new());
        };
        Ok(data
            .records
            .values()
            .filter(|doc| expr.matches(doc))
            .cloned()
            .collect())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemoryStore {
    fn find(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        let mut docs = self.matching(collection, query.filter.as_ref())?;
        sort_documents(&mut docs, &query.sort);
        Ok(docs)
    }

    fn insert_one(&self, collection: &str, doc: Document) -> Result<Document, StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| StoreError::Storage(format!("write lock poisoned: {e}")))?;

        let handle = self.handle(collection)?;
        let mut data = (**handle.load()).clone();

        let doc = with_id(doc);
        let key = match doc.get("_id") {
            Some(id) => id_key(id),
            None => return Err(StoreError::Storage("document has no _id".into())),
        };
        if data.ids.contains_key(&key) {
            return Err(StoreError::DuplicateId(key));
        }

        let seq = data.next_seq;
        data.next_seq += 1;
        data.ids.insert(key, seq);
        data.records.insert(seq, doc.clone());
        handle.store(Arc::new(data));

        Ok(doc)
    }

    fn count(&self, collection: &str, filter: Option<&FilterGroup>) -> Result<u64, StoreError> {
        Ok(self.matching(collection, filter)?.len() as u64)
    }
}

/// Prepend a fresh `_id` unless the document already carries one.
fn with_id(doc: Document) -> Document {
    if doc.contains_key("_id") {
        return doc;
    }
    let mut out = Document::new();
    out.insert("_id", ObjectId::new().to_hex());
    for (key, value) in doc {
        out.insert(key, value);
    }
    out
}

fn id_key(id: &Bson) -> String {
    match id {
        Bson::String(s) => s.clone(),
        Bson::ObjectId(oid) => oid.to_hex(),
        other => other.to_string(),
    }
}
