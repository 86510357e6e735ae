use std::sync::Arc;

use catalog_store::{Store, StoreError};

use crate::protocol::{Request, Response};

/// Dispatches decoded requests for one connection.
pub struct Session<S: Store> {
    store: Arc<S>,
}

impl<S: Store> Session<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn handle(&self, request: Request) -> Response {
        match request {
            Request::InsertOne { collection, doc } => {
                respond(self.store.insert_one(&collection, doc), Response::Insert)
            }
            Request::Find { collection, query } => {
                respond(self.store.find(&collection, &query), Response::Records)
            }
            Request::Count { collection, filter } => respond(
                self.store.count(&collection, filter.as_ref()),
                Response::Count,
            ),
        }
    }
}

fn respond<T>(result: Result<T, StoreError>, ok: fn(T) -> Response) -> Response {
    match result {
        Ok(value) => ok(value),
        Err(e) => {
            tracing::debug!(error = %e, "request failed");
            Response::Error(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use catalog_query::Query;
    use catalog_store::MemoryStore;

    #[test]
    fn insert_then_find() {
        let session = Session::new(Arc::new(MemoryStore::new()));
        let response = session.handle(Request::InsertOne {
            collection: "c".into(),
            doc: doc! { "_id": "a" },
        });
        assert!(matches!(response, Response::Insert(_)));

        match session.handle(Request::Find {
            collection: "c".into(),
            query: Query::default(),
        }) {
            Response::Records(docs) => assert_eq!(docs.len(), 1),
            other => panic!("expected Records, got {other:?}"),
        }
    }

    #[test]
    fn store_errors_become_error_responses() {
        let session = Session::new(Arc::new(MemoryStore::new()));
        for _ in 0..2 {
            session.handle(Request::InsertOne {
                collection: "c".into(),
                doc: doc! { "_id": "a" },
            });
        }
        match session.handle(Request::InsertOne {
            collection: "c".into(),
            doc: doc! { "_id": "a" },
        }) {
            Response::Error(msg) => assert_eq!(msg, "duplicate id: a"),
            other => panic!("expected Error, got {other:?}"),
        }
    }
}
