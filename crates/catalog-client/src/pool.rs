use std::net::{SocketAddr, ToSocketAddrs};
use std::ops::{Deref, DerefMut};

use bson::Document;
use catalog_query::{FilterGroup, Query};
use catalog_store::{Store, StoreError};
use crossbeam::channel::{Receiver, Sender};

use crate::client::{Client, ClientError};

/// Fixed-size pool of connected clients.
///
/// `get` blocks until a slot is free. A client that hit an I/O error is
/// discarded and its slot reconnects on the next `get`, so the pool recovers
/// after the server restarts.
pub struct ClientPool {
    addrs: Vec<SocketAddr>,
    sender: Sender<Option<Client>>,
    receiver: Receiver<Option<Client>>,
}

impl ClientPool {
    pub fn new(addr: impl ToSocketAddrs, size: usize) -> Result<Self, ClientError> {
        let addrs: Vec<SocketAddr> = addr.to_socket_addrs()?.collect();
        let (sender, receiver) = crossbeam::channel::bounded(size);
        for _ in 0..size {
            let client = Client::connect(&addrs[..])?;
            sender
                .send(Some(client))
                .map_err(|e| ClientError::Io(std::io::Error::other(e.to_string())))?;
        }
        Ok(Self {
            addrs,
            sender,
            receiver,
        })
    }

    pub fn get(&self) -> Result<PooledClient<'_>, ClientError> {
        let slot = self
            .receiver
            .recv()
            .map_err(|e| ClientError::Io(std::io::Error::other(e.to_string())))?;

        let client = match slot {
            Some(client) => client,
            None => match Client::connect(&self.addrs[..]) {
                Ok(client) => client,
                Err(e) => {
                    // Keep the slot so a later call can retry.
                    let _ = self.sender.send(None);
                    return Err(e);
                }
            },
        };

        Ok(PooledClient {
            client: Some(client),
            pool: &self.sender,
        })
    }

    fn with_client<T>(
        &self,
        f: impl FnOnce(&mut Client) -> Result<T, ClientError>,
    ) -> Result<T, StoreError> {
        let mut client = self.get().map_err(into_store_error)?;
        let result = f(&mut *client);
        if let Err(ClientError::Io(e)) = &result {
            tracing::warn!(error = %e, "dropping broken connection");
            client.discard();
        }
        result.map_err(into_store_error)
    }
}

/// Returns its client to the pool on drop.
pub struct PooledClient<'a> {
    client: Option<Client>,
    pool: &'a Sender<Option<Client>>,
}

impl PooledClient<'_> {
    /// Close the connection instead of returning it. The slot reconnects on
    /// its next use.
    pub fn discard(mut self) {
        self.client = None;
    }
}

impl Deref for PooledClient<'_> {
    type Target = Client;

    fn deref(&self) -> &Client {
        // client is only taken in Drop and discard, both of which consume the guard
        self.client.as_ref().expect("BUG: client already consumed")
    }
}

impl DerefMut for PooledClient<'_> {
    fn deref_mut(&mut self) -> &mut Client {
        self.client.as_mut().expect("BUG: client already consumed")
    }
}

impl Drop for PooledClient<'_> {
    fn drop(&mut self) {
        let _ = self.pool.send(self.client.take());
    }
}

/// A remote store. Client failures surface as [`StoreError::Storage`] with
/// the underlying message.
impl Store for ClientPool {
    fn find(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        self.with_client(|c| c.find(collection, query))
    }

    fn insert_one(&self, collection: &str, doc: Document) -> Result<Document, StoreError> {
        self.with_client(|c| c.insert_one(collection, doc))
    }

    fn count(&self, collection: &str, filter: Option<&FilterGroup>) -> Result<u64, StoreError> {
        self.with_client(|c| c.count(collection, filter))
    }
}

fn into_store_error(e: ClientError) -> StoreError {
    match e {
        ClientError::Server(msg) => StoreError::Storage(msg),
        other => StoreError::Storage(other.to_string()),
    }
}
