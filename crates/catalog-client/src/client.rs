use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};

use catalog_query::{FilterGroup, Query};
use catalog_server::protocol::{self, Request, Response};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("server error: {0}")]
    Server(String),
}

impl From<rmp_serde::encode::Error> for ClientError {
    fn from(e: rmp_serde::encode::Error) -> Self {
        ClientError::Serialization(e.to_string())
    }
}

impl From<rmp_serde::decode::Error> for ClientError {
    fn from(e: rmp_serde::decode::Error) -> Self {
        ClientError::Serialization(e.to_string())
    }
}

/// A single connection to a `catalog-server`.
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self, ClientError> {
        let stream = TcpStream::connect(addr)?;
        let reader = BufReader::new(stream.try_clone()?);
        let writer = BufWriter::new(stream);
        Ok(Self { reader, writer })
    }

    fn request(&mut self, request: Request) -> Result<Response, ClientError> {
        let bytes = rmp_serde::to_vec(&request)?;
        protocol::write_frame(&mut self.writer, &bytes)?;

        let msg = protocol::read_frame(&mut self.reader)?;
        let response: Response = rmp_serde::from_slice(&msg)?;
        Ok(response)
    }

    pub fn insert_one(
        &mut self,
        collection: &str,
        doc: bson::Document,
    ) -> Result<bson::Document, ClientError> {
        match self.request(Request::InsertOne {
            collection: collection.to_string(),
            doc,
        })? {
            Response::Insert(doc) => Ok(doc),
            Response::Error(e) => Err(ClientError::Server(e)),
            other => Err(unexpected(other)),
        }
    }

    pub fn find(
        &mut self,
        collection: &str,
        query: &Query,
    ) -> Result<Vec<bson::Document>, ClientError> {
        match self.request(Request::Find {
            collection: collection.to_string(),
            query: query.clone(),
        })? {
            Response::Records(r) => Ok(r),
            Response::Error(e) => Err(ClientError::Server(e)),
            other => Err(unexpected(other)),
        }
    }

    pub fn count(
        &mut self,
        collection: &str,
        filter: Option<&FilterGroup>,
    ) -> Result<u64, ClientError> {
        match self.request(Request::Count {
            collection: collection.to_string(),
            filter: filter.cloned(),
        })? {
            Response::Count(n) => Ok(n),
            Response::Error(e) => Err(ClientError::Server(e)),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(response: Response) -> ClientError {
    ClientError::Server(format!("unexpected response: {response:?}"))
}
