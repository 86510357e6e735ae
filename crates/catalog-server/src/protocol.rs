//! Wire messages between `catalog-client` and `catalog-server`.
//!
//! Each message is a 4-byte big-endian length followed by that many bytes of
//! MessagePack.

use std::io::{self, Read, Write};

use catalog_query::{FilterGroup, Query};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub enum Request {
    InsertOne {
        collection: String,
        doc: bson::Document,
    },
    Find {
        collection: String,
        query: Query,
    },
    Count {
        collection: String,
        filter: Option<FilterGroup>,
    },
}

#[derive(Debug, Serialize, Deserialize)]
pub enum Response {
    Insert(bson::Document),
    Records(Vec<bson::Document>),
    Count(u64),
    Error(String),
}

/// Largest frame body either side will send or accept.
pub const MAX_FRAME_LEN: usize = 64 * 1024 * 1024;

pub fn write_frame(writer: &mut impl Write, bytes: &[u8]) -> io::Result<()> {
    if bytes.len() > MAX_FRAME_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("frame of {} bytes exceeds {MAX_FRAME_LEN}", bytes.len()),
        ));
    }
    let len = bytes.len() as u32;
    writer.write_all(&len.to_be_bytes())?;
    writer.write_all(bytes)?;
    writer.flush()
}

pub fn read_frame(reader: &mut impl Read) -> io::Result<Vec<u8>> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf)?;
    let len = u32::from_be_bytes(len_buf) as usize;
    if len > MAX_FRAME_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("frame of {len} bytes exceeds {MAX_FRAME_LEN}"),
        ));
    }

    let mut msg_buf = vec![0u8; len];
    reader.read_exact(&mut msg_buf)?;
    Ok(msg_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use catalog_query::{Filter, Sort, SortDirection};

    #[test]
    fn frame_prefixes_length() {
        let mut buf = Vec::new();
        write_frame(&mut buf, b"abc").unwrap();
        assert_eq!(buf, [0, 0, 0, 3, b'a', b'b', b'c']);
        assert_eq!(read_frame(&mut buf.as_slice()).unwrap(), b"abc");
    }

    #[test]
    fn truncated_frame_is_an_error() {
        let buf = [0u8, 0, 0, 9, 1, 2];
        let err = read_frame(&mut buf.as_slice()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn oversized_length_is_rejected_before_allocating() {
        let buf = u32::MAX.to_be_bytes();
        let err = read_frame(&mut buf.as_slice()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let over_limit = ((MAX_FRAME_LEN + 1) as u32).to_be_bytes();
        let err = read_frame(&mut over_limit.as_slice()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn oversized_body_is_not_written() {
        let mut buf = Vec::new();
        let err = write_frame(&mut buf, &vec![0u8; MAX_FRAME_LEN + 1]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(buf.is_empty());
    }

    #[test]
    fn find_request_survives_msgpack() {
        let request = Request::Find {
            collection: "catalog.product".into(),
            query: Query {
                filter: Some(FilterGroup::all([
                    Filter::regex("commercialName", "Test"),
                    Filter::is_in("category", ["A"]),
                ])),
                sort: vec![Sort::new("amount", SortDirection::Desc)],
            },
        };
        let bytes = rmp_serde::to_vec(&request).unwrap();
        match rmp_serde::from_slice::<Request>(&bytes).unwrap() {
            Request::Find { collection, query } => {
                assert_eq!(collection, "catalog.product");
                assert_eq!(query.sort, vec![Sort::new("amount", SortDirection::Desc)]);
                assert_eq!(query.filter.unwrap().children.len(), 2);
            }
            other => panic!("expected Find, got {other:?}"),
        }
    }

    #[test]
    fn insert_response_keeps_document_fields() {
        let response = Response::Insert(doc! { "_id": "p-1", "amount": 39.7 });
        let bytes = rmp_serde::to_vec(&response).unwrap();
        match rmp_serde::from_slice::<Response>(&bytes).unwrap() {
            Response::Insert(doc) => {
                assert_eq!(doc.get_str("_id").unwrap(), "p-1");
                assert_eq!(doc.get_f64("amount").unwrap(), 39.7);
            }
            other => panic!("expected Insert, got {other:?}"),
        }
    }
}
