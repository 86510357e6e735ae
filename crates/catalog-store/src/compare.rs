use std::cmp::Ordering;

use bson::{Bson, Document};

/// Resolve a dotted path (`listType.description`) inside a document.
///
/// Null values resolve to `None`, same as a missing key.
pub(crate) fn get_path<'a>(doc: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut parts = path.split('.');
    let mut current = doc.get(parts.next()?)?;
    for part in parts {
        current = match current {
            Bson::Document(sub) => sub.get(part)?,
            _ => return None,
        };
    }
    match current {
        Bson::Null => None,
        value => Some(value),
    }
}

/// Equality between a stored value and a query value.
pub(crate) fn values_eq(store_val: &Bson, query_val: &Bson) -> bool {
    match (store_val, query_val) {
        (Bson::String(a), Bson::String(b)) => a == b,
        (Bson::Int32(a), Bson::Int32(b)) => a == b,
        (Bson::Int32(a), Bson::Int64(b)) => (*a as i64) == *b,
        (Bson::Int64(a), Bson::Int64(b)) => a == b,
        (Bson::Int64(a), Bson::Int32(b)) => *a == (*b as i64),
        (Bson::Double(a), Bson::Double(b)) => a == b,
        (Bson::Double(a), Bson::Int64(b)) => *a == (*b as f64),
        (Bson::Double(a), Bson::Int32(b)) => *a == (*b as f64),
        (Bson::Int64(a), Bson::Double(b)) => (*a as f64) == *b,
        (Bson::Int32(a), Bson::Double(b)) => (*a as f64) == *b,
        (Bson::Boolean(a), Bson::Boolean(b)) => a == b,
        (Bson::ObjectId(a), Bson::ObjectId(b)) => a == b,
        (Bson::DateTime(a), Bson::DateTime(b)) => a.timestamp_millis() == b.timestamp_millis(),
        (Bson::Document(a), Bson::Document(b)) => a == b,

        // Incompatible types: silent exclusion
        _ => false,
    }
}

/// Ordering used by sorts. Missing and null values sort before everything else.
pub(crate) fn compare_field_values(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => compare_two_values(a, b),
    }
}

fn compare_two_values(a: &Bson, b: &Bson) -> Ordering {
    match (a, b) {
        (Bson::String(a), Bson::String(b)) => a.cmp(b),
        (Bson::Int32(a), Bson::Int32(b)) => a.cmp(b),
        (Bson::Int64(a), Bson::Int64(b)) => a.cmp(b),
        (Bson::Int32(a), Bson::Int64(b)) => (*a as i64).cmp(b),
        (Bson::Int64(a), Bson::Int32(b)) => a.cmp(&(*b as i64)),
        // total_cmp keeps the order total when NaN is present; NaN sorts after every number.
        (Bson::Double(a), Bson::Double(b)) => a.total_cmp(b),
        (Bson::Double(a), Bson::Int64(b)) => a.total_cmp(&(*b as f64)),
        (Bson::Double(a), Bson::Int32(b)) => a.total_cmp(&f64::from(*b)),
        (Bson::Int64(a), Bson::Double(b)) => (*a as f64).total_cmp(b),
        (Bson::Int32(a), Bson::Double(b)) => f64::from(*a).total_cmp(b),
        (Bson::Boolean(a), Bson::Boolean(b)) => a.cmp(b),
        (Bson::ObjectId(a), Bson::ObjectId(b)) => a.bytes().cmp(&b.bytes()),
        (Bson::DateTime(a), Bson::DateTime(b)) => a.timestamp_millis().cmp(&b.timestamp_millis()),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Cross-type order: numbers, strings, documents, arrays, ids, booleans, dates.
fn type_rank(value: &Bson) -> u8 {
    match value {
        Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_) => 1,
        Bson::String(_) | Bson::Symbol(_) => 2,
        Bson::Document(_) => 3,
        Bson::Array(_) => 4,
        Bson::ObjectId(_) => 5,
        Bson::Boolean(_) => 6,
        Bson::DateTime(_) | Bson::Timestamp(_) => 7,
        _ => 8,
    }
}
