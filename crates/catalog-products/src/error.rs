use catalog_store::StoreError;

/// Failure of a product operation.
///
/// The HTTP layer renders every variant the same way; the variants exist for
/// logging and tests.
#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("malformed product document: {0}")]
    Decode(String),
}
