#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Storage(String),
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    #[error("duplicate id: {0}")]
    DuplicateId(String),
}
