use thiserror::Error;

/// Failure taxonomy of the storage engine. Callers map these to HTTP
/// statuses; nothing is retried at this layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with the given identifier, name or filter.
    #[error("record not found")]
    NotFound,

    /// The backing store could not be reached or a query failed.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored document did not decode into its record type.
    #[error("corrupt stored document: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}
