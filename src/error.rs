use thiserror::Error;

/// Result type for customer store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the customer store library
#[derive(Error, Debug)]
pub enum Error {
    /// Errors reported by the backing key-value store
    #[error("Store error: {0}")]
    Store(String),

    /// No record exists for the requested customer ID
    #[error("Customer not found: {0}")]
    NotFound(String),

    /// The request was rejected before reaching the store
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The store client could not be configured
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors related to JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns true if this error means the record does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}
