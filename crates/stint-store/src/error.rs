use thiserror::Error;

/// Errors that can occur in job store operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("job not found: {0}")]
    NotFound(String),

    #[error("store read failed: {0}")]
    ReadFailed(String),

    #[error("store write failed: {0}")]
    WriteFailed(String),
}

/// Result type for job store operations
pub type Result<T> = std::result::Result<T, StoreError>;
