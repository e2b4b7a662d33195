use thiserror::Error;

/// Errors that can occur during secret resolution
#[derive(Error, Debug)]
pub enum SecretsError {
    #[error("secret service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("secret read failed: {0}")]
    ReadFailed(String),
}

/// Result type for secret resolution
pub type Result<T> = std::result::Result<T, SecretsError>;
