use stint_secrets::SecretsError;
use stint_store::StoreError;
use thiserror::Error;

/// Errors surfaced by the job lifecycle manager.
///
/// Every failure maps 1:1 onto one of three HTTP-visible classes; nothing
/// is swallowed and nothing is retried internally.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("invalid job request: {0}")]
    InvalidRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, GatewayError>;

impl From<StoreError> for GatewayError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => GatewayError::NotFound(id),
            other => GatewayError::Internal(other.to_string()),
        }
    }
}

impl From<SecretsError> for GatewayError {
    fn from(err: SecretsError) -> Self {
        GatewayError::Internal(err.to_string())
    }
}
