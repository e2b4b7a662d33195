//! # stint-secrets
//!
//! One-time secret resolution for job submissions.
//!
//! A submission never carries its plaintext payload. Instead the client
//! supplies a short-lived, single-use token and a path; the gateway spends
//! that token on exactly one read against the secret-management service and
//! stores the resulting plaintext on the job record. A consumed token can
//! never succeed twice, so nothing in this crate retries - a definitive
//! failure is surfaced immediately.

pub mod cubbyhole;
pub mod error;

use async_trait::async_trait;

pub use cubbyhole::CubbyholeResolver;
pub use error::{Result, SecretsError};

/// Turns a one-time bearer token and path into plaintext payload bytes.
#[async_trait]
pub trait SecretResolver: Send + Sync {
    /// Perform the single unwrap read. Callers must not retry the same
    /// token after a definitive failure.
    async fn resolve(&self, token: &str, path: &str) -> Result<String>;
}
