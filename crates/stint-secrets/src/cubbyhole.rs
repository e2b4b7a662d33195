//! Cubbyhole resolver against a Vault-style secret service.
//!
//! The wrapped token grants exactly one read of the cubbyhole path; the
//! service invalidates it afterwards. The service address is re-read from
//! the environment on every resolution - credentials are never cached
//! across requests.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Result, SecretsError};
use crate::SecretResolver;

/// Environment variable naming the secret service address.
pub const SECRET_SERVICE_ADDR_ENV: &str = "VAULT_ADDR";

/// Header carrying the one-time bearer token.
const TOKEN_HEADER: &str = "X-Vault-Token";

/// Resolver performing the one-time cubbyhole read over HTTP.
pub struct CubbyholeResolver {
    /// Fixed service address; when `None` the address comes from the
    /// environment at resolution time.
    address: Option<String>,
    timeout: Duration,
}

impl CubbyholeResolver {
    /// Resolver that reads the service address from `VAULT_ADDR` on every
    /// resolution.
    pub fn from_env(timeout: Duration) -> Self {
        Self {
            address: None,
            timeout,
        }
    }

    /// Resolver pinned to a fixed service address.
    pub fn with_address(address: impl Into<String>, timeout: Duration) -> Self {
        Self {
            address: Some(address.into()),
            timeout,
        }
    }

    fn service_address(&self) -> Result<String> {
        if let Some(ref address) = self.address {
            return Ok(address.clone());
        }
        match std::env::var(SECRET_SERVICE_ADDR_ENV) {
            Ok(address) if !address.trim().is_empty() => Ok(address),
            _ => Err(SecretsError::ServiceUnavailable(format!(
                "{} is not set",
                SECRET_SERVICE_ADDR_ENV
            ))),
        }
    }
}

#[async_trait]
impl SecretResolver for CubbyholeResolver {
    async fn resolve(&self, token: &str, path: &str) -> Result<String> {
        let address = self.service_address()?;
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| {
                SecretsError::ServiceUnavailable(format!(
                    "failed to build secret service client: {}",
                    e
                ))
            })?;

        let url = read_url(&address, path);
        log::debug!("performing one-time cubbyhole read at {}", path);
        let response = client
            .get(&url)
            .header(TOKEN_HEADER, token)
            .send()
            .await
            .map_err(|e| SecretsError::ReadFailed(format!("cubbyhole read failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(SecretsError::ReadFailed(format!(
                "cubbyhole read returned {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            SecretsError::ReadFailed(format!("malformed secret service response: {}", e))
        })?;
        extract_payload(&body)
    }
}

/// `{addr}/v1/{path}` with duplicate slashes squeezed out.
fn read_url(address: &str, path: &str) -> String {
    format!(
        "{}/v1/{}",
        address.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Pull the `payload` string out of the response's `data` object.
fn extract_payload(body: &serde_json::Value) -> Result<String> {
    body.get("data")
        .and_then(|data| data.get("payload"))
        .and_then(|payload| payload.as_str())
        .map(str::to_string)
        .ok_or_else(|| {
            SecretsError::ReadFailed(
                "secret response missing string `payload` field".to_string(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_url_joins_cleanly() {
        assert_eq!(
            read_url("http://vault:8200", "cubbyhole/job"),
            "http://vault:8200/v1/cubbyhole/job"
        );
        assert_eq!(
            read_url("http://vault:8200/", "/cubbyhole/job"),
            "http://vault:8200/v1/cubbyhole/job"
        );
    }

    #[test]
    fn test_extract_payload() {
        let body = json!({"data": {"payload": "s3cret"}});
        assert_eq!(extract_payload(&body).unwrap(), "s3cret");
    }

    #[test]
    fn test_extract_payload_missing_field() {
        for body in [
            json!({}),
            json!({"data": {}}),
            json!({"data": {"payload": 42}}),
        ] {
            assert!(matches!(
                extract_payload(&body),
                Err(SecretsError::ReadFailed(_))
            ));
        }
    }

    #[test]
    fn test_pinned_address_wins() {
        let resolver =
            CubbyholeResolver::with_address("http://vault:8200", Duration::from_secs(5));
        assert_eq!(resolver.service_address().unwrap(), "http://vault:8200");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_a_read_failure() {
        // Nothing listens on this port; the request itself must fail.
        let resolver =
            CubbyholeResolver::with_address("http://127.0.0.1:1", Duration::from_secs(1));
        assert!(matches!(
            resolver.resolve("tok", "cubbyhole/job").await,
            Err(SecretsError::ReadFailed(_))
        ));
    }
}
