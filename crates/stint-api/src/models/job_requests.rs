//! Job submission request model.

use serde::{Deserialize, Serialize};
use stint_core::SubmitRequest;

/// Body of `POST /v1/api/jobs`.
///
/// Job-type-specific fields (playbook names, command lines, ...) may also be
/// present in the body; they are opaque to the gateway and ignored here.
/// The payload itself is never part of the request - only the one-time
/// coordinates to fetch it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitJobRequest {
    #[serde(default)]
    pub qname: String,

    #[serde(default)]
    pub container_image: String,

    /// Wrapping token reference for the AppRole secret id. Required.
    #[serde(default)]
    pub wrap_secret_id: String,

    /// One-time token granting a single cubbyhole read.
    #[serde(default)]
    pub cubby_token: String,

    /// Cubbyhole path holding the encrypted payload.
    #[serde(default)]
    pub cubby_path: String,
}

impl From<SubmitJobRequest> for SubmitRequest {
    fn from(request: SubmitJobRequest) -> Self {
        Self {
            qname: request.qname,
            container_image: request.container_image,
            wrap_secret_id: request.wrap_secret_id,
            cubby_token: request.cubby_token,
            cubby_path: request.cubby_path,
        }
    }
}
