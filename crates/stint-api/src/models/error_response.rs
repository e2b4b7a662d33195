//! Error envelope for all failure responses.

use serde::{Deserialize, Serialize};

/// JSON error envelope: `{"status", "code", "error"}`.
///
/// `status` is the user-level message, `code` an optional
/// application-specific code, `error` the debug text of the underlying
/// failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,

    pub error: String,
}

impl ErrorResponse {
    pub fn invalid_request(error: impl ToString) -> Self {
        Self {
            status: "Invalid job request.".to_string(),
            code: None,
            error: error.to_string(),
        }
    }

    pub fn not_found(error: impl ToString) -> Self {
        Self {
            status: "Not Found.".to_string(),
            code: None,
            error: error.to_string(),
        }
    }

    pub fn internal(error: impl ToString) -> Self {
        Self {
            status: "Internal Error.".to_string(),
            code: None,
            error: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_omitted_when_unset() {
        let json = serde_json::to_string(&ErrorResponse::not_found("no such job")).unwrap();
        assert!(json.contains("Not Found."));
        assert!(json.contains("no such job"));
        assert!(!json.contains("code"));
    }
}
