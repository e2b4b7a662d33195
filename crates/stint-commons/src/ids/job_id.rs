//! Type-safe wrapper for job identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::SnowflakeGenerator;

/// Number of lowercase-hex characters in a rendered job identifier.
const JOB_ID_LEN: usize = 16;

/// Type-safe wrapper for job identifiers.
///
/// A job ID is the zero-padded lowercase-hex rendering of a snowflake, so
/// identifiers issued later always sort after earlier ones. The gateway is
/// the only party that ever mints one; clients can only echo IDs back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(String);

impl JobId {
    /// Mint a fresh identifier from the next snowflake.
    pub fn generate(ids: &SnowflakeGenerator) -> Result<Self, String> {
        let raw = ids.next_id()?;
        Ok(Self(format!("{:016x}", raw as u64)))
    }

    /// Parse an externally-supplied identifier, validating its syntax.
    ///
    /// This is the single validation point for IDs arriving over the wire:
    /// exactly 16 lowercase hex characters, nothing else.
    pub fn parse(raw: &str) -> Result<Self, String> {
        if raw.len() != JOB_ID_LEN
            || !raw.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        {
            return Err(format!(
                "invalid job id {:?} (expected {} lowercase hex characters)",
                raw, JOB_ID_LEN
            ));
        }
        Ok(Self(raw.to_string()))
    }

    /// Returns the job ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the inner String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for JobId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
