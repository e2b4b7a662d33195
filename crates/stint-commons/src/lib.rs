//! # stint-commons
//!
//! Shared building blocks for the stint job gateway: type-safe identifiers
//! and the canonical job entity with its status state machine.
//!
//! Everything else in the workspace depends on this crate; it depends on
//! nothing but serde.

pub mod ids;
pub mod models;

pub use ids::{JobId, SnowflakeGenerator};
pub use models::{Job, JobStatus};
