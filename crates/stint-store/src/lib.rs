//! # stint-store
//!
//! Job record store adapter: typed CRUD operations against a shared,
//! network-accessible collection keyed by job ID.
//!
//! The gateway and the workers that execute jobs run as independent
//! processes coordinating solely through this store, so the adapter's
//! partial-update operation must merge only the named fields - concurrent
//! writers touching disjoint fields never clobber each other. The production
//! backend keeps each job as a Redis hash to get exactly that semantic.
//!
//! Every operation is a single round trip against a single record; no
//! transactions span records and no operation is retried.

pub mod error;
pub mod job_store;
pub mod redis_store;
pub mod test_utils;

pub use error::{Result, StoreError};
pub use job_store::{JobPatch, JobStore};
pub use redis_store::RedisJobStore;
