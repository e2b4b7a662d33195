//! Stint server library surface.
//!
//! Only configuration lives here; the binary wires logging, bootstrap and
//! the HTTP server itself.

pub mod config;
