//! Adapter implementations for task ports.
//!
//! - [`memory`]: thread-safe in-memory adapters for tests and embedding
//! - [`postgres`]: Diesel-backed `PostgreSQL` task repository

pub mod memory;
pub mod postgres;
