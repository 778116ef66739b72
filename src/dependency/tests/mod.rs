//! Unit tests for the dependency module.
//!
//! Graph algorithm tests run against the pure adjacency; service tests run
//! against the in-memory adapters.
