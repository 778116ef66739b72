//! Append-only audit trail of task status and checklist state changes.
//!
//! History entries are immutable: ports expose append and read operations
//! only.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Query and recording service in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
