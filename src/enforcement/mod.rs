//! Enforcement policies for workflow preconditions.
//!
//! Each policy (task ownership, mandatory checklist completion) runs in
//! either `warn` or `block` mode. Modes are stored per department with a
//! global fallback, so a department can be tightened from advisory to
//! mandatory without code changes.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The cached settings resolver in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
