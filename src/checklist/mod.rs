//! Task checklists and the mandatory checklist gate.
//!
//! Checklist items hang off tasks. Items flagged mandatory must be completed
//! before a task can move into a completion status, subject to the
//! department's enforcement mode. Every observed check/uncheck flip is
//! written to the checklist history.
//!
//! - Domain types and the pure validator in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The gate and item services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
