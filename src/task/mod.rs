//! Task workflow state machine.
//!
//! Tasks move between open-ended status names. The configured blocked
//! status requires a reason and notifies the people responsible for the
//! task; the configured completion statuses are guarded by the ownership
//! and mandatory checklist policies. Every committed transition is appended
//! to the status history.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The workflow service in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
