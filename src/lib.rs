//! Taskflow: task dependency graph and workflow state machine.
//!
//! This crate maintains the directed graph of inter-task dependencies and
//! enforces the task status state machine: blocking and unblocking,
//! mandatory-checklist gating under per-department enforcement policies, and
//! an append-only audit trail of every transition.
//!
//! # Architecture
//!
//! Taskflow follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, in-memory)
//! - **Services**: Orchestration over ports
//!
//! # Modules
//!
//! - [`task`]: Task aggregate, collaborator ports, and the workflow engine
//! - [`dependency`]: Dependency store, cycle detection, and graph export
//! - [`checklist`]: Checklist items and the mandatory checklist gate
//! - [`enforcement`]: Warn/block enforcement settings per department
//! - [`audit`]: Status and checklist history
//! - [`config`]: Workflow configuration

#[macro_use]
mod id_macro;

pub mod audit;
pub mod checklist;
pub mod config;
pub mod dependency;
pub mod enforcement;
pub mod task;
