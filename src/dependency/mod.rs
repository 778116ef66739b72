//! Task dependency graph.
//!
//! Edges read "task depends on prerequisite". `BLOCKS` edges must form an
//! acyclic graph at all times; `RELATES_TO` edges are informational and are
//! ignored by cycle detection and blocking queries.
//!
//! - Domain types and the cycle detector in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The dependency service in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
