//! Adapter implementations for checklist ports.

pub mod memory;
pub mod postgres;
