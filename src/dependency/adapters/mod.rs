//! Adapter implementations for dependency ports.

pub mod memory;
pub mod postgres;
