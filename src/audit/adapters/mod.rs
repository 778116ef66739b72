//! Adapter implementations for audit history ports.

pub mod memory;
pub mod postgres;
