//! Adapter implementations for enforcement settings.

pub mod memory;
pub mod postgres;
