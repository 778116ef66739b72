//! Error types for parsing persisted enforcement values.

use thiserror::Error;

/// Error returned while parsing enforcement values from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseEnforcementError {
    /// Unknown enforcement mode.
    #[error("unknown enforcement mode: {0}")]
    Mode(String),

    /// Unknown enforcement policy.
    #[error("unknown enforcement policy: {0}")]
    Policy(String),

    /// Scope key is neither `global` nor a department UUID.
    #[error("invalid enforcement scope key: {0}")]
    Scope(String),
}
