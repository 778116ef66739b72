//! Port contracts for enforcement settings storage.

pub mod repository;

pub use repository::{
    EnforcementSettingsRepository, EnforcementSettingsError, EnforcementSettingsResult,
};
