//! Repository port for enforcement settings keyed by scope and policy.

use crate::enforcement::domain::{
    EnforcementMode, EnforcementPolicy, EnforcementScope, EnforcementSetting,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for enforcement settings operations.
pub type EnforcementSettingsResult<T> = Result<T, EnforcementSettingsError>;

/// Enforcement settings persistence contract.
#[async_trait]
pub trait EnforcementSettingsRepository: Send + Sync {
    /// Returns the mode stored for exactly this scope and policy.
    ///
    /// No fallback is applied; `None` means nothing is stored.
    async fn find_mode(
        &self,
        scope: EnforcementScope,
        policy: EnforcementPolicy,
    ) -> EnforcementSettingsResult<Option<EnforcementMode>>;

    /// Inserts or replaces the setting for its scope and policy.
    async fn upsert(&self, setting: EnforcementSetting) -> EnforcementSettingsResult<()>;

    /// Removes a stored setting. Returns `true` when a setting was removed.
    async fn remove(
        &self,
        scope: EnforcementScope,
        policy: EnforcementPolicy,
    ) -> EnforcementSettingsResult<bool>;

    /// Lists every stored setting.
    async fn list(&self) -> EnforcementSettingsResult<Vec<EnforcementSetting>>;
}

/// Errors returned by enforcement settings implementations.
#[derive(Debug, Clone, Error)]
pub enum EnforcementSettingsError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl EnforcementSettingsError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
