//! In-memory enforcement settings store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::enforcement::{
    domain::{EnforcementMode, EnforcementPolicy, EnforcementScope, EnforcementSetting},
    ports::{EnforcementSettingsError, EnforcementSettingsRepository, EnforcementSettingsResult},
};

/// Thread-safe in-memory enforcement settings repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEnforcementSettings {
    settings: Arc<RwLock<HashMap<(EnforcementScope, EnforcementPolicy), EnforcementMode>>>,
}

impl InMemoryEnforcementSettings {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> EnforcementSettingsError {
    EnforcementSettingsError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl EnforcementSettingsRepository for InMemoryEnforcementSettings {
    async fn find_mode(
        &self,
        scope: EnforcementScope,
        policy: EnforcementPolicy,
    ) -> EnforcementSettingsResult<Option<EnforcementMode>> {
        let settings = self.settings.read().map_err(lock_error)?;
        Ok(settings.get(&(scope, policy)).copied())
    }

    async fn upsert(&self, setting: EnforcementSetting) -> EnforcementSettingsResult<()> {
        let mut settings = self.settings.write().map_err(lock_error)?;
        settings.insert((setting.scope, setting.policy), setting.mode);
        Ok(())
    }

    async fn remove(
        &self,
        scope: EnforcementScope,
        policy: EnforcementPolicy,
    ) -> EnforcementSettingsResult<bool> {
        let mut settings = self.settings.write().map_err(lock_error)?;
        Ok(settings.remove(&(scope, policy)).is_some())
    }

    async fn list(&self) -> EnforcementSettingsResult<Vec<EnforcementSetting>> {
        let settings = self.settings.read().map_err(lock_error)?;
        Ok(settings
            .iter()
            .map(|(&(scope, policy), &mode)| EnforcementSetting::new(scope, policy, mode))
            .collect())
    }
}
