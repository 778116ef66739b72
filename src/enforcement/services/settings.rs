//! Cached enforcement mode resolution.
//!
//! Lookups resolve a department scope first, then the global scope, then the
//! configured default. Stored lookups (including misses) are cached until
//! the scope is written through this service, invalidated, or reset.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::enforcement::{
    domain::{EnforcementMode, EnforcementPolicy, EnforcementScope, EnforcementSetting},
    ports::{EnforcementSettingsRepository, EnforcementSettingsResult},
};
use crate::task::domain::DepartmentId;

type CacheKey = (EnforcementScope, EnforcementPolicy);

/// Epoch and scope generation observed before a repository read.
type Stamp = (u64, u64);

enum Lookup {
    Hit(Option<EnforcementMode>),
    Miss(Stamp),
}

/// Cached lookups plus the counters that fence out stale fills.
///
/// `invalidate` bumps the scope's generation and `reset` bumps the epoch; a
/// lookup only fills the cache when neither moved while it was reading.
#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<CacheKey, Option<EnforcementMode>>,
    generations: HashMap<EnforcementScope, u64>,
    epoch: u64,
}

impl CacheState {
    fn stamp(&self, scope: EnforcementScope) -> Stamp {
        (
            self.epoch,
            self.generations.get(&scope).copied().unwrap_or_default(),
        )
    }
}

/// Enforcement settings resolver with an explicit cache-invalidation
/// contract.
///
/// Writes made through [`Self::set_mode`] and [`Self::clear_mode`]
/// invalidate the affected scope. Writes made directly against the
/// repository require [`Self::invalidate`] or [`Self::reset`].
#[derive(Debug)]
pub struct CachedEnforcementSettings<E>
where
    E: EnforcementSettingsRepository,
{
    repository: Arc<E>,
    default_mode: EnforcementMode,
    cache: RwLock<CacheState>,
}

impl<E> CachedEnforcementSettings<E>
where
    E: EnforcementSettingsRepository,
{
    /// Creates a resolver falling back to `default_mode`.
    #[must_use]
    pub fn new(repository: Arc<E>, default_mode: EnforcementMode) -> Self {
        Self {
            repository,
            default_mode,
            cache: RwLock::new(CacheState::default()),
        }
    }

    /// Returns the mode used when nothing is stored.
    #[must_use]
    pub const fn default_mode(&self) -> EnforcementMode {
        self.default_mode
    }

    /// Resolves the effective mode for a policy.
    ///
    /// # Errors
    ///
    /// Returns the repository error when a lookup fails.
    pub async fn resolve_mode(
        &self,
        policy: EnforcementPolicy,
        department_id: Option<DepartmentId>,
    ) -> EnforcementSettingsResult<EnforcementMode> {
        if let Some(department) = department_id {
            let scoped = self
                .stored_mode(EnforcementScope::Department(department), policy)
                .await?;
            if let Some(mode) = scoped {
                return Ok(mode);
            }
        }

        let global = self.stored_mode(EnforcementScope::Global, policy).await?;
        Ok(global.unwrap_or(self.default_mode))
    }

    /// Returns the mode stored for exactly this scope, using the cache.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the lookup fails.
    pub async fn stored_mode(
        &self,
        scope: EnforcementScope,
        policy: EnforcementPolicy,
    ) -> EnforcementSettingsResult<Option<EnforcementMode>> {
        let key = (scope, policy);
        let stamp = match self.lookup(key) {
            Lookup::Hit(cached) => return Ok(cached),
            Lookup::Miss(stamp) => stamp,
        };

        let mode = self.repository.find_mode(scope, policy).await?;
        if let Ok(mut cache) = self.cache.write() {
            if cache.stamp(scope) == stamp {
                cache.entries.insert(key, mode);
            } else {
                tracing::debug!(
                    scope = %scope.key(),
                    policy = %policy,
                    "discarding lookup raced by invalidation"
                );
            }
        }
        Ok(mode)
    }

    /// Stores a mode for a scope and invalidates that scope.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the write fails.
    pub async fn set_mode(
        &self,
        scope: EnforcementScope,
        policy: EnforcementPolicy,
        mode: EnforcementMode,
    ) -> EnforcementSettingsResult<()> {
        self.repository
            .upsert(EnforcementSetting::new(scope, policy, mode))
            .await?;
        self.invalidate(scope);
        tracing::info!(
            scope = %scope.key(),
            policy = %policy,
            mode = %mode,
            "enforcement mode updated"
        );
        Ok(())
    }

    /// Removes a stored mode so the scope falls back again.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the delete fails.
    pub async fn clear_mode(
        &self,
        scope: EnforcementScope,
        policy: EnforcementPolicy,
    ) -> EnforcementSettingsResult<bool> {
        let removed = self.repository.remove(scope, policy).await?;
        self.invalidate(scope);
        Ok(removed)
    }

    /// Lists every stored setting, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the lookup fails.
    pub async fn list(&self) -> EnforcementSettingsResult<Vec<EnforcementSetting>> {
        self.repository.list().await
    }

    /// Drops cached entries for one scope.
    pub fn invalidate(&self, scope: EnforcementScope) {
        if let Ok(mut cache) = self.cache.write() {
            cache
                .entries
                .retain(|(cached_scope, _), _| *cached_scope != scope);
            let generation = cache.generations.entry(scope).or_default();
            *generation = generation.wrapping_add(1);
        }
    }

    /// Drops every cached entry.
    pub fn reset(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.entries.clear();
            cache.epoch = cache.epoch.wrapping_add(1);
        }
    }

    /// Returns the number of cached lookups.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache
            .read()
            .map(|cache| cache.entries.len())
            .unwrap_or_default()
    }

    fn lookup(&self, key: CacheKey) -> Lookup {
        let Ok(cache) = self.cache.read() else {
            return Lookup::Miss(Stamp::default());
        };
        cache
            .entries
            .get(&key)
            .copied()
            .map_or_else(|| Lookup::Miss(cache.stamp(key.0)), Lookup::Hit)
    }
}
