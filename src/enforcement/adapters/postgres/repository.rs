//! `PostgreSQL` repository implementation for enforcement settings.

use super::{models::EnforcementSettingRow, schema::enforcement_settings};
use crate::enforcement::{
    domain::{EnforcementMode, EnforcementPolicy, EnforcementScope, EnforcementSetting},
    ports::{EnforcementSettingsError, EnforcementSettingsRepository, EnforcementSettingsResult},
};
use crate::task::adapters::postgres::TaskPgPool;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;

/// `PostgreSQL`-backed enforcement settings repository.
#[derive(Debug, Clone)]
pub struct PostgresEnforcementSettings {
    pool: TaskPgPool,
}

impl PostgresEnforcementSettings {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> EnforcementSettingsResult<T>
    where
        F: FnOnce(&mut PgConnection) -> EnforcementSettingsResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(EnforcementSettingsError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(EnforcementSettingsError::persistence)?
    }
}

#[async_trait]
impl EnforcementSettingsRepository for PostgresEnforcementSettings {
    async fn find_mode(
        &self,
        scope: EnforcementScope,
        policy: EnforcementPolicy,
    ) -> EnforcementSettingsResult<Option<EnforcementMode>> {
        self.run_blocking(move |connection| {
            let stored = enforcement_settings::table
                .filter(enforcement_settings::scope_key.eq(scope.key()))
                .filter(enforcement_settings::policy.eq(policy.as_str()))
                .select(enforcement_settings::mode)
                .first::<String>(connection)
                .optional()
                .map_err(EnforcementSettingsError::persistence)?;
            stored
                .map(|mode| {
                    EnforcementMode::try_from(mode.as_str())
                        .map_err(EnforcementSettingsError::persistence)
                })
                .transpose()
        })
        .await
    }

    async fn upsert(&self, setting: EnforcementSetting) -> EnforcementSettingsResult<()> {
        let row = EnforcementSettingRow {
            scope_key: setting.scope.key(),
            policy: setting.policy.as_str().to_owned(),
            mode: setting.mode.as_str().to_owned(),
            updated_at: chrono::Utc::now(),
        };
        self.run_blocking(move |connection| {
            diesel::insert_into(enforcement_settings::table)
                .values(&row)
                .on_conflict((enforcement_settings::scope_key, enforcement_settings::policy))
                .do_update()
                .set((
                    enforcement_settings::mode.eq(&row.mode),
                    enforcement_settings::updated_at.eq(row.updated_at),
                ))
                .execute(connection)
                .map_err(EnforcementSettingsError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn remove(
        &self,
        scope: EnforcementScope,
        policy: EnforcementPolicy,
    ) -> EnforcementSettingsResult<bool> {
        self.run_blocking(move |connection| {
            let removed = diesel::delete(
                enforcement_settings::table
                    .filter(enforcement_settings::scope_key.eq(scope.key()))
                    .filter(enforcement_settings::policy.eq(policy.as_str())),
            )
            .execute(connection)
            .map_err(EnforcementSettingsError::persistence)?;
            Ok(removed > 0)
        })
        .await
    }

    async fn list(&self) -> EnforcementSettingsResult<Vec<EnforcementSetting>> {
        self.run_blocking(|connection| {
            enforcement_settings::table
                .order((enforcement_settings::scope_key.asc(), enforcement_settings::policy.asc()))
                .select(EnforcementSettingRow::as_select())
                .load::<EnforcementSettingRow>(connection)
                .map_err(EnforcementSettingsError::persistence)?
                .into_iter()
                .map(row_to_setting)
                .collect()
        })
        .await
    }
}

fn row_to_setting(row: EnforcementSettingRow) -> EnforcementSettingsResult<EnforcementSetting> {
    let scope =
        EnforcementScope::from_key(&row.scope_key).map_err(EnforcementSettingsError::persistence)?;
    let policy = EnforcementPolicy::try_from(row.policy.as_str())
        .map_err(EnforcementSettingsError::persistence)?;
    let mode = EnforcementMode::try_from(row.mode.as_str())
        .map_err(EnforcementSettingsError::persistence)?;
    Ok(EnforcementSetting::new(scope, policy, mode))
}
