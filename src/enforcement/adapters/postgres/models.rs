//! Diesel row models for enforcement settings.

use super::schema::enforcement_settings;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Stored enforcement setting, used for reads and upserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = enforcement_settings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EnforcementSettingRow {
    /// Scope key.
    pub scope_key: String,
    /// Policy name.
    pub policy: String,
    /// Mode name.
    pub mode: String,
    /// Last write timestamp.
    pub updated_at: DateTime<Utc>,
}
