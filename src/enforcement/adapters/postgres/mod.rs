//! `PostgreSQL` adapter for enforcement settings.

mod models;
mod repository;
mod schema;

pub use repository::PostgresEnforcementSettings;
