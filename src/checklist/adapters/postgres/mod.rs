//! `PostgreSQL` adapter for checklist items.

mod models;
mod repository;
mod schema;

pub use repository::PostgresChecklistRepository;
