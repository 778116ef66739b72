//! `PostgreSQL` adapters for the append-only history tables.

mod models;
mod repository;
mod schema;

pub(crate) use repository::insert_status_entry;
pub use repository::{PostgresChecklistHistory, PostgresStatusHistory};
