//! `PostgreSQL` adapters for dependency persistence.

mod models;
mod repository;
mod schema;

pub use repository::PostgresDependencyRepository;
