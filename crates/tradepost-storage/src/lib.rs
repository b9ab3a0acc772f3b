// Postgres storage layer with sqlx
//
// This crate provides the persistence implementation of the user directory:
// - Database: PgPool wrapper implementing UserDirectory
// - UserDirectory: the single capability boundary consumed by the auth core

pub mod directory;
pub mod models;
pub mod repositories;

pub use directory::{StoreError, UserDirectory};
pub use models::*;
pub use repositories::Database;
