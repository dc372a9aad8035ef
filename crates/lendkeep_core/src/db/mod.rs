//! SQLite bootstrap for the inventory database.
//!
//! # Responsibility
//! - Open the connection that backs `SqliteBlobRepository`.
//! - Bring its schema up to date before any snapshot is read or written.
//!
//! Failures are reported as `RepoError::Open`, `RepoError::Migrate` or
//! `RepoError::UnsupportedSchemaVersion`.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
