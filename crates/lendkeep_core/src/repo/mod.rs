//! Persistence contracts and SQLite implementation.
//!
//! # Responsibility
//! - Store whole-collection snapshots under stable names.
//! - Keep SQL details out of the service layer.
//!
//! # Invariants
//! - Saves replace the named blobs entirely; there is no diffing.
//! - A multi-blob save is all-or-nothing.

pub mod blob_repo;
