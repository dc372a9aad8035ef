//! Lending inventory domain model.
//!
//! # Responsibility
//! - Define the roster (`Student`) and catalog (`Item`) records.
//! - Keep the persisted JSON shape stable across releases.
//!
//! # Invariants
//! - `Student::net_id` and `Item::number` are identity fields and never
//!   change after the record enters a store.
//! - The checkout link lives on the item as a `net_id` string, never as a
//!   reference to a `Student` value.

pub mod item;
pub mod student;
