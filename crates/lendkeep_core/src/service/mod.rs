//! Core use-case services.
//!
//! # Responsibility
//! - Expose the entry points the view layer calls.
//! - Persist both collections after every successful mutation.

pub mod inventory_service;
