//! Core domain logic for the lendkeep lending inventory.
//! This crate is the single source of truth for roster/catalog invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod relation;
pub mod repo;
pub mod service;
pub mod store;
pub mod transfer;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::item::{Item, ItemNumber};
pub use model::student::{NetId, Student};
pub use relation::{CheckoutOutcome, RelationshipManager, StudentEdit};
pub use repo::blob_repo::{
    BlobRepository, MemoryBlobRepository, RepoError, RepoResult, SqliteBlobRepository,
};
pub use service::inventory_service::{InventoryService, ServiceError, ServiceResult};
pub use store::{EntityKey, EntityStore, StoreError, StoreResult};
pub use transfer::{ImportReport, TransferError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
