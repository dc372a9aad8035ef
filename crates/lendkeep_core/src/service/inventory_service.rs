//! Inventory use-case service.
//!
//! # Responsibility
//! - Own the session `EntityStore` and its persistence repository.
//! - Route mutations through the store and relationship rules, then save.
//! - Load persisted snapshots fail-open: unreadable data becomes empty.
//!
//! # Invariants
//! - A rejected command (duplicate, not found, blank field) changes nothing
//!   and writes nothing, except that deleting an unknown `net_id` still
//!   clears and saves any orphaned links to it.
//! - Saves always write both collections together.

use crate::model::item::Item;
use crate::model::student::{NetId, Student};
use crate::relation::{self, CheckoutOutcome, RelationshipManager, StudentEdit};
use crate::repo::blob_repo::{BlobRepository, RepoError, ITEMS_BLOB, STUDENTS_BLOB};
use crate::store::{EntityKey, EntityStore, StoreError};
use crate::transfer::{self, ImportReport, TransferError};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure surfaced by an inventory command.
#[derive(Debug)]
pub enum ServiceError {
    /// The command was rejected by store or relationship rules.
    Store(StoreError),
    /// The command applied in memory but the snapshot write failed.
    Repo(RepoError),
    /// The export archive could not be built.
    Transfer(TransferError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "failed to save inventory: {err}"),
            Self::Transfer(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Transfer(err) => Some(err),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<TransferError> for ServiceError {
    fn from(value: TransferError) -> Self {
        Self::Transfer(value)
    }
}

/// Session facade over one store and its persistence.
pub struct InventoryService<R: BlobRepository> {
    repo: R,
    store: EntityStore,
}

impl<R: BlobRepository> InventoryService<R> {
    /// Loads both snapshots from `repo` and starts a session.
    ///
    /// Missing, unreadable or corrupt snapshots load as empty collections.
    pub fn open(repo: R) -> Self {
        let students: Vec<Student> = load_snapshot(&repo, STUDENTS_BLOB);
        let items: Vec<Item> = load_snapshot(&repo, ITEMS_BLOB);
        let store = EntityStore::from_parts(students, items);
        info!(
            "event=inventory_open module=service status=ok students={} items={}",
            store.student_count(),
            store.item_count()
        );
        Self { repo, store }
    }

    /// Read access to the session store.
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn find_student(&self, net_id: &str) -> Option<&Student> {
        self.store.find_student(net_id)
    }

    pub fn find_item(&self, number: &str) -> Option<&Item> {
        self.store.find_item(number)
    }

    pub fn list_students(&self, filter: &str) -> Vec<&Student> {
        self.store.list_students(filter)
    }

    pub fn list_items(&self, filter: &str) -> Vec<&Item> {
        self.store.list_items(filter)
    }

    pub fn items_held_by(&self, net_id: &str) -> Vec<&Item> {
        relation::items_held_by(&self.store, net_id)
    }

    pub fn holder_of(&self, item_number: &str) -> Option<&Student> {
        relation::holder_of(&self.store, item_number)
    }

    pub fn available_items(&self, filter: &str) -> Vec<&Item> {
        relation::available_items(&self.store, filter)
    }

    pub fn orphaned_items(&self) -> Vec<&Item> {
        relation::orphaned_items(&self.store)
    }

    /// Adds a student and returns the stored record.
    pub fn add_student(
        &mut self,
        name: impl Into<String>,
        net_id: impl Into<NetId>,
        phone: impl Into<String>,
    ) -> ServiceResult<Student> {
        let student = self
            .store
            .add_student(Student::new(name, net_id, phone))
            .map_err(|err| rejected("student_add", err))?
            .clone();
        self.persist("student_add")?;
        Ok(student)
    }

    /// Adds an available item and returns the stored record.
    pub fn add_item(
        &mut self,
        name: impl Into<String>,
        number: impl Into<String>,
    ) -> ServiceResult<Item> {
        self.insert_item(Item::new(name, number), "item_add")
    }

    /// Adds an item already checked out to an existing student.
    ///
    /// # Errors
    /// - `NotFound(Student)` when `net_id` is not on the roster.
    /// - `DuplicateKey(Item)` when `number` is taken.
    pub fn quick_add_item(
        &mut self,
        name: impl Into<String>,
        number: impl Into<String>,
        net_id: &str,
    ) -> ServiceResult<Item> {
        if self.store.find_student(net_id).is_none() {
            return Err(rejected(
                "item_quick_add",
                StoreError::NotFound(EntityKey::Student(net_id.to_string())),
            ));
        }
        self.insert_item(Item::checked_out(name, number, net_id), "item_quick_add")
    }

    pub fn edit_student(&mut self, net_id: &str, edit: StudentEdit) -> ServiceResult<()> {
        RelationshipManager::new(&mut self.store)
            .edit_student(net_id, edit)
            .map_err(|err| rejected("student_edit", err))?;
        self.persist("student_edit")
    }

    pub fn edit_item(&mut self, number: &str, name: impl Into<String>) -> ServiceResult<()> {
        RelationshipManager::new(&mut self.store)
            .edit_item(number, name.into())
            .map_err(|err| rejected("item_edit", err))?;
        self.persist("item_edit")
    }

    /// Deletes a student, returning every item linked to `net_id` first.
    ///
    /// Links are cleared even when no student record exists (orphans from
    /// import); that cleanup is saved before `NotFound` is reported.
    pub fn delete_student(&mut self, net_id: &str) -> ServiceResult<Student> {
        let linked = relation::items_held_by(&self.store, net_id).len();
        match self.store.remove_student(net_id) {
            Ok(removed) => {
                self.persist("student_delete")?;
                Ok(removed)
            }
            Err(err) => {
                if linked > 0 {
                    self.persist("orphan_unlink")?;
                }
                Err(rejected("student_delete", err))
            }
        }
    }

    pub fn delete_item(&mut self, number: &str) -> ServiceResult<Item> {
        let removed = self
            .store
            .remove_item(number)
            .map_err(|err| rejected("item_delete", err))?;
        self.persist("item_delete")?;
        Ok(removed)
    }

    pub fn checkout(&mut self, item_number: &str, net_id: &str) -> ServiceResult<CheckoutOutcome> {
        let outcome = RelationshipManager::new(&mut self.store)
            .checkout(item_number, net_id)
            .map_err(|err| rejected("checkout", err))?;
        self.persist("checkout")?;
        Ok(outcome)
    }

    pub fn return_item(&mut self, item_number: &str) -> ServiceResult<Option<NetId>> {
        let previous = RelationshipManager::new(&mut self.store)
            .return_item(item_number)
            .map_err(|err| rejected("return", err))?;
        self.persist("return")?;
        Ok(previous)
    }

    /// Merges student rows, then saves once for the whole batch.
    pub fn import_students(&mut self, text: &str) -> ServiceResult<ImportReport> {
        let report = transfer::import_students(&mut self.store, text);
        self.persist("import_students")?;
        Ok(report)
    }

    /// Merges item rows, then saves once for the whole batch.
    pub fn import_items(&mut self, text: &str) -> ServiceResult<ImportReport> {
        let report = transfer::import_items(&mut self.store, text);
        self.persist("import_items")?;
        Ok(report)
    }

    /// Builds the two-table zip archive. Nothing is persisted.
    pub fn export_archive(&self) -> ServiceResult<Vec<u8>> {
        Ok(transfer::export_archive(&self.store)?)
    }

    fn insert_item(&mut self, candidate: Item, event: &'static str) -> ServiceResult<Item> {
        let item = self
            .store
            .add_item(candidate)
            .map_err(|err| rejected(event, err))?
            .clone();
        self.persist(event)?;
        Ok(item)
    }

    fn persist(&mut self, event: &'static str) -> ServiceResult<()> {
        let students = encode(STUDENTS_BLOB, self.store.students())?;
        let items = encode(ITEMS_BLOB, self.store.items())?;
        if let Err(err) = self
            .repo
            .save_blobs(&[(STUDENTS_BLOB, students), (ITEMS_BLOB, items)])
        {
            warn!("event={event} module=service status=error error_code=save_failed error={err}");
            return Err(err.into());
        }
        info!("event={event} module=service status=ok");
        Ok(())
    }
}

fn rejected(event: &'static str, err: StoreError) -> ServiceError {
    let reason = match &err {
        StoreError::DuplicateKey(_) => "duplicate_key",
        StoreError::NotFound(_) => "not_found",
        StoreError::BlankField(_) => "blank_field",
    };
    info!("event={event} module=service status=rejected reason={reason}");
    ServiceError::Store(err)
}

fn encode<T: Serialize>(blob: &'static str, records: &[T]) -> Result<String, RepoError> {
    serde_json::to_string(records).map_err(|source| RepoError::Encode { blob, source })
}

fn load_snapshot<T: DeserializeOwned>(repo: &impl BlobRepository, name: &str) -> Vec<T> {
    let body = match repo.load_blob(name) {
        Ok(Some(body)) => body,
        Ok(None) => return Vec::new(),
        Err(err) => {
            warn!("event=snapshot_load module=service status=error blob={name} error_code=read_failed error={err}");
            return Vec::new();
        }
    };
    serde_json::from_str(&body).unwrap_or_else(|err| {
        warn!("event=snapshot_load module=service status=error blob={name} error_code=corrupt error={err}");
        Vec::new()
    })
}
