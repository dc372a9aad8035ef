//! In-memory entity store for the roster and the catalog.
//!
//! # Responsibility
//! - Own the `Student` and `Item` collections for one session.
//! - Enforce key uniqueness on every insert path.
//! - Keep newest-first insertion order for listing.
//!
//! # Invariants
//! - At most one student per `net_id` and one item per `number`.
//! - Removal always goes through the relationship manager first, so deleting
//!   a student never leaves an item pointing at it.
//! - A failed insert or item removal leaves both collections untouched.
//!   Student removal clears links to its `net_id` even when it reports
//!   `NotFound`.

use crate::model::item::{Item, ItemNumber};
use crate::model::student::{NetId, Student};
use crate::relation::RelationshipManager;
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

pub type StoreResult<T> = Result<T, StoreError>;

/// Identity of a record targeted by a store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKey {
    Student(NetId),
    Item(ItemNumber),
}

impl Display for EntityKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Student(net_id) => write!(f, "student `{net_id}`"),
            Self::Item(number) => write!(f, "item `{number}`"),
        }
    }
}

/// Named failure conditions surfaced to the view layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Insert with a key that is already used. Nothing was inserted.
    DuplicateKey(EntityKey),
    /// Mutation on a key that does not exist. Nothing changed.
    NotFound(EntityKey),
    /// Edit with an empty replacement value. Nothing changed.
    BlankField(&'static str),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateKey(key) => write!(f, "{key} already exists"),
            Self::NotFound(key) => write!(f, "{key} not found"),
            Self::BlankField(field) => write!(f, "{field} cannot be blank"),
        }
    }
}

impl Error for StoreError {}

/// Session-owned collections of students and items.
///
/// Both vectors are kept newest-first: inserts go to index 0.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    students: Vec<Student>,
    items: Vec<Item>,
    last_stamp: i64,
}

impl EntityStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from previously persisted collections.
    ///
    /// Collections are expected newest-first. When a key appears more than
    /// once, the first (newest) occurrence is kept.
    pub fn from_parts(students: Vec<Student>, items: Vec<Item>) -> Self {
        let mut store = Self::new();
        for student in students {
            if store.find_student(&student.net_id).is_none() {
                store.last_stamp = store.last_stamp.max(student.timestamp);
                store.students.push(student);
            } else {
                debug!("event=store_load module=store status=skipped reason=duplicate_student");
            }
        }
        for item in items {
            if store.find_item(&item.number).is_none() {
                store.last_stamp = store.last_stamp.max(item.timestamp);
                store.items.push(item);
            } else {
                debug!("event=store_load module=store status=skipped reason=duplicate_item");
            }
        }
        store
    }

    /// Inserts a new student at the front and stamps its `timestamp`.
    ///
    /// # Errors
    /// - `DuplicateKey` when `net_id` is already present.
    pub fn add_student(&mut self, mut candidate: Student) -> StoreResult<&Student> {
        if self.find_student(&candidate.net_id).is_some() {
            return Err(StoreError::DuplicateKey(EntityKey::Student(
                candidate.net_id,
            )));
        }
        candidate.timestamp = self.next_stamp();
        self.students.insert(0, candidate);
        Ok(&self.students[0])
    }

    /// Inserts a new item at the front and stamps its `timestamp`.
    ///
    /// `checked_out_to` is kept as given; callers that need a verified holder
    /// check the roster before calling.
    ///
    /// # Errors
    /// - `DuplicateKey` when `number` is already present.
    pub fn add_item(&mut self, mut candidate: Item) -> StoreResult<&Item> {
        if self.find_item(&candidate.number).is_some() {
            return Err(StoreError::DuplicateKey(EntityKey::Item(candidate.number)));
        }
        candidate.timestamp = self.next_stamp();
        self.items.insert(0, candidate);
        Ok(&self.items[0])
    }

    /// Exact-match lookup by `net_id`.
    pub fn find_student(&self, net_id: &str) -> Option<&Student> {
        self.students.iter().find(|student| student.net_id == net_id)
    }

    /// Exact-match lookup by item `number`.
    pub fn find_item(&self, number: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.number == number)
    }

    /// Unlinks every item held by `net_id`, then removes the student.
    ///
    /// The unlink runs even when no student record exists, so orphaned links
    /// left by import are cleared by deleting their `net_id`.
    ///
    /// # Errors
    /// - `NotFound` when `net_id` has no student record.
    pub fn remove_student(&mut self, net_id: &str) -> StoreResult<Student> {
        RelationshipManager::new(self).on_delete_student(net_id);

        let index = self
            .students
            .iter()
            .position(|student| student.net_id == net_id)
            .ok_or_else(|| StoreError::NotFound(EntityKey::Student(net_id.to_string())))?;
        Ok(self.students.remove(index))
    }

    /// Removes an item.
    ///
    /// # Errors
    /// - `NotFound` when `number` is absent.
    pub fn remove_item(&mut self, number: &str) -> StoreResult<Item> {
        let index = self
            .items
            .iter()
            .position(|item| item.number == number)
            .ok_or_else(|| StoreError::NotFound(EntityKey::Item(number.to_string())))?;

        RelationshipManager::new(self).on_delete_item(number);
        Ok(self.items.remove(index))
    }

    /// Lists students matching `filter`, newest first.
    ///
    /// Matching is a case-insensitive substring test over name, net id and
    /// phone. The filter is not trimmed, so surrounding spaces must match;
    /// only the empty filter returns everyone.
    pub fn list_students(&self, filter: &str) -> Vec<&Student> {
        let needle = normalize_filter(filter);
        self.students
            .iter()
            .filter(|student| student.matches(&needle))
            .collect()
    }

    /// Lists items matching `filter` over name and number, newest first.
    pub fn list_items(&self, filter: &str) -> Vec<&Item> {
        let needle = normalize_filter(filter);
        self.items
            .iter()
            .filter(|item| item.matches(&needle))
            .collect()
    }

    /// All students, newest first.
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// All items, newest first.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn student_count(&self) -> usize {
        self.students.len()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn find_student_mut(&mut self, net_id: &str) -> Option<&mut Student> {
        self.students
            .iter_mut()
            .find(|student| student.net_id == net_id)
    }

    pub(crate) fn find_item_mut(&mut self, number: &str) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| item.number == number)
    }

    pub(crate) fn items_mut(&mut self) -> impl Iterator<Item = &mut Item> {
        self.items.iter_mut()
    }

    // Wall-clock milliseconds, bumped past the previous stamp so insertion
    // order stays recoverable from timestamps alone.
    fn next_stamp(&mut self) -> i64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| {
                i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
            });
        self.last_stamp = now.max(self.last_stamp.saturating_add(1));
        self.last_stamp
    }
}

fn normalize_filter(filter: &str) -> String {
    filter.to_lowercase()
}
