//! Checkout link rules between items and students.
//!
//! # Responsibility
//! - Create, overwrite and clear the single `Item -> Student` checkout link.
//! - Cascade student deletion into item unlinking.
//! - Answer derived relationship queries (held items, holder, orphans).
//!
//! # Invariants
//! - An item has at most one holder.
//! - A link written through this module always names an existing student.
//! - Edits never reach `net_id`, `number` or `checked_out_to`.
//! - Derived views are recomputed on every call; nothing is cached.

use crate::model::item::Item;
use crate::model::student::{NetId, Student};
use crate::store::{EntityKey, EntityStore, StoreError, StoreResult};
use log::{debug, info};

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// The item was available and is now linked.
    Linked,
    /// The item was already held; the link was overwritten.
    Reassigned { previous: NetId },
}

/// Replacement display fields for a student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentEdit {
    pub name: String,
    pub phone: String,
}

/// Mutating view over an `EntityStore` that owns the link rules.
pub struct RelationshipManager<'s> {
    store: &'s mut EntityStore,
}

impl<'s> RelationshipManager<'s> {
    pub fn new(store: &'s mut EntityStore) -> Self {
        Self { store }
    }

    /// Links `item_number` to `net_id`.
    ///
    /// Re-checking out a held item overwrites the holder; the previous holder
    /// is reported through `CheckoutOutcome::Reassigned`.
    ///
    /// # Errors
    /// - `NotFound(Student)` when `net_id` is not on the roster.
    /// - `NotFound(Item)` when `item_number` is absent.
    pub fn checkout(&mut self, item_number: &str, net_id: &str) -> StoreResult<CheckoutOutcome> {
        if self.store.find_student(net_id).is_none() {
            return Err(StoreError::NotFound(EntityKey::Student(net_id.to_string())));
        }
        let item = self
            .store
            .find_item_mut(item_number)
            .ok_or_else(|| StoreError::NotFound(EntityKey::Item(item_number.to_string())))?;

        let outcome = match item.checked_out_to.replace(net_id.to_string()) {
            Some(previous) if previous != net_id => {
                info!("event=checkout module=relation status=reassigned");
                CheckoutOutcome::Reassigned { previous }
            }
            _ => {
                info!("event=checkout module=relation status=ok");
                CheckoutOutcome::Linked
            }
        };
        Ok(outcome)
    }

    /// Clears the link on `item_number` and returns the previous holder.
    ///
    /// Returning an available item succeeds with `None`.
    ///
    /// # Errors
    /// - `NotFound(Item)` when `item_number` is absent.
    pub fn return_item(&mut self, item_number: &str) -> StoreResult<Option<NetId>> {
        let item = self
            .store
            .find_item_mut(item_number)
            .ok_or_else(|| StoreError::NotFound(EntityKey::Item(item_number.to_string())))?;
        let previous = item.checked_out_to.take();
        info!(
            "event=return module=relation status=ok was_linked={}",
            previous.is_some()
        );
        Ok(previous)
    }

    /// Unlinks every item held by `net_id`. Returns the number of items freed.
    ///
    /// Called by `EntityStore::remove_student` before the record is dropped.
    pub fn on_delete_student(&mut self, net_id: &str) -> usize {
        let mut unlinked = 0;
        for item in self.store.items_mut() {
            if item.is_held_by(net_id) {
                item.checked_out_to = None;
                unlinked += 1;
            }
        }
        info!("event=student_unlink module=relation status=ok unlinked={unlinked}");
        unlinked
    }

    /// Item removal needs no cascade: nothing stores a link to an item.
    pub fn on_delete_item(&mut self, _number: &str) {
        debug!("event=item_unlink module=relation status=noop");
    }

    /// Replaces a student's name and phone.
    ///
    /// # Errors
    /// - `BlankField` when either value is blank; nothing changes.
    /// - `NotFound(Student)` when `net_id` is absent.
    pub fn edit_student(&mut self, net_id: &str, edit: StudentEdit) -> StoreResult<()> {
        if edit.name.trim().is_empty() {
            return Err(StoreError::BlankField("name"));
        }
        if edit.phone.trim().is_empty() {
            return Err(StoreError::BlankField("phone"));
        }
        let student = self
            .store
            .find_student_mut(net_id)
            .ok_or_else(|| StoreError::NotFound(EntityKey::Student(net_id.to_string())))?;
        student.name = edit.name;
        student.phone = edit.phone;
        Ok(())
    }

    /// Replaces an item's display name.
    ///
    /// # Errors
    /// - `BlankField` when `name` is blank.
    /// - `NotFound(Item)` when `number` is absent.
    pub fn edit_item(&mut self, number: &str, name: String) -> StoreResult<()> {
        if name.trim().is_empty() {
            return Err(StoreError::BlankField("name"));
        }
        let item = self
            .store
            .find_item_mut(number)
            .ok_or_else(|| StoreError::NotFound(EntityKey::Item(number.to_string())))?;
        item.name = name;
        Ok(())
    }
}

/// Items currently linked to `net_id`, newest first.
pub fn items_held_by<'a>(store: &'a EntityStore, net_id: &str) -> Vec<&'a Item> {
    store
        .items()
        .iter()
        .filter(|item| item.is_held_by(net_id))
        .collect()
}

/// Resolves the holder of `item_number`.
///
/// `None` when the item is absent, available, or linked to a student that no
/// longer exists.
pub fn holder_of<'a>(store: &'a EntityStore, item_number: &str) -> Option<&'a Student> {
    let net_id = store.find_item(item_number)?.checked_out_to.as_deref()?;
    store.find_student(net_id)
}

/// Available items matching the item list filter, newest first.
pub fn available_items<'a>(store: &'a EntityStore, filter: &str) -> Vec<&'a Item> {
    store
        .list_items(filter)
        .into_iter()
        .filter(|item| item.is_available())
        .collect()
}

/// Items linked to a `net_id` with no student record.
pub fn orphaned_items(store: &EntityStore) -> Vec<&Item> {
    store
        .items()
        .iter()
        .filter(|item| {
            item.checked_out_to
                .as_deref()
                .is_some_and(|net_id| store.find_student(net_id).is_none())
        })
        .collect()
}
