//! Lendable item record.

use super::student::NetId;
use serde::{Deserialize, Serialize};

/// Unique item identifier.
pub type ItemNumber = String;

/// One lendable asset.
///
/// # Invariants
/// - `checked_out_to == None` means the item is available.
/// - When set, `checked_out_to` names a student `net_id`; import may leave
///   it pointing at a student that does not exist (an orphan).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Display name.
    pub name: String,
    /// Identity key. Immutable once stored.
    pub number: ItemNumber,
    /// Holder `net_id`, serialized as `null` when available.
    #[serde(default)]
    pub checked_out_to: Option<NetId>,
    /// Unix epoch milliseconds at insertion.
    #[serde(default)]
    pub timestamp: i64,
}

impl Item {
    /// Creates an available, unstamped candidate.
    pub fn new(name: impl Into<String>, number: impl Into<ItemNumber>) -> Self {
        Self {
            name: name.into(),
            number: number.into(),
            checked_out_to: None,
            timestamp: 0,
        }
    }

    /// Creates a candidate that is already checked out to `net_id`.
    pub fn checked_out(
        name: impl Into<String>,
        number: impl Into<ItemNumber>,
        net_id: impl Into<NetId>,
    ) -> Self {
        Self {
            checked_out_to: Some(net_id.into()),
            ..Self::new(name, number)
        }
    }

    /// Returns whether nobody holds this item.
    pub fn is_available(&self) -> bool {
        self.checked_out_to.is_none()
    }

    /// Returns whether `net_id` holds this item.
    pub fn is_held_by(&self, net_id: &str) -> bool {
        self.checked_out_to.as_deref() == Some(net_id)
    }

    /// Case-insensitive substring match over name and number.
    ///
    /// `needle` must already be lowercased.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.name.to_lowercase().contains(needle)
            || self.number.to_lowercase().contains(needle)
    }
}
