//! Student roster record.

use serde::{Deserialize, Serialize};

/// Unique, case-sensitive student identifier.
pub type NetId = String;

/// One person who can borrow items.
///
/// Serialized with the `netId` field name so roster blobs written by older
/// builds load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Display name. Not validated for format.
    pub name: String,
    /// Identity key. Immutable once stored.
    pub net_id: NetId,
    /// Free-text phone number.
    pub phone: String,
    /// Unix epoch milliseconds at insertion. Display/ordering only.
    #[serde(default)]
    pub timestamp: i64,
}

impl Student {
    /// Creates an unstamped candidate; the store assigns `timestamp` on insert.
    pub fn new(
        name: impl Into<String>,
        net_id: impl Into<NetId>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            net_id: net_id.into(),
            phone: phone.into(),
            timestamp: 0,
        }
    }

    /// Case-insensitive substring match over name, net id and phone.
    ///
    /// `needle` must already be lowercased.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.name.to_lowercase().contains(needle)
            || self.net_id.to_lowercase().contains(needle)
            || self.phone.to_lowercase().contains(needle)
    }
}

#[cfg(test)]
mod tests {
    use super::Student;

    #[test]
    fn serializes_with_camel_case_wire_names() {
        let student = Student::new("Ann Lee", "alee1", "555-0100");
        let json = serde_json::to_value(&student).unwrap();
        assert_eq!(json["netId"], "alee1");
        assert!(json.get("net_id").is_none());
    }

    #[test]
    fn missing_timestamp_defaults_to_zero() {
        let student: Student =
            serde_json::from_str(r#"{"name":"Bob","netId":"bob1","phone":"1"}"#).unwrap();
        assert_eq!(student.timestamp, 0);
    }

    #[test]
    fn matches_is_case_insensitive() {
        let student = Student::new("Ann Lee", "ALEE1", "555-0100");
        assert!(student.matches("alee"));
        assert!(student.matches("ann"));
        assert!(student.matches("0100"));
        assert!(!student.matches("bob"));
    }
}
