//! Delimited-text import for students and items.
//!
//! Format rules:
//! - Line 0 is a header and is always discarded, whatever it contains.
//! - Each other line is trimmed; blank lines are skipped.
//! - Lines are split on every `,`. Quotes are not parsed; `"` characters are
//!   stripped from the name column only.
//! - Students need 3 columns (`name,net_id,phone`), items need 2
//!   (`name,number[,checked_out_to]`). Shorter lines are malformed.
//! - Extra columns are ignored.

use crate::model::item::Item;
use crate::model::student::Student;
use crate::store::EntityStore;
use log::info;

const STUDENT_MIN_COLUMNS: usize = 3;
const ITEM_MIN_COLUMNS: usize = 2;

/// Outcome of one import pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Records inserted into the store.
    pub added: usize,
    /// Records skipped because their key was already present.
    pub duplicates: usize,
    /// Non-blank lines skipped for having too few columns.
    pub malformed: usize,
}

/// Merges student rows from `text` into `store`.
///
/// A row is inserted only if no student (including one added earlier in the
/// same pass) has its `net_id`; the first occurrence wins.
pub fn import_students(store: &mut EntityStore, text: &str) -> ImportReport {
    let mut report = ImportReport::default();
    for columns in data_rows(text) {
        if columns.len() < STUDENT_MIN_COLUMNS {
            report.malformed += 1;
            continue;
        }
        let candidate = Student::new(clean_name(columns[0]), columns[1].trim(), columns[2].trim());
        match store.add_student(candidate) {
            Ok(_) => report.added += 1,
            Err(_) => report.duplicates += 1,
        }
    }
    log_report("students", &report);
    report
}

/// Merges item rows from `text` into `store`.
///
/// The optional third column becomes `checked_out_to`; an empty value means
/// available. The holder is not checked against the roster, so import can
/// introduce orphaned links.
pub fn import_items(store: &mut EntityStore, text: &str) -> ImportReport {
    let mut report = ImportReport::default();
    for columns in data_rows(text) {
        if columns.len() < ITEM_MIN_COLUMNS {
            report.malformed += 1;
            continue;
        }
        let mut candidate = Item::new(clean_name(columns[0]), columns[1].trim());
        candidate.checked_out_to = columns
            .get(2)
            .map(|holder| holder.trim())
            .filter(|holder| !holder.is_empty())
            .map(str::to_string);
        match store.add_item(candidate) {
            Ok(_) => report.added += 1,
            Err(_) => report.duplicates += 1,
        }
    }
    log_report("items", &report);
    report
}

fn data_rows(text: &str) -> impl Iterator<Item = Vec<&str>> {
    text.split('\n')
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.split(',').collect())
}

fn clean_name(raw: &str) -> String {
    raw.trim().replace('"', "")
}

fn log_report(kind: &str, report: &ImportReport) {
    info!(
        "event=import module=transfer status=ok kind={kind} added={} duplicates={} malformed={}",
        report.added, report.duplicates, report.malformed
    );
}
