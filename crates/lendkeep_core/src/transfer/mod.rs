//! Bulk import and export of the roster and catalog as delimited text.
//!
//! # Responsibility
//! - Merge external text into an `EntityStore` without duplicating keys.
//! - Serialize both collections into a single downloadable archive.
//!
//! # Invariants
//! - Import never aborts on bad input; malformed and duplicate rows are
//!   counted and skipped.
//! - Export quotes names containing commas but import does not understand
//!   quotes, so names with commas do not survive an export/import cycle.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod export;
pub mod import;

pub use export::{export_archive, items_csv, students_csv, EXPORT_ARCHIVE_FILE_NAME};
pub use import::{import_items, import_students, ImportReport};

/// Header line of the student table, written on export and ignored on import.
pub const STUDENT_HEADER: &str = "Name,NetID,Phone";
/// Header line of the item table, written on export and ignored on import.
pub const ITEM_HEADER: &str = "ItemName,ItemNumber,CheckedOutTo";
pub const STUDENTS_FILE_NAME: &str = "students.csv";
pub const ITEMS_FILE_NAME: &str = "items.csv";

pub type TransferResult<T> = Result<T, TransferError>;

/// Failure while building an export archive.
#[derive(Debug)]
pub enum TransferError {
    Zip(zip::result::ZipError),
    Io(std::io::Error),
}

impl Display for TransferError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Zip(err) => write!(f, "archive error: {err}"),
            Self::Io(err) => write!(f, "archive write error: {err}"),
        }
    }
}

impl Error for TransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Zip(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<zip::result::ZipError> for TransferError {
    fn from(value: zip::result::ZipError) -> Self {
        Self::Zip(value)
    }
}

impl From<std::io::Error> for TransferError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
