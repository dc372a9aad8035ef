//! Two-table export bundled as a zip archive.

use super::{
    TransferResult, ITEMS_FILE_NAME, ITEM_HEADER, STUDENTS_FILE_NAME, STUDENT_HEADER,
};
use crate::store::EntityStore;
use log::info;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Suggested download name for the archive produced by `export_archive`.
pub const EXPORT_ARCHIVE_FILE_NAME: &str = "MathLab_Inventory_Backup.zip";

/// Renders the roster as `Name,NetID,Phone` rows, newest first.
pub fn students_csv(store: &EntityStore) -> String {
    let mut out = format!("{STUDENT_HEADER}\n");
    for student in store.students() {
        out.push_str(&format!(
            "{},{},{}\n",
            quote_name(&student.name),
            student.net_id,
            student.phone
        ));
    }
    out
}

/// Renders the catalog as `ItemName,ItemNumber,CheckedOutTo` rows.
///
/// Available items get an empty last column.
pub fn items_csv(store: &EntityStore) -> String {
    let mut out = format!("{ITEM_HEADER}\n");
    for item in store.items() {
        out.push_str(&format!(
            "{},{},{}\n",
            quote_name(&item.name),
            item.number,
            item.checked_out_to.as_deref().unwrap_or_default()
        ));
    }
    out
}

/// Bundles `students.csv` and `items.csv` into one deflated zip archive.
pub fn export_archive(store: &EntityStore) -> TransferResult<Vec<u8>> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    writer.start_file(STUDENTS_FILE_NAME, options)?;
    writer.write_all(students_csv(store).as_bytes())?;
    writer.start_file(ITEMS_FILE_NAME, options)?;
    writer.write_all(items_csv(store).as_bytes())?;

    let bytes = writer.finish()?.into_inner();
    info!(
        "event=export module=transfer status=ok students={} items={} bytes={}",
        store.student_count(),
        store.item_count(),
        bytes.len()
    );
    Ok(bytes)
}

// Names with a comma are wrapped in quotes. Embedded quotes are not escaped
// and other columns are written raw.
fn quote_name(name: &str) -> String {
    if name.contains(',') {
        format!("\"{name}\"")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::quote_name;

    #[test]
    fn only_names_with_commas_are_quoted() {
        assert_eq!(quote_name("Lee, Ann"), "\"Lee, Ann\"");
        assert_eq!(quote_name("Ann \"A\" Lee"), "Ann \"A\" Lee");
    }
}
