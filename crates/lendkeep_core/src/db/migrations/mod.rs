//! Ordered schema migrations for the snapshot store.
//!
//! # Invariants
//! - `version` values are strictly increasing; the on-disk version lives in
//!   `PRAGMA user_version`.
//! - Each migration commits together with its version bump, so a failure
//!   leaves the database at the last fully applied version.
//! - A database newer than this build is refused, never downgraded.

use crate::repo::blob_repo::{RepoError, RepoResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "snapshot_blobs",
    sql: include_str!("0001_blobs.sql"),
}];

/// Returns the latest schema version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings `conn` up to `latest_version()`.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer build.
/// - `Migrate` naming the first migration that failed.
pub fn apply_migrations(conn: &mut Connection) -> RepoResult<()> {
    let on_disk = conn
        .query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))
        .map_err(|source| RepoError::Migrate {
            version: 0,
            name: "read_user_version",
            source,
        })?;
    let latest = latest_version();
    if on_disk > latest {
        return Err(RepoError::UnsupportedSchemaVersion {
            db_version: on_disk,
            latest_supported: latest,
        });
    }

    for migration in MIGRATIONS.iter().filter(|m| m.version > on_disk) {
        run_migration(conn, migration).map_err(|source| RepoError::Migrate {
            version: migration.version,
            name: migration.name,
            source,
        })?;
        info!(
            "event=db_migrate module=db status=ok version={} name={}",
            migration.version, migration.name
        );
    }
    Ok(())
}

fn run_migration(conn: &mut Connection, migration: &Migration) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(migration.sql)?;
    tx.pragma_update(None, "user_version", migration.version)?;
    tx.commit()
}
