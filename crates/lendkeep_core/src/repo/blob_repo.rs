//! Named blob repository.

use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Blob holding the serialized student roster.
pub const STUDENTS_BLOB: &str = "students";
/// Blob holding the serialized item catalog.
pub const ITEMS_BLOB: &str = "items";

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence failure, tagged with the step and blob it happened on.
#[derive(Debug)]
pub enum RepoError {
    /// The database could not be opened or configured.
    Open {
        mode: &'static str,
        source: rusqlite::Error,
    },
    /// Migration `version` (`name`) failed and was rolled back.
    Migrate {
        version: u32,
        name: &'static str,
        source: rusqlite::Error,
    },
    /// The database was written by a newer build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Reading one named blob failed.
    BlobRead {
        blob: String,
        source: rusqlite::Error,
    },
    /// Writing a snapshot batch failed; nothing from the batch was kept.
    BlobWrite {
        blobs: String,
        source: rusqlite::Error,
    },
    /// A collection could not be serialized into its blob.
    Encode {
        blob: &'static str,
        source: serde_json::Error,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { mode, source } => {
                write!(f, "failed to open {mode} inventory database: {source}")
            }
            Self::Migrate {
                version,
                name,
                source,
            } => write!(f, "schema migration {version} ({name}) failed: {source}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::BlobRead { blob, source } => {
                write!(f, "failed to read `{blob}` snapshot: {source}")
            }
            Self::BlobWrite { blobs, source } => {
                write!(f, "failed to write snapshots [{blobs}]: {source}")
            }
            Self::Encode { blob, source } => {
                write!(f, "failed to encode `{blob}` snapshot: {source}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. }
            | Self::Migrate { source, .. }
            | Self::BlobRead { source, .. }
            | Self::BlobWrite { source, .. } => Some(source),
            Self::Encode { source, .. } => Some(source),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

/// Key-value storage for collection snapshots.
pub trait BlobRepository {
    /// Returns the blob body, or `None` when it was never written.
    fn load_blob(&self, name: &str) -> RepoResult<Option<String>>;
    /// Writes every `(name, body)` pair, replacing existing bodies.
    ///
    /// Either all pairs are written or none are.
    fn save_blobs(&mut self, blobs: &[(&str, String)]) -> RepoResult<()>;
}

/// SQLite-backed blob repository over the `blobs` table.
pub struct SqliteBlobRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteBlobRepository<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl BlobRepository for SqliteBlobRepository<'_> {
    fn load_blob(&self, name: &str) -> RepoResult<Option<String>> {
        self.conn
            .query_row("SELECT body FROM blobs WHERE name = ?1;", [name], |row| {
                row.get::<_, String>(0)
            })
            .optional()
            .map_err(|source| RepoError::BlobRead {
                blob: name.to_string(),
                source,
            })
    }

    fn save_blobs(&mut self, blobs: &[(&str, String)]) -> RepoResult<()> {
        let write_error = |source| RepoError::BlobWrite {
            blobs: blobs
                .iter()
                .map(|(name, _)| *name)
                .collect::<Vec<_>>()
                .join(","),
            source,
        };

        let tx = self.conn.transaction().map_err(write_error)?;
        for (name, body) in blobs {
            tx.execute(
                "INSERT INTO blobs (name, body) VALUES (?1, ?2)
                 ON CONFLICT(name) DO UPDATE SET body = excluded.body;",
                params![name, body],
            )
            .map_err(write_error)?;
        }
        tx.commit().map_err(write_error)?;
        debug!("event=blob_save module=repo status=ok count={}", blobs.len());
        Ok(())
    }
}

/// Volatile repository for sessions that should not touch disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobRepository {
    blobs: std::collections::BTreeMap<String, String>,
}

impl MemoryBlobRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobRepository for MemoryBlobRepository {
    fn load_blob(&self, name: &str) -> RepoResult<Option<String>> {
        Ok(self.blobs.get(name).cloned())
    }

    fn save_blobs(&mut self, blobs: &[(&str, String)]) -> RepoResult<()> {
        for (name, body) in blobs {
            self.blobs.insert((*name).to_string(), body.clone());
        }
        Ok(())
    }
}
