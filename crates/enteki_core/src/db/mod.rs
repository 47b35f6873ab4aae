//! SQLite file backing the key-value store.
//!
//! # Responsibility
//! - Open the database that holds the `tools` and `records` documents.
//! - Bring its schema up to the `kv_entries` layout this build expects.
//! - Classify SQLite failures by where they happened (open, migration,
//!   entry access) so callers and logs can tell them apart.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - `kv_entries` is only touched through connections returned by
//!   `open_db` / `open_db_in_memory`.
//! - A file from a newer build is reported, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// Opening or configuring the connection failed.
    Connection(rusqlite::Error),
    /// A schema step failed; the migration transaction was rolled back.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// File schema is ahead of this build.
    SchemaTooNew { found: u32, supported: u32 },
    /// Reading or writing one `kv_entries` row failed.
    Entry {
        key: String,
        source: rusqlite::Error,
    },
}

impl DbError {
    /// Stable code for `error_code=` log fields.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Connection(_) => "db_connection_failed",
            Self::Migration { .. } => "db_migration_failed",
            Self::SchemaTooNew { .. } => "schema_too_new",
            Self::Entry { .. } => "kv_entry_failed",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connection(err) => write!(f, "store database unavailable: {err}"),
            Self::Migration { version, source } => {
                write!(f, "store schema migration {version} failed: {source}")
            }
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "store schema version {found} is newer than supported {supported}"
            ),
            Self::Entry { key, source } => {
                write!(f, "store entry `{key}` could not be accessed: {source}")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connection(err) => Some(err),
            Self::Migration { source, .. } | Self::Entry { source, .. } => Some(source),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Connection(value)
    }
}
