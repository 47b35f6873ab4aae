//! Persistence boundary for session state.
//!
//! # Responsibility
//! - Define the synchronous string-keyed store the session writes through.
//! - Provide in-memory and SQLite-backed store implementations.
//! - Encode/decode the `tools` and `records` documents.
//!
//! # Invariants
//! - Exactly two keys are used: `TOOLS_KEY` and `RECORDS_KEY`.
//! - Corrupt or missing documents decode to empty defaults, never to errors.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
pub mod snapshot;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteKeyValueStore;

/// Storage key for the equipment list document.
pub const TOOLS_KEY: &str = "tools";
/// Storage key for the records document.
pub const RECORDS_KEY: &str = "records";

pub type StoreResult<T> = Result<T, StoreError>;

/// Key-value store failures.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Backend-specific failure described as text.
    Backend(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Backend(message) => write!(f, "store backend failure: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Backend(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Synchronous string-keyed document store.
pub trait KeyValueStore {
    /// Reads the value stored under `key`.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    /// Replaces the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }
}
