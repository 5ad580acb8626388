//! String-keyed, string-valued persistent storage.
//!
//! # Responsibility
//! - Define the key-value capability every page-side service depends on.
//! - Provide an in-memory fake and a SQLite-backed implementation.
//!
//! # Invariants
//! - `set` is a whole-value write; readers never see a partial value.
//! - Concurrent writers (two open tabs) resolve as last-writer-wins.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod keys;
mod memory;
mod sqlite;

pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    Encode(serde_json::Error),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "storage backend failed: {err}"),
            Self::Encode(err) => write!(f, "cannot encode stored value: {err}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Key-value capability injected into page-side services.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Flags are stored as `"1"`; any other value reads as unset.
    fn flag(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key)?.as_deref() == Some(keys::FLAG_SET))
    }

    fn set_flag(&self, key: &str) -> StorageResult<()> {
        self.set(key, keys::FLAG_SET)
    }
}
