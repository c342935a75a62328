//! Persistent key-value storage contracts.
//!
//! # Responsibility
//! - Define the minimal string key-value API the persistence adapter needs.
//! - Provide SQLite-backed and in-memory implementations.
//!
//! # Invariants
//! - `set_item` replaces the whole value for a key atomically.
//! - `get_item` on a missing key is `Ok(None)`, never an error.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub mod memory;
pub mod sqlite_kv;

pub type StorageResult<T> = Result<T, StorageError>;

/// Key-value backend failure.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// A previous writer panicked while holding the backend lock.
    Poisoned,
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Poisoned => write!(f, "storage lock poisoned"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Poisoned => None,
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

/// String key-value store with whole-value writes.
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for &S {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        (**self).remove_item(key)
    }
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Arc<S> {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        (**self).remove_item(key)
    }
}
