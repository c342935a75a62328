//! Lists persistence adapter.
//!
//! # Responsibility
//! - Serialize the complete list sequence as one JSON document under a fixed
//!   key and read it back.
//!
//! # Invariants
//! - Writes always replace the whole blob; there are no partial writes.
//! - `save_lists` never reports failure to its caller; failures are logged.
//! - A missing key reads as an empty sequence.
//! - The blob carries no schema version.

use crate::model::task_list::TaskList;
use crate::storage::{KeyValueStorage, StorageError};
use log::{debug, error, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key holding the serialized lists.
pub const LISTS_STORAGE_KEY: &str = "task-app:lists";

pub type RepoResult<T> = Result<T, RepoError>;

/// Failure while reading or writing the lists blob.
#[derive(Debug)]
pub enum RepoError {
    Storage(StorageError),
    /// Blob exists but is not a valid list sequence.
    Malformed(serde_json::Error),
    Serialize(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "storage error: {err}"),
            Self::Malformed(err) => write!(f, "persisted lists are malformed: {err}"),
            Self::Serialize(err) => write!(f, "failed to serialize lists: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Malformed(err) | Self::Serialize(err) => Some(err),
        }
    }
}

impl From<StorageError> for RepoError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Whole-blob persistence contract used by the store.
pub trait ListRepository {
    /// Writes `lists` under the fixed key, logging and swallowing failures.
    fn save_lists(&self, lists: &[TaskList]);

    /// Reads the persisted lists, surfacing storage and parse errors.
    ///
    /// A missing key is `Ok(vec![])`.
    fn try_load_lists(&self) -> RepoResult<Vec<TaskList>>;

    /// Reads the persisted lists, falling back to an empty sequence on any
    /// failure.
    fn load_lists(&self) -> Vec<TaskList> {
        match self.try_load_lists() {
            Ok(lists) => lists,
            Err(err) => {
                warn!(
                    "event=lists_load module=repo status=error fallback=empty error={}",
                    err
                );
                Vec::new()
            }
        }
    }
}

/// Adapter storing the lists blob in any [`KeyValueStorage`].
pub struct KvListRepository<S: KeyValueStorage> {
    storage: S,
}

impl<S: KeyValueStorage> KvListRepository<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Fallible write; [`ListRepository::save_lists`] wraps this.
    pub fn try_save_lists(&self, lists: &[TaskList]) -> RepoResult<()> {
        let blob = serde_json::to_string(lists).map_err(RepoError::Serialize)?;
        self.storage.set_item(LISTS_STORAGE_KEY, &blob)?;
        Ok(())
    }

    /// Deletes the persisted blob.
    pub fn clear(&self) -> RepoResult<()> {
        self.storage.remove_item(LISTS_STORAGE_KEY)?;
        Ok(())
    }
}

impl<S: KeyValueStorage> ListRepository for KvListRepository<S> {
    fn save_lists(&self, lists: &[TaskList]) {
        match self.try_save_lists(lists) {
            Ok(()) => debug!(
                "event=lists_save module=repo status=ok list_count={}",
                lists.len()
            ),
            Err(err) => error!(
                "event=lists_save module=repo status=error list_count={} error={}",
                lists.len(),
                err
            ),
        }
    }

    fn try_load_lists(&self) -> RepoResult<Vec<TaskList>> {
        let Some(blob) = self.storage.get_item(LISTS_STORAGE_KEY)? else {
            return Ok(Vec::new());
        };
        let lists: Vec<TaskList> = serde_json::from_str(&blob).map_err(RepoError::Malformed)?;
        debug!(
            "event=lists_load module=repo status=ok list_count={}",
            lists.len()
        );
        Ok(lists)
    }
}

impl<R: ListRepository + ?Sized> ListRepository for &R {
    fn save_lists(&self, lists: &[TaskList]) {
        (**self).save_lists(lists)
    }

    fn try_load_lists(&self) -> RepoResult<Vec<TaskList>> {
        (**self).try_load_lists()
    }

    fn load_lists(&self) -> Vec<TaskList> {
        (**self).load_lists()
    }
}
