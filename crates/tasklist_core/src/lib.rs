//! Core state and persistence for the task lists app.
//! This crate is the single source of truth for list/task invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{NewTask, Task, TaskId, TaskPriority, TaskValidationError};
pub use model::task_list::{ListId, ListKind, ListValidationError, NewTaskList, TaskList};
pub use repo::list_repo::{
    KvListRepository, ListRepository, RepoError, RepoResult, LISTS_STORAGE_KEY,
};
pub use service::bootstrap::{ensure_default_lists, initialize_lists};
pub use storage::memory::MemoryKeyValueStorage;
pub use storage::sqlite_kv::SqliteKeyValueStorage;
pub use storage::{KeyValueStorage, StorageError, StorageResult};
pub use store::list_store::{ListStore, StoreError, StoreResult, StoreState, SubscriptionId};

use std::path::Path;

/// Store persisted in a SQLite key-value table.
pub type SqliteListStore = ListStore<KvListRepository<SqliteKeyValueStorage>>;

/// Opens a SQLite-backed store at `path`. The store is not loaded yet.
pub fn open_sqlite_store(path: impl AsRef<Path>) -> StorageResult<SqliteListStore> {
    let storage = SqliteKeyValueStorage::open(path)?;
    Ok(ListStore::new(KvListRepository::new(storage)))
}

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, open_sqlite_store, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn open_sqlite_store_starts_uninitialized() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_sqlite_store(dir.path().join("lists.db")).unwrap();
        assert!(!store.state().initialized);
        assert!(store.lists().is_empty());
    }
}
