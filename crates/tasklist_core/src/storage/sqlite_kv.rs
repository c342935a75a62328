//! SQLite-backed key-value storage.
//!
//! # Responsibility
//! - Persist string values under string keys in the `kv_store` table.
//! - Refuse connections that were not migrated by this crate.
//!
//! # Invariants
//! - Each write is one upsert statement, so a key is never half-written.
//! - `updated_at` is refreshed on every write.

use super::{KeyValueStorage, StorageResult};
use crate::db::{open_db, open_db_in_memory, verify_kv_schema};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Key-value store owning one SQLite connection.
pub struct SqliteKeyValueStorage {
    conn: Connection,
}

impl SqliteKeyValueStorage {
    /// Wraps an already migrated connection.
    ///
    /// # Errors
    /// Returns schema errors when `conn` was not opened through
    /// [`crate::db::open_db`] or [`crate::db::open_db_in_memory`].
    pub fn try_new(conn: Connection) -> StorageResult<Self> {
        verify_kv_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Self::try_new(open_db(path)?)
    }

    /// Opens a fresh in-memory database.
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }

    /// Borrows the underlying connection for diagnostics.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KeyValueStorage for SqliteKeyValueStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        debug!(
            "event=kv_set module=storage status=ok bytes={}",
            value.len()
        );
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1;", [key])?;
        Ok(())
    }
}
