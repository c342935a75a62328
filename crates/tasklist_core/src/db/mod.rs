//! SQLite container for the key-value store.
//!
//! # Responsibility
//! - Open and configure SQLite connections backing `SqliteKeyValueStorage`.
//! - Apply schema migrations in deterministic order.
//! - Verify that a caller-provided connection has the expected shape.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - No key-value read/write happens before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

use migrations::{current_user_version, latest_version};
use rusqlite::Connection;

pub type DbResult<T> = Result<T, DbError>;

/// Table holding all persisted key-value pairs.
pub const KV_TABLE: &str = "kv_store";
const KV_REQUIRED_COLUMNS: &[&str] = &["key", "value", "updated_at"];

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Connection was not opened through [`open_db`] / [`open_db_in_memory`].
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Checks that `conn` is migrated and carries the key-value table.
///
/// # Errors
/// - [`DbError::UninitializedConnection`] when `user_version` differs from
///   [`latest_version`].
/// - [`DbError::MissingRequiredTable`] / [`DbError::MissingRequiredColumn`]
///   when the table shape is incomplete.
pub fn verify_kv_schema(conn: &Connection) -> DbResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(DbError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [KV_TABLE],
        |row| row.get(0),
    )?;
    if table_exists == 0 {
        return Err(DbError::MissingRequiredTable(KV_TABLE));
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({KV_TABLE});"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    for &column in KV_REQUIRED_COLUMNS {
        if !columns.iter().any(|name| name == column) {
            return Err(DbError::MissingRequiredColumn {
                table: KV_TABLE,
                column,
            });
        }
    }

    Ok(())
}
