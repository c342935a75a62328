//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the list store to Dart via FRB as plain use-case functions.
//! - Keep error semantics simple: envelopes with `ok` + message.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One process-wide store; calls are serialized by its mutex.
//! - The store is opened and loaded lazily on first use, so no mutation
//!   ever runs against an unloaded store.

use chrono::{TimeZone, Utc};
use log::{error, info, warn};
use std::fmt::Display;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use tasklist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, open_sqlite_store,
    ping as ping_inner, ListKind, NewTask, NewTaskList, SqliteListStore, StoreState, Task,
    TaskList, TaskPriority,
};

const DB_FILE_NAME: &str = "tasklist.sqlite3";
const DB_PATH_ENV: &str = "TASKLIST_DB_PATH";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static STORE: OnceLock<Mutex<Option<SqliteListStore>>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Task row as seen by Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub completed: bool,
    /// `low|medium|high`, or `None`.
    pub priority: Option<String>,
    /// Unix epoch milliseconds.
    pub deadline_epoch_ms: Option<i64>,
}

/// List row as seen by Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListItem {
    pub id: String,
    pub name: String,
    /// `daily|weekly|monthly|custom`.
    pub kind: String,
    pub tasks: Vec<TaskItem>,
}

/// Full store state for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub lists: Vec<TaskListItem>,
    pub initialized: bool,
    pub is_loading: bool,
    /// Store error, or the reason the store could not be opened.
    pub error: Option<String>,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Created or affected list/task id, when there is one.
    pub id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
        }
    }

    /// Builds a failed envelope for `op`; only the op name is logged.
    fn failure(op: &'static str, err: impl Display) -> Self {
        warn!("event={op} module=ffi status=error");
        Self {
            ok: false,
            id: None,
            message: format!("{op} failed: {err}"),
        }
    }
}

/// Loads persisted lists and creates any missing daily/weekly/monthly list.
///
/// # FFI contract
/// - Call once at startup; repeated calls create nothing new.
/// - On a load failure `ok=false` and nothing is created.
#[flutter_rust_bridge::frb(sync)]
pub fn lists_initialize() -> ActionResponse {
    let outcome = with_store(|store| {
        let created = tasklist_core::initialize_lists(store).map_err(|err| err.to_string())?;
        match store.state().error.clone() {
            Some(message) => Err(message),
            None => Ok(created.len()),
        }
    });
    match outcome.and_then(|inner| inner) {
        Ok(created) => {
            ActionResponse::success(format!("Created {created} default list(s)."), None)
        }
        Err(err) => ActionResponse::failure("lists_initialize", err),
    }
}

/// Re-reads persisted lists (the "retry" action).
#[flutter_rust_bridge::frb(sync)]
pub fn lists_load() -> ActionResponse {
    let outcome = with_store(|store| {
        store.load_lists();
        store.state().error.clone()
    });
    match outcome {
        Ok(None) => ActionResponse::success("Lists loaded.", None),
        Ok(Some(err)) | Err(err) => ActionResponse::failure("lists_load", err),
    }
}

/// Returns the current store state.
///
/// # FFI contract
/// - Never fails; open errors are reported through `error`.
#[flutter_rust_bridge::frb(sync)]
pub fn lists_snapshot() -> StoreSnapshot {
    match with_store(|store| to_snapshot(store.state())) {
        Ok(snapshot) => snapshot,
        Err(err) => StoreSnapshot {
            lists: Vec::new(),
            initialized: false,
            is_loading: false,
            error: Some(err),
        },
    }
}

/// Creates a list. `kind` is `daily|weekly|monthly|custom`.
#[flutter_rust_bridge::frb(sync)]
pub fn list_add(name: String, kind: String) -> ActionResponse {
    let Some(kind) = ListKind::parse(&kind) else {
        return ActionResponse::failure("list_add", format!("unknown list type `{kind}`"));
    };
    let input = NewTaskList::new(name.trim(), kind);
    match with_store(|store| store.add_list(input).map_err(|err| err.to_string())) {
        Ok(Ok(list_id)) => ActionResponse::success("List created.", Some(list_id)),
        Ok(Err(err)) | Err(err) => ActionResponse::failure("list_add", err),
    }
}

/// Deletes a list and its tasks. Unknown ids succeed without changes.
#[flutter_rust_bridge::frb(sync)]
pub fn list_remove(list_id: String) -> ActionResponse {
    match with_store(|store| store.remove_list(&list_id)) {
        Ok(true) => ActionResponse::success("List removed.", Some(list_id)),
        Ok(false) => ActionResponse::success("List not found.", None),
        Err(err) => ActionResponse::failure("list_remove", err),
    }
}

/// Adds a task to a list.
///
/// Input semantics:
/// - `title` / `description` are trimmed.
/// - `priority`: `low|medium|high` (case-insensitive) or `None`.
/// - `deadline_epoch_ms`: Unix epoch milliseconds or `None`.
///
/// # FFI contract
/// - Unknown `list_id` is a silent no-op: `ok=true`, `id=None`.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(
    list_id: String,
    title: String,
    description: String,
    priority: Option<String>,
    deadline_epoch_ms: Option<i64>,
) -> ActionResponse {
    let input = match build_new_task(title, description, priority, deadline_epoch_ms) {
        Ok(input) => input,
        Err(err) => return ActionResponse::failure("task_add", err),
    };
    match with_store(|store| store.add_task(&list_id, input).map_err(|err| err.to_string())) {
        Ok(Ok(Some(task_id))) => ActionResponse::success("Task created.", Some(task_id)),
        Ok(Ok(None)) => ActionResponse::success("List not found.", None),
        Ok(Err(err)) | Err(err) => ActionResponse::failure("task_add", err),
    }
}

/// Deletes one task. Unknown ids succeed without changes.
#[flutter_rust_bridge::frb(sync)]
pub fn task_remove(list_id: String, task_id: String) -> ActionResponse {
    match with_store(|store| store.remove_task(&list_id, &task_id)) {
        Ok(true) => ActionResponse::success("Task removed.", Some(task_id)),
        Ok(false) => ActionResponse::success("Task not found.", None),
        Err(err) => ActionResponse::failure("task_remove", err),
    }
}

/// Flips a task's completion flag. The message reports the new state.
#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle(list_id: String, task_id: String) -> ActionResponse {
    match with_store(|store| store.toggle_task(&list_id, &task_id)) {
        Ok(Some(true)) => ActionResponse::success("Task completed.", Some(task_id)),
        Ok(Some(false)) => ActionResponse::success("Task reopened.", Some(task_id)),
        Ok(None) => ActionResponse::success("Task not found.", None),
        Err(err) => ActionResponse::failure("task_toggle", err),
    }
}

/// Dismisses the current store error.
#[flutter_rust_bridge::frb(sync)]
pub fn store_clear_error() -> ActionResponse {
    match with_store(|store| store.clear_error()) {
        Ok(()) => ActionResponse::success("Error cleared.", None),
        Err(err) => ActionResponse::failure("store_clear_error", err),
    }
}

fn build_new_task(
    title: String,
    description: String,
    priority: Option<String>,
    deadline_epoch_ms: Option<i64>,
) -> Result<NewTask, String> {
    let priority = match priority.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => {
            Some(TaskPriority::parse(raw).ok_or_else(|| format!("unknown priority `{raw}`"))?)
        }
    };
    let deadline = match deadline_epoch_ms {
        None => None,
        Some(ms) => Some(
            Utc.timestamp_millis_opt(ms)
                .single()
                .ok_or_else(|| format!("deadline {ms} is out of range"))?,
        ),
    };
    Ok(NewTask {
        title: title.trim().to_string(),
        description: description.trim().to_string(),
        priority,
        deadline,
    })
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_store<T>(f: impl FnOnce(&mut SqliteListStore) -> T) -> Result<T, String> {
    let cell = STORE.get_or_init(|| Mutex::new(None));
    let mut guard = cell.lock().map_err(|_| {
        error!("event=store_lock module=ffi status=error reason=poisoned");
        "store lock poisoned".to_string()
    })?;
    if guard.is_none() {
        let db_path = resolve_db_path();
        let mut store = open_sqlite_store(&db_path).map_err(|err| {
            error!("event=store_open module=ffi status=error");
            format!("store open failed at `{}`: {err}", db_path.display())
        })?;
        store.load_lists();
        info!(
            "event=store_open module=ffi status=ok initialized={}",
            store.state().initialized
        );
        *guard = Some(store);
    }
    match guard.as_mut() {
        Some(store) => Ok(f(store)),
        None => Err("store unavailable".to_string()),
    }
}

fn to_snapshot(state: &StoreState) -> StoreSnapshot {
    StoreSnapshot {
        lists: state.lists.iter().map(to_list_item).collect(),
        initialized: state.initialized,
        is_loading: state.is_loading,
        error: state.error.clone(),
    }
}

fn to_list_item(list: &TaskList) -> TaskListItem {
    TaskListItem {
        id: list.id.clone(),
        name: list.name.clone(),
        kind: list.kind.as_str().to_string(),
        tasks: list.tasks.iter().map(to_task_item).collect(),
    }
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        id: task.id.clone(),
        title: task.title.clone(),
        description: task.description.clone(),
        completed: task.completed,
        priority: task.priority.map(|priority| priority.as_str().to_string()),
        deadline_epoch_ms: task.deadline.map(|deadline| deadline.timestamp_millis()),
    }
}
