//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `tasklist_core` linkage.
//! - Run the startup routine against a database and print list summaries.
//!
//! Usage: `tasklist_cli [db_path]` (in-memory when no path is given).

use std::process::ExitCode;
use tasklist_core::{
    initialize_lists, open_sqlite_store, KvListRepository, ListRepository, ListStore,
    SqliteKeyValueStorage, SqliteListStore, StorageResult,
};

fn main() -> ExitCode {
    println!("tasklist_core ping={}", tasklist_core::ping());
    println!("tasklist_core version={}", tasklist_core::core_version());

    let db_path = std::env::args().nth(1);
    let result = match db_path.as_deref() {
        Some(path) => open_sqlite_store(path).map(|mut store| summarize(&mut store)),
        None => open_in_memory().map(|mut store| summarize(&mut store)),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("tasklist_core store_open=error error={err}");
            ExitCode::FAILURE
        }
    }
}

fn open_in_memory() -> StorageResult<SqliteListStore> {
    let storage = SqliteKeyValueStorage::open_in_memory()?;
    Ok(ListStore::new(KvListRepository::new(storage)))
}

fn summarize<R: ListRepository>(store: &mut ListStore<R>) -> bool {
    match initialize_lists(store) {
        Ok(created) => println!("tasklist_core defaults_created={}", created.len()),
        Err(err) => {
            eprintln!("tasklist_core init=error error={err}");
            return false;
        }
    }
    if let Some(err) = &store.state().error {
        eprintln!("tasklist_core load=error error={err}");
        return false;
    }

    for list in store.lists() {
        println!(
            "list type={} name={:?} tasks={} completed={}",
            list.kind.as_str(),
            list.name,
            list.tasks.len(),
            list.completed_count()
        );
    }
    true
}
