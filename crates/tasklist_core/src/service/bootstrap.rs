//! Startup routine for the list store.
//!
//! # Responsibility
//! - Load persisted lists, then make sure one list exists per fixed kind
//!   (`daily`, `weekly`, `monthly`).
//!
//! # Invariants
//! - Presence is checked by kind only; names are not compared.
//! - Nothing is created while the store is uninitialized, so a blob that
//!   failed to load is not overwritten here.
//! - The check and the inserts are separate steps. Callers adding lists
//!   between them can still produce duplicate fixed-kind lists.

use crate::model::task_list::{ListId, ListKind, NewTaskList};
use crate::repo::list_repo::ListRepository;
use crate::store::list_store::{ListStore, StoreResult, StoreState};
use log::{info, warn};

/// Loads the store and creates any missing fixed-kind lists.
///
/// Returns the ids of the lists created by this call, in
/// [`ListKind::FIXED`] order.
///
/// # Errors
/// Propagates a store error if a default list is rejected.
pub fn initialize_lists<R: ListRepository>(store: &mut ListStore<R>) -> StoreResult<Vec<ListId>> {
    store.load_lists();
    ensure_default_lists(store)
}

/// Creates missing fixed-kind lists on an already loaded store.
///
/// # Errors
/// Propagates a store error if a default list is rejected.
pub fn ensure_default_lists<R: ListRepository>(
    store: &mut ListStore<R>,
) -> StoreResult<Vec<ListId>> {
    if !store.state().initialized {
        warn!("event=lists_bootstrap module=service status=skipped reason=not_initialized");
        return Ok(Vec::new());
    }

    let mut created = Vec::new();
    for kind in missing_fixed_kinds(store.state()) {
        if let Some(input) = NewTaskList::default_for(kind) {
            created.push(store.add_list(input)?);
        }
    }

    info!(
        "event=lists_bootstrap module=service status=ok created={}",
        created.len()
    );
    Ok(created)
}

/// Returns the fixed kinds without any list in `state`.
pub fn missing_fixed_kinds(state: &StoreState) -> Vec<ListKind> {
    ListKind::FIXED
        .into_iter()
        .filter(|kind| state.list_by_kind(*kind).is_none())
        .collect()
}
