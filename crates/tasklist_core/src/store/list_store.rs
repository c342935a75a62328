//! In-memory list/task store with write-through persistence.
//!
//! # Responsibility
//! - Own the list sequence plus `initialized` / `is_loading` / `error` flags.
//! - Apply CRUD operations for lists and tasks, persisting the complete
//!   resulting sequence through a [`ListRepository`] before publishing it.
//! - Notify subscribed listeners after every state change.
//!
//! # Invariants
//! - Every operation clears `error` when it starts; a failing operation sets
//!   it to a human-readable message.
//! - Operations on unknown list/task ids are silent no-ops.
//! - New lists and tasks always receive fresh ids; new tasks start
//!   incomplete.
//! - Rejected input never touches in-memory state or storage.

use crate::model::task::{NewTask, Task, TaskId, TaskValidationError};
use crate::model::task_list::{ListId, ListKind, ListValidationError, NewTaskList, TaskList};
use crate::repo::list_repo::{ListRepository, RepoError};
use log::{info, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Handle returned by [`ListStore::subscribe`].
pub type SubscriptionId = u64;

type Listener = Box<dyn FnMut(&StoreState) + Send>;

/// Failure surfaced by store operations.
///
/// `Display` output is what lands in [`StoreState::error`].
#[derive(Debug)]
pub enum StoreError {
    Load(RepoError),
    InvalidList(ListValidationError),
    InvalidTask(TaskValidationError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(err) => write!(f, "Failed to load lists: {err}"),
            Self::InvalidList(err) => write!(f, "Failed to add list: {err}"),
            Self::InvalidTask(err) => write!(f, "Failed to add task: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Load(err) => Some(err),
            Self::InvalidList(err) => Some(err),
            Self::InvalidTask(err) => Some(err),
        }
    }
}

/// Snapshot published to listeners.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreState {
    pub lists: Vec<TaskList>,
    /// Set once a load has succeeded.
    pub initialized: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl StoreState {
    pub fn list(&self, list_id: &str) -> Option<&TaskList> {
        self.lists.iter().find(|list| list.id == list_id)
    }

    /// Returns the first list of `kind`, as the fixed-list screens do.
    pub fn list_by_kind(&self, kind: ListKind) -> Option<&TaskList> {
        self.lists.iter().find(|list| list.kind == kind)
    }

    pub fn custom_lists(&self) -> impl Iterator<Item = &TaskList> {
        self.lists
            .iter()
            .filter(|list| list.kind == ListKind::Custom)
    }

    pub fn task(&self, list_id: &str, task_id: &str) -> Option<&Task> {
        self.list(list_id).and_then(|list| list.task(task_id))
    }
}

/// State container mediating between UI callers and persistence.
pub struct ListStore<R: ListRepository> {
    repo: R,
    state: StoreState,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription_id: SubscriptionId,
}

impl<R: ListRepository> ListStore<R> {
    /// Creates an empty, uninitialized store. Call [`Self::load_lists`] next.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            state: StoreState::default(),
            listeners: Vec::new(),
            next_subscription_id: 1,
        }
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn lists(&self) -> &[TaskList] {
        &self.state.lists
    }

    /// Registers a listener called with the full state after every change.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&StoreState) + Send + 'static,
    ) -> SubscriptionId {
        let id = self.next_subscription_id;
        self.next_subscription_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener; returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn clear_error(&mut self) {
        self.set(|state| state.error = None);
    }

    /// Replaces in-memory lists with the persisted ones.
    ///
    /// Never returns an error: on failure the message lands in
    /// [`StoreState::error`], current lists are kept and `initialized` is
    /// left untouched so the caller can retry. A failed first load therefore
    /// leaves the store empty and uninitialized, while a failed reload keeps
    /// the previously loaded lists and `initialized == true`.
    pub fn load_lists(&mut self) {
        self.begin(true);
        match self.repo.try_load_lists() {
            Ok(lists) => {
                info!(
                    "event=store_load module=store status=ok list_count={}",
                    lists.len()
                );
                self.set(|state| {
                    state.lists = lists;
                    state.initialized = true;
                });
            }
            Err(err) => {
                self.fail(StoreError::Load(err));
            }
        }
        self.end(true);
    }

    /// Appends a new list and returns its generated id.
    ///
    /// No duplicate name or kind check is performed.
    ///
    /// # Errors
    /// - [`StoreError::InvalidList`] when the name is rejected.
    pub fn add_list(&mut self, input: NewTaskList) -> StoreResult<ListId> {
        self.begin(true);
        let outcome = match input.validate() {
            Ok(()) => {
                let list = TaskList::from_new(input);
                let list_id = list.id.clone();
                let kind = list.kind;
                let mut next = self.state.lists.clone();
                next.push(list);
                self.commit(next);
                info!(
                    "event=list_add module=store status=ok kind={} list_count={}",
                    kind.as_str(),
                    self.state.lists.len()
                );
                Ok(list_id)
            }
            Err(err) => Err(self.fail(StoreError::InvalidList(err))),
        };
        self.end(true);
        outcome
    }

    /// Removes the list with `list_id` together with its tasks.
    ///
    /// Persists even when nothing matched. Returns whether a list was removed.
    pub fn remove_list(&mut self, list_id: &str) -> bool {
        self.begin(true);
        let mut next = self.state.lists.clone();
        next.retain(|list| list.id != list_id);
        let removed = next.len() != self.state.lists.len();
        self.commit(next);
        info!(
            "event=list_remove module=store status=ok removed={} list_count={}",
            removed,
            self.state.lists.len()
        );
        self.end(true);
        removed
    }

    /// Appends a task to the list with `list_id`.
    ///
    /// Returns `Ok(None)` without persisting when the list does not exist.
    ///
    /// # Errors
    /// - [`StoreError::InvalidTask`] when the input is rejected.
    pub fn add_task(&mut self, list_id: &str, input: NewTask) -> StoreResult<Option<TaskId>> {
        self.begin(true);
        let outcome = match input.validate() {
            Ok(()) => Ok(self.append_task(list_id, input)),
            Err(err) => Err(self.fail(StoreError::InvalidTask(err))),
        };
        self.end(true);
        outcome
    }

    /// Removes one task. Returns whether a task was removed.
    ///
    /// Persists whenever the list exists, even if the task did not.
    pub fn remove_task(&mut self, list_id: &str, task_id: &str) -> bool {
        self.begin(false);
        let Some(index) = self.list_index(list_id) else {
            return false;
        };
        let mut next = self.state.lists.clone();
        let removed = next[index].remove_task(task_id);
        self.commit(next);
        info!(
            "event=task_remove module=store status=ok removed={}",
            removed
        );
        removed
    }

    /// Flips `completed` on one task and returns the new value.
    ///
    /// Returns `None` without persisting when the list or task is unknown.
    pub fn toggle_task(&mut self, list_id: &str, task_id: &str) -> Option<bool> {
        self.begin(false);
        let index = self.list_index(list_id)?;
        let mut next = self.state.lists.clone();
        let completed = next[index].task_mut(task_id)?.toggle();
        self.commit(next);
        info!(
            "event=task_toggle module=store status=ok completed={}",
            completed
        );
        Some(completed)
    }

    fn append_task(&mut self, list_id: &str, input: NewTask) -> Option<TaskId> {
        let Some(index) = self.list_index(list_id) else {
            info!("event=task_add module=store status=skipped reason=list_not_found");
            return None;
        };
        let task = Task::from_new(input);
        let task_id = task.id.clone();
        let mut next = self.state.lists.clone();
        next[index].tasks.push(task);
        self.commit(next);
        info!(
            "event=task_add module=store status=ok task_count={}",
            self.state.lists[index].tasks.len()
        );
        Some(task_id)
    }

    fn list_index(&self, list_id: &str) -> Option<usize> {
        self.state.lists.iter().position(|list| list.id == list_id)
    }

    /// Persists `next` and then publishes it.
    fn commit(&mut self, next: Vec<TaskList>) {
        self.repo.save_lists(&next);
        self.set(|state| state.lists = next);
    }

    fn begin(&mut self, track_loading: bool) {
        if track_loading || self.state.error.is_some() {
            self.set(|state| {
                state.error = None;
                if track_loading {
                    state.is_loading = true;
                }
            });
        }
    }

    fn end(&mut self, track_loading: bool) {
        if track_loading {
            self.set(|state| state.is_loading = false);
        }
    }

    fn fail(&mut self, err: StoreError) -> StoreError {
        warn!("event=store_op module=store status=error error={}", err);
        let message = err.to_string();
        self.set(|state| state.error = Some(message));
        err
    }

    fn set(&mut self, update: impl FnOnce(&mut StoreState)) {
        update(&mut self.state);
        for (_, listener) in &mut self.listeners {
            listener(&self.state);
        }
    }
}
