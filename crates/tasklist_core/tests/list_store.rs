use tasklist_core::{
    KeyValueStorage, KvListRepository, ListKind, ListStore, MemoryKeyValueStorage, NewTask,
    NewTaskList, StoreError, StoreState, StorageError, StorageResult, Task, TaskPriority,
    LISTS_STORAGE_KEY,
};
use chrono::{TimeZone, Utc};
use std::sync::{Arc, Mutex};

type MemoryStore<'a> = ListStore<KvListRepository<&'a MemoryKeyValueStorage>>;

fn loaded_store(storage: &MemoryKeyValueStorage) -> MemoryStore<'_> {
    let mut store = ListStore::new(KvListRepository::new(storage));
    store.load_lists();
    store
}

fn groceries() -> NewTaskList {
    NewTaskList::new("Groceries", ListKind::Custom)
}

#[test]
fn load_without_persisted_data_yields_empty_and_initialized() {
    let storage = MemoryKeyValueStorage::new();
    let store = loaded_store(&storage);

    assert!(store.lists().is_empty());
    assert!(store.state().initialized);
    assert!(!store.state().is_loading);
    assert!(store.state().error.is_none());
}

#[test]
fn added_list_reloads_equal_except_fresh_id() {
    let storage = MemoryKeyValueStorage::new();
    let mut store = loaded_store(&storage);
    let mut input = groceries();
    input.tasks.push(Task::from_new(NewTask::titled("Eggs")));

    let list_id = store.add_list(input.clone()).unwrap();

    let reloaded = loaded_store(&storage);
    assert_eq!(reloaded.lists().len(), 1);
    let list = &reloaded.lists()[0];
    assert_eq!(list.id, list_id);
    assert!(!list.id.is_empty());
    assert_eq!(list.name, input.name);
    assert_eq!(list.kind, input.kind);
    assert_eq!(list.tasks, input.tasks);
}

#[test]
fn add_list_does_not_check_duplicates() {
    let storage = MemoryKeyValueStorage::new();
    let mut store = loaded_store(&storage);

    let first = store.add_list(groceries()).unwrap();
    let second = store.add_list(groceries()).unwrap();

    assert_ne!(first, second);
    assert_eq!(store.lists().len(), 2);
}

#[test]
fn add_then_remove_task_restores_task_sequence() {
    let storage = MemoryKeyValueStorage::new();
    let mut store = loaded_store(&storage);
    let list_id = store.add_list(groceries()).unwrap();
    store
        .add_task(&list_id, NewTask::titled("Bread"))
        .unwrap()
        .unwrap();
    let before = store.state().list(&list_id).unwrap().tasks.clone();

    let task_id = store
        .add_task(&list_id, NewTask::titled("Butter"))
        .unwrap()
        .unwrap();
    assert!(store.remove_task(&list_id, &task_id));

    assert_eq!(store.state().list(&list_id).unwrap().tasks, before);
    assert_eq!(loaded_store(&storage).state().list(&list_id).unwrap().tasks, before);
}

#[test]
fn add_task_keeps_fields_and_starts_incomplete() {
    let storage = MemoryKeyValueStorage::new();
    let mut store = loaded_store(&storage);
    let list_id = store.add_list(groceries()).unwrap();
    let deadline = Utc.with_ymd_and_hms(2026, 11, 1, 18, 0, 0).unwrap();

    let task_id = store
        .add_task(
            &list_id,
            NewTask {
                title: "Cheese".to_string(),
                description: "aged".to_string(),
                priority: Some(TaskPriority::Low),
                deadline: Some(deadline),
            },
        )
        .unwrap()
        .unwrap();

    let task = store.state().task(&list_id, &task_id).unwrap();
    assert!(!task.completed);
    assert_eq!(task.title, "Cheese");
    assert_eq!(task.description, "aged");
    assert_eq!(task.priority, Some(TaskPriority::Low));
    assert_eq!(task.deadline, Some(deadline));
}

#[test]
fn add_task_to_unknown_list_is_silent_noop() {
    let storage = MemoryKeyValueStorage::new();
    let mut store = loaded_store(&storage);
    store.add_list(groceries()).unwrap();
    let snapshot = store.lists().to_vec();

    let result = store.add_task("missing", NewTask::titled("Nope")).unwrap();

    assert!(result.is_none());
    assert_eq!(store.lists(), snapshot.as_slice());
    assert!(store.state().error.is_none());
}

#[test]
fn toggle_twice_restores_completed() {
    let storage = MemoryKeyValueStorage::new();
    let mut store = loaded_store(&storage);
    let list_id = store.add_list(groceries()).unwrap();
    let task_id = store
        .add_task(&list_id, NewTask::titled("Milk"))
        .unwrap()
        .unwrap();

    assert_eq!(store.toggle_task(&list_id, &task_id), Some(true));
    assert!(loaded_store(&storage).state().task(&list_id, &task_id).unwrap().completed);
    assert_eq!(store.toggle_task(&list_id, &task_id), Some(false));
    assert!(!store.state().task(&list_id, &task_id).unwrap().completed);
}

#[test]
fn toggle_and_remove_on_unknown_ids_are_noops() {
    let storage = MemoryKeyValueStorage::new();
    let mut store = loaded_store(&storage);
    let list_id = store.add_list(groceries()).unwrap();
    let snapshot = store.lists().to_vec();

    assert_eq!(store.toggle_task("missing", "x"), None);
    assert_eq!(store.toggle_task(&list_id, "x"), None);
    assert!(!store.remove_task("missing", "x"));
    assert!(!store.remove_task(&list_id, "x"));

    assert_eq!(store.lists(), snapshot.as_slice());
}

#[test]
fn remove_unknown_list_leaves_lists_unchanged() {
    let storage = MemoryKeyValueStorage::new();
    let mut store = loaded_store(&storage);
    store.add_list(groceries()).unwrap();
    let snapshot = store.lists().to_vec();

    assert!(!store.remove_list("no-such-list"));

    assert_eq!(store.lists(), snapshot.as_slice());
    assert!(store.state().error.is_none());
}

#[test]
fn remove_list_discards_its_tasks_from_storage() {
    let storage = MemoryKeyValueStorage::new();
    let mut store = loaded_store(&storage);
    let keep = store.add_list(groceries()).unwrap();
    let drop_id = store
        .add_list(NewTaskList::new("Errands", ListKind::Custom))
        .unwrap();
    store.add_task(&drop_id, NewTask::titled("Post office")).unwrap();

    assert!(store.remove_list(&drop_id));

    let reloaded = loaded_store(&storage);
    assert_eq!(reloaded.lists().len(), 1);
    assert_eq!(reloaded.lists()[0].id, keep);
}

#[test]
fn invalid_task_sets_error_and_next_operation_clears_it() {
    let storage = MemoryKeyValueStorage::new();
    let mut store = loaded_store(&storage);
    let list_id = store.add_list(groceries()).unwrap();

    let err = store.add_task(&list_id, NewTask::titled("   ")).unwrap_err();
    assert!(matches!(err, StoreError::InvalidTask(_)));
    let message = store.state().error.clone().unwrap();
    assert!(message.starts_with("Failed to add task"));
    assert!(store.state().list(&list_id).unwrap().tasks.is_empty());
    assert!(!store.state().is_loading);

    store.toggle_task(&list_id, "missing");
    assert!(store.state().error.is_none());
}

#[test]
fn invalid_list_is_not_persisted() {
    let storage = MemoryKeyValueStorage::new();
    let mut store = loaded_store(&storage);

    let err = store
        .add_list(NewTaskList::new("", ListKind::Custom))
        .unwrap_err();

    assert!(matches!(err, StoreError::InvalidList(_)));
    assert!(store.lists().is_empty());
    assert!(storage.get_item(LISTS_STORAGE_KEY).unwrap().is_none());

    store.clear_error();
    assert!(store.state().error.is_none());
}

#[test]
fn malformed_blob_sets_error_and_stays_uninitialized() {
    let storage = MemoryKeyValueStorage::new();
    storage.set_item(LISTS_STORAGE_KEY, "[{\"id\":").unwrap();

    let mut store = loaded_store(&storage);
    assert!(!store.state().initialized);
    assert!(store.lists().is_empty());
    assert!(store
        .state()
        .error
        .as_deref()
        .unwrap()
        .starts_with("Failed to load lists"));

    storage.set_item(LISTS_STORAGE_KEY, "[]").unwrap();
    store.load_lists();
    assert!(store.state().initialized);
    assert!(store.state().error.is_none());
}

#[test]
fn failed_reload_keeps_previously_loaded_lists() {
    let storage = MemoryKeyValueStorage::new();
    let mut store = loaded_store(&storage);
    let list_id = store.add_list(groceries()).unwrap();

    storage.set_item(LISTS_STORAGE_KEY, "not json").unwrap();
    store.load_lists();

    assert!(store.state().initialized);
    assert!(!store.state().is_loading);
    assert_eq!(store.lists().len(), 1);
    assert!(store.state().list(&list_id).is_some());
    assert!(store
        .state()
        .error
        .as_deref()
        .unwrap()
        .starts_with("Failed to load lists"));
}

struct ReadOnlyStorage {
    inner: MemoryKeyValueStorage,
}

impl KeyValueStorage for ReadOnlyStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner.get_item(key)
    }

    fn set_item(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::Poisoned)
    }

    fn remove_item(&self, _key: &str) -> StorageResult<()> {
        Err(StorageError::Poisoned)
    }
}

#[test]
fn failed_writes_do_not_fail_mutations() {
    let storage = ReadOnlyStorage {
        inner: MemoryKeyValueStorage::new(),
    };
    let mut store = ListStore::new(KvListRepository::new(&storage));
    store.load_lists();

    let list_id = store.add_list(groceries()).unwrap();

    assert!(store.state().list(&list_id).is_some());
    assert!(store.state().error.is_none());
    assert!(storage.inner.is_empty());
}

#[test]
fn subscribers_see_every_change_until_unsubscribed() {
    let storage = MemoryKeyValueStorage::new();
    let mut store = loaded_store(&storage);
    let seen: Arc<Mutex<Vec<StoreState>>> = Arc::default();
    let sink = Arc::clone(&seen);
    let subscription = store.subscribe(move |state| sink.lock().unwrap().push(state.clone()));

    let list_id = store.add_list(groceries()).unwrap();

    {
        let seen = seen.lock().unwrap();
        assert!(seen.iter().any(|state| state.is_loading));
        let last = seen.last().unwrap();
        assert!(!last.is_loading);
        assert!(last.list(&list_id).is_some());
    }

    assert!(store.unsubscribe(subscription));
    assert!(!store.unsubscribe(subscription));
    let count = seen.lock().unwrap().len();
    store.remove_list(&list_id);
    assert_eq!(seen.lock().unwrap().len(), count);
}

fn take_flags(seen: &Arc<Mutex<Vec<bool>>>) -> Vec<bool> {
    std::mem::take(&mut *seen.lock().unwrap())
}

fn assert_loading_cycle(flags: &[bool]) {
    assert_eq!(flags.first(), Some(&true), "{flags:?}");
    assert_eq!(flags.last(), Some(&false), "{flags:?}");
}

fn assert_never_loading(flags: &[bool]) {
    assert!(!flags.is_empty());
    assert!(!flags.contains(&true), "{flags:?}");
}

#[test]
fn is_loading_is_raised_only_by_load_and_add_or_remove_list_and_add_task() {
    let storage = MemoryKeyValueStorage::new();
    let mut store = ListStore::new(KvListRepository::new(&storage));
    let seen: Arc<Mutex<Vec<bool>>> = Arc::default();
    let sink = Arc::clone(&seen);
    store.subscribe(move |state| sink.lock().unwrap().push(state.is_loading));

    store.load_lists();
    assert_loading_cycle(&take_flags(&seen));

    let list_id = store.add_list(groceries()).unwrap();
    assert_loading_cycle(&take_flags(&seen));

    let task_id = store
        .add_task(&list_id, NewTask::titled("Milk"))
        .unwrap()
        .unwrap();
    assert_loading_cycle(&take_flags(&seen));

    assert_eq!(store.toggle_task(&list_id, &task_id), Some(true));
    assert_never_loading(&take_flags(&seen));

    assert!(store.remove_task(&list_id, &task_id));
    assert_never_loading(&take_flags(&seen));

    assert!(store.remove_list(&list_id));
    assert_loading_cycle(&take_flags(&seen));
    assert!(!store.state().is_loading);
}

#[test]
fn selectors_find_lists_by_kind_and_custom() {
    let storage = MemoryKeyValueStorage::new();
    let mut store = loaded_store(&storage);
    let weekly = store
        .add_list(NewTaskList::new("Weekly Tasks", ListKind::Weekly))
        .unwrap();
    store.add_list(groceries()).unwrap();
    store
        .add_list(NewTaskList::new("Books", ListKind::Custom))
        .unwrap();

    let state = store.state();
    assert_eq!(state.list_by_kind(ListKind::Weekly).unwrap().id, weekly);
    assert!(state.list_by_kind(ListKind::Monthly).is_none());
    let custom_names: Vec<_> = state.custom_lists().map(|list| list.name.as_str()).collect();
    assert_eq!(custom_names, ["Groceries", "Books"]);
}
