use tasklist_core::{Collection, SqliteStore, Storage, StoreError};

fn setup() -> SqliteStore {
    SqliteStore::open_in_memory().unwrap()
}

#[test]
fn created_list_appears_exactly_once() {
    let store = setup();
    let id = store.create_list("Home").unwrap();

    let lists = store.query_all_lists().unwrap();
    let matching: Vec<_> = lists.iter().filter(|list| list.id == id).collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].name, "Home");
}

#[test]
fn lists_come_back_in_insertion_order() {
    let store = setup();
    let home = store.create_list("Home").unwrap();
    let work = store.create_list("Work").unwrap();
    let errands = store.create_list("Errands").unwrap();

    let ids: Vec<_> = store
        .query_all_lists()
        .unwrap()
        .into_iter()
        .map(|list| list.id)
        .collect();
    assert_eq!(ids, vec![home, work, errands]);
}

#[test]
fn new_task_defaults_to_incomplete_without_date() {
    let store = setup();
    let list_id = store.create_list("Home").unwrap();
    let task_id = store.create_task("Buy milk", list_id).unwrap();

    let tasks = store.query_tasks_by_list(list_id).unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, task_id);
    assert_eq!(tasks[0].task, "Buy milk");
    assert!(!tasks[0].completed);
    assert_eq!(tasks[0].date, None);
    assert_eq!(tasks[0].list_id, list_id);
}

#[test]
fn task_query_only_returns_tasks_of_that_list() {
    let store = setup();
    let home = store.create_list("Home").unwrap();
    let work = store.create_list("Work").unwrap();
    store.create_task("Buy milk", home).unwrap();
    store.create_task("Write report", work).unwrap();
    store.create_task("Clean kitchen", home).unwrap();

    for list_id in [home, work] {
        let tasks = store.query_tasks_by_list(list_id).unwrap();
        assert!(!tasks.is_empty());
        assert!(tasks.iter().all(|task| task.list_id == list_id));
    }
    assert_eq!(store.query_tasks_by_list(home).unwrap().len(), 2);
}

#[test]
fn completion_updates_and_missing_ids_are_noops() {
    let store = setup();
    let list_id = store.create_list("Home").unwrap();
    let task_id = store.create_task("Buy milk", list_id).unwrap();

    store.update_task_completion(task_id, true).unwrap();
    assert!(store.query_tasks_by_list(list_id).unwrap()[0].completed);

    store.update_task_completion(task_id, false).unwrap();
    assert!(!store.query_tasks_by_list(list_id).unwrap()[0].completed);

    store.update_task_completion(9_999, true).unwrap();
}

#[test]
fn delete_task_is_idempotent() {
    let store = setup();
    let list_id = store.create_list("Home").unwrap();
    let task_id = store.create_task("Buy milk", list_id).unwrap();

    store.delete_task(task_id).unwrap();
    store.delete_task(task_id).unwrap();

    assert!(store.query_tasks_by_list(list_id).unwrap().is_empty());
}

#[test]
fn delete_list_cascades_and_is_idempotent() {
    let store = setup();
    let home = store.create_list("Home").unwrap();
    let work = store.create_list("Work").unwrap();
    store.create_task("Buy milk", home).unwrap();
    store.create_task("Write report", work).unwrap();

    store.delete_list(home).unwrap();
    store.delete_list(home).unwrap();

    assert!(store.get_list(home).unwrap().is_none());
    assert!(store.query_tasks_by_list(home).unwrap().is_empty());
    let orphans: i64 = store
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM todos WHERE list_id NOT IN (SELECT id FROM lists);",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(orphans, 0);
    assert_eq!(store.query_tasks_by_list(work).unwrap().len(), 1);
}

#[test]
fn list_ids_are_never_reused() {
    let store = setup();
    let first = store.create_list("Home").unwrap();
    store.delete_list(first).unwrap();
    let second = store.create_list("Home").unwrap();
    assert!(second > first);
}

#[test]
fn task_for_missing_list_fails_with_store_error() {
    let store = setup();
    let err = store.create_task("Buy milk", 77).unwrap_err();
    assert!(matches!(err, StoreError::Db(_)));
}

#[test]
fn committed_writes_publish_scoped_change_sets() {
    let store = setup();
    let rx = store.changes().subscribe();

    let list_id = store.create_list("Home").unwrap();
    let change = rx.try_recv().unwrap();
    assert_eq!(change.collections, vec![Collection::Lists]);

    let task_id = store.create_task("Buy milk", list_id).unwrap();
    assert_eq!(rx.try_recv().unwrap().collections, vec![Collection::Tasks]);

    store.update_task_completion(task_id, true).unwrap();
    assert_eq!(rx.try_recv().unwrap().collections, vec![Collection::Tasks]);

    store.delete_list(list_id).unwrap();
    let cascade = rx.try_recv().unwrap();
    assert!(cascade.touches(Collection::Lists));
    assert!(cascade.touches(Collection::Tasks));
    assert!(rx.try_recv().is_err(), "cascade must publish once");
}

#[test]
fn noops_and_failures_publish_nothing() {
    let store = setup();
    let rx = store.changes().subscribe();

    store.delete_task(12).unwrap();
    store.update_task_completion(12, true).unwrap();
    store.delete_list(12).unwrap();
    store.create_task("Orphan", 12).unwrap_err();

    assert!(rx.try_recv().is_err());
    assert_eq!(store.changes().revision(), 0);
}

#[test]
fn file_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.sqlite3");

    let store = SqliteStore::open(&path).unwrap();
    let list_id = store.create_list("Home").unwrap();
    store.create_task("Buy milk", list_id).unwrap();
    drop(store);

    let reopened = SqliteStore::open(&path).unwrap();
    let lists = reopened.query_all_lists().unwrap();
    assert_eq!(lists.len(), 1);
    assert_eq!(reopened.query_tasks_by_list(lists[0].id).unwrap().len(), 1);
}
