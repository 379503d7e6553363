use std::cell::Cell;
use std::rc::Rc;
use tasklist_core::{Collection, ListId, LiveQuery, SqliteStore, Storage, StoreError, TaskList};

fn setup() -> SqliteStore {
    SqliteStore::open_in_memory().unwrap()
}

fn all_lists(store: &SqliteStore, _: &()) -> Result<Vec<TaskList>, StoreError> {
    store.query_all_lists()
}

#[test]
fn result_is_loading_until_first_refresh() {
    let store = setup();
    store.create_list("Home").unwrap();

    let mut query = LiveQuery::new(&store, &[Collection::Lists], (), all_lists);
    assert!(query.current().is_none());

    assert!(query.refresh(&store).unwrap());
    assert_eq!(query.current().unwrap().len(), 1);
}

#[test]
fn empty_result_is_distinct_from_loading() {
    let store = setup();
    let mut query = LiveQuery::new(&store, &[Collection::Lists], (), all_lists);

    query.refresh(&store).unwrap();
    assert_eq!(query.current(), Some(&Vec::new()));
}

#[test]
fn watched_writes_trigger_rerun_without_manual_invalidation() {
    let store = setup();
    let mut query = LiveQuery::new(&store, &[Collection::Lists], (), all_lists);
    query.refresh(&store).unwrap();
    assert!(!query.refresh(&store).unwrap());

    store.create_list("Home").unwrap();
    assert!(query.refresh(&store).unwrap());
    assert_eq!(query.current().unwrap()[0].name, "Home");
    assert_eq!(query.seen_revision(), store.changes().revision());
}

#[test]
fn unwatched_writes_do_not_rerun_the_query() {
    let store = setup();
    let list_id = store.create_list("Home").unwrap();
    let runs = Rc::new(Cell::new(0));
    let counter = Rc::clone(&runs);
    let mut query = LiveQuery::new(
        &store,
        &[Collection::Lists],
        (),
        move |store: &SqliteStore, _: &()| {
            counter.set(counter.get() + 1);
            store.query_all_lists()
        },
    );
    query.refresh(&store).unwrap();

    store.create_task("Buy milk", list_id).unwrap();
    assert!(!query.refresh(&store).unwrap());
    assert_eq!(runs.get(), 1);
}

#[test]
fn dependency_change_discards_previous_results_and_queued_changes() {
    let store = setup();
    let home = store.create_list("Home").unwrap();
    let work = store.create_list("Work").unwrap();
    store.create_task("Buy milk", home).unwrap();
    store.create_task("Write report", work).unwrap();

    let mut query = LiveQuery::new(
        &store,
        &[Collection::Tasks],
        home,
        |store: &SqliteStore, list_id: &ListId| store.query_tasks_by_list(*list_id),
    );
    query.refresh(&store).unwrap();
    assert_eq!(query.current().unwrap()[0].task, "Buy milk");

    store.create_task("Clean kitchen", home).unwrap();
    assert!(query.set_dependencies(work));
    assert_eq!(query.generation(), 1);
    assert!(query.current().is_none(), "stale home tasks must not be visible");

    query.refresh(&store).unwrap();
    let tasks = query.current().unwrap();
    assert_eq!(tasks.len(), 1);
    assert!(tasks.iter().all(|task| task.list_id == work));
}

#[test]
fn same_dependency_key_keeps_current_result() {
    let store = setup();
    let home = store.create_list("Home").unwrap();
    let mut query = LiveQuery::new(
        &store,
        &[Collection::Tasks],
        home,
        |store: &SqliteStore, list_id: &ListId| store.query_tasks_by_list(*list_id),
    );
    query.refresh(&store).unwrap();

    assert!(!query.set_dependencies(home));
    assert_eq!(query.generation(), 0);
    assert!(query.current().is_some());
}

#[test]
fn failed_rerun_keeps_last_result_and_retries() {
    let store = setup();
    let failing = Rc::new(Cell::new(false));
    let flag = Rc::clone(&failing);
    let mut query = LiveQuery::new(
        &store,
        &[Collection::Lists],
        (),
        move |store: &SqliteStore, _: &()| {
            if flag.get() {
                return Err(StoreError::InvalidData("simulated outage".to_string()));
            }
            store.query_all_lists()
        },
    );
    query.refresh(&store).unwrap();

    store.create_list("Home").unwrap();
    failing.set(true);
    assert!(query.refresh(&store).is_err());
    assert_eq!(query.current().unwrap().len(), 0);

    failing.set(false);
    assert!(query.refresh(&store).unwrap());
    assert_eq!(query.current().unwrap().len(), 1);
}

#[test]
fn cascading_delete_is_observed_as_one_consistent_snapshot() {
    let store = setup();
    let home = store.create_list("Home").unwrap();
    let work = store.create_list("Work").unwrap();
    store.create_task("Buy milk", home).unwrap();

    let mut query = LiveQuery::new(
        &store,
        &[Collection::Lists, Collection::Tasks],
        (),
        move |store: &SqliteStore, _: &()| {
            let lists = store.query_all_lists()?;
            let mut tasks = store.query_tasks_by_list(home)?;
            tasks.extend(store.query_tasks_by_list(work)?);
            Ok((lists, tasks))
        },
    );
    query.refresh(&store).unwrap();

    store.delete_list(home).unwrap();
    assert!(query.refresh(&store).unwrap());
    let (lists, tasks) = query.current().unwrap();
    assert!(lists.iter().all(|list| list.id != home));
    assert!(tasks.iter().all(|task| task.list_id != home));
}

#[test]
fn dropping_a_live_query_unsubscribes_it() {
    let store = setup();
    let query = LiveQuery::new(&store, &[Collection::Lists], (), all_lists);
    assert_eq!(store.changes().subscriber_count(), 1);

    drop(query);
    store.create_list("Home").unwrap();
    assert_eq!(store.changes().subscriber_count(), 0);
}
