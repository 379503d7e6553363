//! Storage handle for lists and tasks.
//!
//! # Responsibility
//! - Expose the storage operations used by the board service and live
//!   queries behind the `Storage` trait.
//! - Publish a `ChangeSet` after every write that commits a change.
//!
//! # Invariants
//! - Operations on missing ids succeed without publishing.
//! - A cascading list delete publishes a single change set naming both
//!   collections, after the transaction commits.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::live::{ChangeBus, Collection};
use crate::model::task::{Task, TaskId};
use crate::model::task_list::{ListId, TaskList};
use crate::repo::list_repo::{ListRepository, SqliteListRepository};
use crate::repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use crate::repo::{StoreError, StoreResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;

/// Storage operations over the `lists` and `todos` collections.
pub trait Storage {
    fn create_list(&self, name: &str) -> StoreResult<ListId>;
    /// Removes the list and all tasks referencing it. Idempotent.
    fn delete_list(&self, id: ListId) -> StoreResult<()>;
    fn create_task(&self, task: &str, list_id: ListId) -> StoreResult<TaskId>;
    fn update_task_completion(&self, id: TaskId, completed: bool) -> StoreResult<()>;
    fn delete_task(&self, id: TaskId) -> StoreResult<()>;
    fn get_list(&self, id: ListId) -> StoreResult<Option<TaskList>>;
    /// All lists in insertion order.
    fn query_all_lists(&self) -> StoreResult<Vec<TaskList>>;
    /// Tasks whose `list_id` equals `list_id`, in insertion order.
    fn query_tasks_by_list(&self, list_id: ListId) -> StoreResult<Vec<Task>>;
    fn changes(&self) -> &ChangeBus;
}

/// SQLite-backed store owning its connection and change bus.
pub struct SqliteStore {
    conn: Connection,
    bus: ChangeBus,
}

impl SqliteStore {
    /// Opens (or creates) a database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            bus: ChangeBus::new(),
        }
    }

    /// Raw connection, for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn lists(&self) -> SqliteListRepository<'_> {
        SqliteListRepository::new(&self.conn)
    }

    fn tasks(&self) -> SqliteTaskRepository<'_> {
        SqliteTaskRepository::new(&self.conn)
    }
}

impl Storage for SqliteStore {
    fn create_list(&self, name: &str) -> StoreResult<ListId> {
        let id = logged("list_create", self.lists().create_list(name))?;
        self.bus.publish(&[Collection::Lists]);
        info!("event=list_create module=store status=ok list_id={id}");
        Ok(id)
    }

    fn delete_list(&self, id: ListId) -> StoreResult<()> {
        let deletion = logged("list_delete", self.lists().delete_list_cascade(id))?;
        if deletion.is_noop() {
            info!("event=list_delete module=store status=noop list_id={id}");
            return Ok(());
        }

        self.bus.publish(&[Collection::Lists, Collection::Tasks]);
        info!(
            "event=list_delete module=store status=ok list_id={id} tasks_removed={}",
            deletion.tasks_removed
        );
        Ok(())
    }

    fn create_task(&self, task: &str, list_id: ListId) -> StoreResult<TaskId> {
        let id = logged("task_create", self.tasks().create_task(task, list_id))?;
        self.bus.publish(&[Collection::Tasks]);
        info!("event=task_create module=store status=ok task_id={id} list_id={list_id}");
        Ok(id)
    }

    fn update_task_completion(&self, id: TaskId, completed: bool) -> StoreResult<()> {
        if logged("task_update", self.tasks().set_completed(id, completed))? {
            self.bus.publish(&[Collection::Tasks]);
            info!("event=task_update module=store status=ok task_id={id} completed={completed}");
        } else {
            info!("event=task_update module=store status=noop task_id={id}");
        }
        Ok(())
    }

    fn delete_task(&self, id: TaskId) -> StoreResult<()> {
        if logged("task_delete", self.tasks().delete_task(id))? {
            self.bus.publish(&[Collection::Tasks]);
            info!("event=task_delete module=store status=ok task_id={id}");
        } else {
            info!("event=task_delete module=store status=noop task_id={id}");
        }
        Ok(())
    }

    fn get_list(&self, id: ListId) -> StoreResult<Option<TaskList>> {
        self.lists().get_list(id)
    }

    fn query_all_lists(&self) -> StoreResult<Vec<TaskList>> {
        self.lists().list_lists()
    }

    fn query_tasks_by_list(&self, list_id: ListId) -> StoreResult<Vec<Task>> {
        self.tasks().list_tasks_by_list(list_id)
    }

    fn changes(&self) -> &ChangeBus {
        &self.bus
    }
}

fn logged<T>(event: &str, result: StoreResult<T>) -> StoreResult<T> {
    if let Err(err) = &result {
        error!("event={event} module=store status=error error={err}");
    }
    result
}
