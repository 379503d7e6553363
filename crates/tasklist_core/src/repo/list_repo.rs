//! List repository contract and SQLite implementation.
//!
//! # Invariants
//! - Deleting a list removes its tasks in the same transaction; no committed
//!   state ever holds tasks of a vanished list.

use crate::model::task_list::{ListId, TaskList};
use crate::repo::StoreResult;
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Rows removed by a cascading list delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListDeletion {
    pub list_removed: bool,
    pub tasks_removed: usize,
}

impl ListDeletion {
    pub fn is_noop(&self) -> bool {
        !self.list_removed && self.tasks_removed == 0
    }
}

pub trait ListRepository {
    fn create_list(&self, name: &str) -> StoreResult<ListId>;
    fn get_list(&self, id: ListId) -> StoreResult<Option<TaskList>>;
    fn list_lists(&self) -> StoreResult<Vec<TaskList>>;
    fn delete_list_cascade(&self, id: ListId) -> StoreResult<ListDeletion>;
}

pub struct SqliteListRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteListRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ListRepository for SqliteListRepository<'_> {
    fn create_list(&self, name: &str) -> StoreResult<ListId> {
        self.conn
            .execute("INSERT INTO lists (name) VALUES (?1);", params![name])?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_list(&self, id: ListId) -> StoreResult<Option<TaskList>> {
        let list = self
            .conn
            .query_row(
                "SELECT id, name FROM lists WHERE id = ?1;",
                params![id],
                parse_list_row,
            )
            .optional()?;
        Ok(list)
    }

    fn list_lists(&self) -> StoreResult<Vec<TaskList>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM lists ORDER BY id ASC;")?;
        let lists = stmt
            .query_map([], parse_list_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(lists)
    }

    fn delete_list_cascade(&self, id: ListId) -> StoreResult<ListDeletion> {
        // Tasks go first: the foreign key forbids removing a referenced list.
        let tx = self.conn.unchecked_transaction()?;
        let tasks_removed = tx.execute("DELETE FROM todos WHERE list_id = ?1;", params![id])?;
        let lists_removed = tx.execute("DELETE FROM lists WHERE id = ?1;", params![id])?;
        tx.commit()?;

        Ok(ListDeletion {
            list_removed: lists_removed > 0,
            tasks_removed,
        })
    }
}

fn parse_list_row(row: &Row<'_>) -> rusqlite::Result<TaskList> {
    Ok(TaskList {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}
