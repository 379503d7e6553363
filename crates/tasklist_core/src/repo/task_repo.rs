//! Task repository contract and SQLite implementation.

use crate::model::task::{Task, TaskId};
use crate::model::task_list::ListId;
use crate::repo::{StoreError, StoreResult};
use rusqlite::{params, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    task,
    completed,
    date,
    list_id
FROM todos";

pub trait TaskRepository {
    fn create_task(&self, task: &str, list_id: ListId) -> StoreResult<TaskId>;
    fn list_tasks_by_list(&self, list_id: ListId) -> StoreResult<Vec<Task>>;
    /// Returns whether a row matched `id`.
    fn set_completed(&self, id: TaskId, completed: bool) -> StoreResult<bool>;
    /// Returns whether a row was removed.
    fn delete_task(&self, id: TaskId) -> StoreResult<bool>;
}

pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &str, list_id: ListId) -> StoreResult<TaskId> {
        self.conn.execute(
            "INSERT INTO todos (task, completed, list_id) VALUES (?1, 0, ?2);",
            params![task, list_id],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn list_tasks_by_list(&self, list_id: ListId) -> StoreResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL} WHERE list_id = ?1 ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query(params![list_id])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn set_completed(&self, id: TaskId, completed: bool) -> StoreResult<bool> {
        let changed = self.conn.execute(
            "UPDATE todos SET completed = ?1 WHERE id = ?2;",
            params![bool_to_int(completed), id],
        )?;
        Ok(changed > 0)
    }

    fn delete_task(&self, id: TaskId) -> StoreResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM todos WHERE id = ?1;", params![id])?;
        Ok(changed > 0)
    }
}

fn parse_task_row(row: &Row<'_>) -> StoreResult<Task> {
    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(StoreError::InvalidData(format!(
                "invalid completed value `{other}` in todos.completed"
            )));
        }
    };

    Ok(Task {
        id: row.get("id")?,
        task: row.get("task")?,
        completed,
        date: row.get("date")?,
        list_id: row.get("list_id")?,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
