//! Task record.
//!
//! # Invariants
//! - `task` text never changes after creation; only `completed` is mutable.
//! - `list_id` references an existing list (enforced by a foreign key).

use crate::model::task_list::ListId;
use serde::{Deserialize, Serialize};

/// Storage-assigned task identifier.
pub type TaskId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Free-text description.
    pub task: String,
    pub completed: bool,
    /// Reserved creation timestamp column. No write path fills it yet.
    pub date: Option<i64>,
    #[serde(rename = "listId")]
    pub list_id: ListId,
}
