//! Task list record.

use serde::{Deserialize, Serialize};

/// Storage-assigned list identifier.
pub type ListId = i64;

/// A named grouping of tasks.
///
/// The name is fixed at creation; renaming means delete and recreate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    pub id: ListId,
    pub name: String,
}
