//! Core logic for a local task-list manager.
//!
//! Lists and tasks live in SQLite; every committed write publishes a change
//! set that live queries use to refresh the board view.

pub mod config;
pub mod db;
pub mod live;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{open_board, BoardConfig, ConfigError, DatabaseLocation};
pub use live::{ChangeBus, ChangeSet, Collection, LiveQuery};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings};
pub use model::progress::{Progress, ProgressStage};
pub use model::task::{Task, TaskId};
pub use model::task_list::{ListId, TaskList};
pub use service::board_service::{BoardError, BoardService, BoardView, Selection, ValidationError};
pub use store::{SqliteStore, Storage, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
