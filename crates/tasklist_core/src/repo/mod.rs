//! SQL-level access to the `lists` and `todos` tables.
//!
//! # Responsibility
//! - Keep SQL inside the persistence boundary.
//! - Report missing rows as counts/`Option`, never as errors, so callers can
//!   treat stale ids as no-ops.
//!
//! # Invariants
//! - Read paths reject malformed persisted rows instead of masking them.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod list_repo;
pub mod task_repo;

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence failure surfaced by the storage layer.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
