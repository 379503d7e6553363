//! Explicit startup configuration.
//!
//! # Responsibility
//! - Describe where the database lives and whether file logging runs.
//! - Open a ready-to-use board from that description.
//!
//! Nothing here reads environment variables or fixed paths; callers pass
//! the configuration in.

use crate::db::DbError;
use crate::logging::{init_logging, LogSettings};
use crate::service::board_service::{BoardError, BoardService};
use crate::store::SqliteStore;
use log::info;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Backing medium for the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseLocation {
    #[default]
    Memory,
    File(PathBuf),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoardConfig {
    #[serde(default)]
    pub database: DatabaseLocation,
    /// File logging stays off when absent.
    #[serde(default)]
    pub logging: Option<LogSettings>,
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid(String),
    Logging(String),
    Db(DbError),
    Board(BoardError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
            Self::Logging(message) => write!(f, "logging init failed: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Board(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Board(err) => Some(err),
            Self::Invalid(_) | Self::Logging(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl From<DbError> for ConfigError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<BoardError> for ConfigError {
    fn from(value: BoardError) -> Self {
        Self::Board(value)
    }
}

impl BoardConfig {
    /// Parses and validates a JSON config document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let DatabaseLocation::File(path) = &self.database {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid(
                    "database file path cannot be empty".to_string(),
                ));
            }
        }
        if let Some(logging) = &self.logging {
            logging.validate().map_err(ConfigError::Invalid)?;
        }
        Ok(())
    }
}

/// Starts logging (when configured), opens the store and loads the board.
pub fn open_board(config: &BoardConfig) -> Result<BoardService<SqliteStore>, ConfigError> {
    config.validate()?;
    if let Some(logging) = &config.logging {
        init_logging(logging).map_err(ConfigError::Logging)?;
    }

    let store = match &config.database {
        DatabaseLocation::Memory => SqliteStore::open_in_memory()?,
        DatabaseLocation::File(path) => SqliteStore::open(path)?,
    };
    let board = BoardService::open(store)?;
    info!("event=board_open module=config status=ok");
    Ok(board)
}
