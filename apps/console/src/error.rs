//! # Console Error Type
//!
//! Errors that end a console run. Errors inside a single menu action never
//! reach this type; the screen turns them into a plain message and returns
//! to the menu.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  Startup                           Menu action                        │
//! │  ───────                           ───────────                        │
//! │  config load ── ConfigError ─┐     repository call ── DbError          │
//! │  data dir    ── io::Error ───┤            │                            │
//! │  store open  ── DbError ─────┤            ▼                            │
//! │                              ▼     user_message(..) ──► "Failed ..."  │
//! │                        ConsoleError                                    │
//! │                              │                                         │
//! │                              ▼                                         │
//! │                      main() exits non-zero                             │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```

use greenhouse_core::{CoreError, ValidationError};
use greenhouse_db::DbError;
use thiserror::Error;

/// Errors raised while starting or running the console.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for console operations.
pub type ConsoleResult<T> = Result<T, ConsoleError>;

/// Converts a store error into the message shown to the user.
///
/// Rule violations keep their own wording; store failures are logged and
/// shown generically.
pub fn user_message(err: &DbError) -> String {
    match err {
        DbError::Rejected(core) => core.to_string(),
        DbError::NotFound { entity, id } => format!("{} {} not found.", entity, id),
        DbError::Conflict { .. } => {
            "The record was changed by someone else. Please try again.".to_string()
        }
        DbError::ForeignKeyViolation { .. } => {
            "Invalid reference. Check the ids you entered.".to_string()
        }
        DbError::UniqueViolation { field, value } => {
            format!("{} '{}' already exists.", field, value)
        }
        DbError::NotConnected => "The database is not connected.".to_string(),
        other => {
            tracing::error!(error = %other, "Database operation failed");
            "Database operation failed.".to_string()
        }
    }
}
