//! Error types for the task engine.
//!
//! Validation failures are always raised before any state change. "Not found" is
//! not an error: id-addressed operations report it through `Option`/`bool`/counts.

use std::path::PathBuf;

use thiserror::Error;

/// Failures of the injected load/save capability.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed task data in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialise tasks: {0}")]
    Serialise(#[source] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors returned by store operations.
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("task title cannot be empty")]
    EmptyTitle,

    #[error("invalid priority '{0}': must be one of low, medium, high")]
    InvalidPriority(String),

    #[error("invalid status '{0}': must be one of pending, in_progress, completed")]
    InvalidStatus(String),

    #[error("invalid due date '{0}': use YYYY-MM-DD, today, tomorrow, +Nd, +Nw or +Nm")]
    InvalidDueDate(String),

    #[error("conflicting due date change: cannot set and clear the due date together")]
    ConflictingDueDate,

    #[error("search query cannot be empty")]
    EmptyQuery,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl TaskError {
    /// True for errors raised by input validation (the store is untouched).
    pub fn is_validation(&self) -> bool {
        !matches!(self, TaskError::Storage(_))
    }
}

pub type Result<T, E = TaskError> = std::result::Result<T, E>;
