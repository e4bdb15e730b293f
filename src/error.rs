//! Error types for the analysis engine.
//!
//! File-level errors ([`FileError`]) are recovered from inside the batch
//! orchestrator and never reach the caller. Pipeline-level errors
//! ([`AnalysisError`]) abort the run and carry a user-facing message.

use thiserror::Error;

/// Errors raised while analyzing a single file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileError {
    #[error("file {0:?} has no readable content")]
    MissingContent(String),
    #[error("file {name:?} is {size} bytes, limit is {limit}")]
    TooLarge {
        name: String,
        size: usize,
        limit: usize,
    },
    #[error("analysis of {0:?} timed out")]
    Timeout(String),
    #[error("analysis task for {name:?} aborted: {reason}")]
    Aborted { name: String, reason: String },
}

/// Errors raised by persistent storage backends.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored result is malformed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors that terminate a whole analysis run.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("project {0} not found")]
    ProjectNotFound(String),
    #[error("user {user_id} is not allowed to analyze project {project_id}")]
    Unauthorized { project_id: String, user_id: String },
    #[error("no files for analysis in project {0}")]
    NoFiles(String),
    #[error("analysis of project {0} was cancelled")]
    Cancelled(String),
    #[error("failed to load project files: {0}")]
    Source(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;
