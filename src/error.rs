//! Error types for stale-triage
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur while auditing a board
#[derive(Debug, Error)]
pub enum TriageError {
    /// Task history cannot establish a priority baseline
    #[error("Invalid task state for T{task_id}: {reason}")]
    InvalidTaskState { task_id: u64, reason: String },

    /// Fetched tasks and transaction histories disagree on task ids
    #[error("Task/transaction mismatch: missing histories for {missing:?}, unexpected histories for {unexpected:?}")]
    CorrelationMismatch { missing: Vec<u64>, unexpected: Vec<u64> },

    /// A priority edit was not accepted by the tracker
    #[error("Failed to set T{task_id} to '{code}': {message}")]
    RemoteWriteFailure {
        task_id: u64,
        code: String,
        message: String,
    },

    /// Initial fetch from the tracker failed
    #[error("Tracker read failed: {0}")]
    RemoteReadFailure(String),

    /// Invalid or incomplete configuration
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parse error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl TriageError {
    /// Fatal errors abort the whole run; the rest are reported per task.
    pub fn is_fatal(&self) -> bool {
        match self {
            TriageError::InvalidTaskState { .. } => false,
            TriageError::RemoteWriteFailure { .. } => false,
            TriageError::CorrelationMismatch { .. } => true,
            TriageError::RemoteReadFailure(_) => true,
            TriageError::Config(_) => true,
            TriageError::Io(_) => true,
            TriageError::Json(_) => true,
            TriageError::Yaml(_) => true,
        }
    }
}

/// Result type alias for stale-triage operations
pub type Result<T> = std::result::Result<T, TriageError>;
