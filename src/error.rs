use thiserror::Error;

/// Errors returned by stakeholder store operations.
///
/// Parsing never produces an error: malformed markdown yields fewer records.
/// Only mutations that break an invariant and I/O failures are reported.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Stakeholder already exists: {0}")]
    DuplicateName(String),

    #[error("Stakeholder not found: {0}")]
    NotFound(String),

    #[error("Goal not found for stakeholder {stakeholder}: {goal}")]
    GoalNotFound { stakeholder: String, goal: String },

    #[error("Invalid project identifier: {0:?}")]
    InvalidProject(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
