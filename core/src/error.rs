use thiserror::Error;

/// Failures at the load/restore boundary.
///
/// Gameplay operations never return these: a dead subject, a repeated main
/// choice, or an empty catalog all degrade to a safe default instead.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Duplicate story node id '{id}' in catalog")]
    DuplicateNode { id: String },

    #[error("Invalid table '{table}': {reason}")]
    InvalidTable { table: &'static str, reason: String },

    #[error("Snapshot does not match session: {reason}")]
    SnapshotMismatch { reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
