//! Error taxonomy of the prediction workflow.

use scorer::ScoreError;

/// Broad error category, mapped to a transport status at the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The scorer is not loaded. Callers may retry later.
    NotReady,
    /// The referenced employee or prediction log does not exist.
    NotFound,
    /// The request is malformed.
    BadRequest,
    /// Stored data failed to decode.
    BadState,
    /// Any other failure during scoring or persistence.
    Internal,
}

/// Errors returned by workflow operations.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("scorer is not ready: {0}")]
    NotReady(String),

    #[error("employee {0} not found")]
    EmployeeNotFound(i64),

    #[error("prediction log {0} not found")]
    PredictionLogNotFound(i64),

    #[error("{0}")]
    BadRequest(String),

    #[error("stored features of {record} {id} are malformed")]
    CorruptFeatures {
        record: &'static str,
        id: i64,
        #[source]
        source: serde_json::Error,
    },

    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("scoring failed")]
    Scoring(#[source] ScoreError),

    #[error("failed to encode features")]
    Encoding(#[from] serde_json::Error),
}

impl WorkflowError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotReady(_) => ErrorKind::NotReady,
            Self::EmployeeNotFound(_) | Self::PredictionLogNotFound(_) => ErrorKind::NotFound,
            Self::BadRequest(_) => ErrorKind::BadRequest,
            Self::CorruptFeatures { .. } => ErrorKind::BadState,
            Self::Database(_) | Self::Scoring(_) | Self::Encoding(_) => ErrorKind::Internal,
        }
    }
}

impl From<ScoreError> for WorkflowError {
    fn from(err: ScoreError) -> Self {
        match err {
            ScoreError::NotReady(reason) => Self::NotReady(reason),
            other => Self::Scoring(other),
        }
    }
}
