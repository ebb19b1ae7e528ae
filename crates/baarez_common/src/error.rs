//! Error types for the Baarez agent.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BaarezError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(#[source] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BaarezError {
    pub fn code(&self) -> i32 {
        match self {
            BaarezError::StorageUnavailable(_) => -32010,
            BaarezError::Storage(_) => -32011,
            BaarezError::Io(_) => -32006,
            BaarezError::Json(_) => -32700,
            BaarezError::Internal(_) => -32603,
        }
    }

    /// True for failures of the backing medium, which abort the request.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            BaarezError::StorageUnavailable(_) | BaarezError::Storage(_) | BaarezError::Io(_)
        )
    }
}

impl From<rusqlite::Error> for BaarezError {
    /// Failures to reach the database file are `StorageUnavailable`
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::SqliteFailure(ref err, _)
                if matches!(
                    err.code,
                    rusqlite::ErrorCode::CannotOpen
                        | rusqlite::ErrorCode::SystemIoFailure
                        | rusqlite::ErrorCode::NotADatabase
                ) =>
            {
                BaarezError::StorageUnavailable(e.to_string())
            }
            other => BaarezError::Storage(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, BaarezError>;
