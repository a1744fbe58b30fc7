use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Storage error")]
    Storage(#[from] StorageError),

    #[error("External service error: {0}")]
    ExternalService(String),
}

pub type AppResult<T> = Result<T, AppError>;
