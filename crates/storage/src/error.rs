use thiserror::Error;

use crate::dto::validation::FormErrors;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation failed: {0}")]
    Validation(FormErrors),

    #[error("Not found")]
    NotFound,
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    /// Field-keyed messages when the error came from form validation
    pub fn form_errors(&self) -> Option<&FormErrors> {
        match self {
            StorageError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
