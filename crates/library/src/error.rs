use mediashelf_core::error::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Database error: {0}")]
    Database(#[from] AppError),

    #[error("Item not found: {0}")]
    RecordNotFound(String),

    #[error("A catalog import is already in progress")]
    ImportInProgress,

    #[error("Failed to read existing items: {0}")]
    ReadFailed(#[source] AppError),

    #[error("Failed to save imported items: {0}")]
    SaveFailed(#[source] AppError),

    #[error("Invalid item: {0}")]
    InvalidItem(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LibraryError {
    /// Message suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            Self::Database(e) | Self::ReadFailed(e) | Self::SaveFailed(e) => e.user_message(),
            Self::RecordNotFound(id) => format!("No item with id {}.", id),
            Self::ImportInProgress => {
                "An import is already running. Try again when it finishes.".to_string()
            }
            Self::InvalidItem(reason) => format!("The item is not valid: {}.", reason),
            Self::Io(e) => format!("File operation failed: {}.", e),
        }
    }
}

// Both type aliases for convenience
pub type Result<T> = std::result::Result<T, LibraryError>;
pub type LibraryResult<T> = std::result::Result<T, LibraryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_converts() {
        let err: LibraryError = AppError::DatabaseLocked {
            operation: "read".to_string(),
        }
        .into();
        assert!(matches!(err, LibraryError::Database(_)));
    }

    #[test]
    fn test_read_failed_keeps_source() {
        use std::error::Error as _;

        let err = LibraryError::ReadFailed(AppError::DatabaseLocked {
            operation: "read".to_string(),
        });
        assert!(err.to_string().starts_with("Failed to read existing items"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_user_message() {
        assert!(LibraryError::ImportInProgress
            .user_message()
            .contains("already running"));
        assert!(LibraryError::RecordNotFound("abc".to_string())
            .user_message()
            .contains("abc"));
    }
}
