//! Error types and recovery strategies for MediaShelf
//!
//! Errors are classified in three severity tiers:
//! - **Recoverable**: can be retried (database locked, etc.)
//! - **Degraded**: feature unavailable but the app continues (catalog
//!   application missing, unreadable catalog output, etc.)
//! - **Fatal**: requires restart or user intervention (corrupted database, etc.)
//!
//! Each error carries a recovery action to guide automatic handling.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Recovery actions that can be taken when an error occurs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Retry the operation immediately
    RetryImmediate,
    /// Retry with exponential backoff (e.g., database locked by a writer)
    RetryWithBackoff,
    /// Disable the failing feature and continue (e.g., catalog import)
    DisableFeature,
    /// Attempt to repair the database and retry
    RepairDatabase,
    /// Restore from the most recent backup
    RestoreBackup,
    /// No automatic recovery - user intervention required
    UserIntervention,
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RetryImmediate => write!(f, "Retrying immediately"),
            Self::RetryWithBackoff => write!(f, "Retrying with backoff"),
            Self::DisableFeature => write!(f, "Disabling feature"),
            Self::RepairDatabase => write!(f, "Repairing database"),
            Self::RestoreBackup => write!(f, "Restoring from backup"),
            Self::UserIntervention => write!(f, "User intervention required"),
        }
    }
}

/// Error severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Error can be automatically recovered from
    Recoverable,
    /// Feature degraded but app can continue
    Degraded,
    /// Critical error requiring restart or user action
    Fatal,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recoverable => write!(f, "Recoverable"),
            Self::Degraded => write!(f, "Degraded"),
            Self::Fatal => write!(f, "Fatal"),
        }
    }
}

/// Main error type for MediaShelf
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Database Errors =====
    /// Database operation failed
    #[error("Database error: {message}")]
    DatabaseError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Database is corrupted and needs repair
    #[error("Database corrupted: {details}")]
    DatabaseCorrupted { details: String },

    /// Database migration failed
    #[error("Migration failed: {version} - {reason}")]
    MigrationFailed { version: String, reason: String },

    /// Database is locked by another process
    #[error("Database locked: {operation}")]
    DatabaseLocked { operation: String },

    /// Record not found in database
    #[error("Record not found: {entity} with {identifier}")]
    RecordNotFound { entity: String, identifier: String },

    // ===== External Catalog Errors =====
    /// External program could not be started or did not finish
    #[error("External process '{program}' failed: {message}")]
    ExternalProcess {
        program: String,
        message: String,
        #[source]
        source: Option<io::Error>,
    },

    /// External program output was not valid text
    #[error("Could not decode output of '{program}': {reason}")]
    OutputDecode { program: String, reason: String },

    // ===== File System Errors =====
    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Permission denied for file operation
    #[error("Permission denied: {operation} on {path}")]
    PermissionDenied { operation: String, path: PathBuf },

    /// General I/O error
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: io::Error,
    },

    // ===== Configuration Errors =====
    /// Invalid configuration
    #[error("Invalid configuration: {setting} = '{value}' ({reason})")]
    InvalidConfiguration {
        setting: String,
        value: String,
        reason: String,
    },

    /// Configuration file corrupted
    #[error("Configuration corrupted: {path}")]
    ConfigurationCorrupted { path: PathBuf },

    // ===== Generic Errors =====
    /// Generic internal error
    #[error("Internal error: {message}")]
    InternalError { message: String },

    /// Operation cancelled by user
    #[error("Operation cancelled: {operation}")]
    Cancelled { operation: String },

    /// Invalid argument provided
    #[error("Invalid argument: {argument} - {reason}")]
    InvalidArgument { argument: String, reason: String },
}

impl AppError {
    /// Returns the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::DatabaseLocked { .. } => ErrorSeverity::Recoverable,

            Self::ExternalProcess { .. } | Self::OutputDecode { .. } => ErrorSeverity::Degraded,

            Self::DatabaseCorrupted { .. }
            | Self::MigrationFailed { .. }
            | Self::ConfigurationCorrupted { .. } => ErrorSeverity::Fatal,

            // Context-dependent - default to degraded
            _ => ErrorSeverity::Degraded,
        }
    }

    /// Returns the recommended recovery action for this error
    pub fn recovery_action(&self) -> RecoveryAction {
        match self {
            Self::DatabaseLocked { .. } => RecoveryAction::RetryWithBackoff,

            Self::DatabaseCorrupted { .. } => RecoveryAction::RepairDatabase,

            Self::MigrationFailed { .. } | Self::ConfigurationCorrupted { .. } => {
                RecoveryAction::RestoreBackup
            }

            Self::ExternalProcess { .. } | Self::OutputDecode { .. } => {
                RecoveryAction::DisableFeature
            }

            // Default to user intervention for safety
            _ => RecoveryAction::UserIntervention,
        }
    }

    /// Returns a user-friendly error message suitable for display
    pub fn user_message(&self) -> String {
        match self {
            Self::DatabaseError { .. } | Self::DatabaseLocked { .. } => {
                "The catalog is temporarily unavailable. Please try again.".to_string()
            }
            Self::DatabaseCorrupted { .. } => {
                "The catalog database is damaged and needs repair.".to_string()
            }
            Self::MigrationFailed { .. } => {
                "Failed to update the catalog database. Restoring from backup...".to_string()
            }
            Self::RecordNotFound { .. } => "The requested item was not found.".to_string(),

            Self::ExternalProcess { program, .. } => {
                format!("Could not read the external catalog ({}).", program)
            }
            Self::OutputDecode { .. } => {
                "The external catalog returned data that could not be read.".to_string()
            }

            Self::FileNotFound { .. } => {
                "The file was not found. It may have been moved or deleted.".to_string()
            }
            Self::PermissionDenied { .. } => "Permission denied.".to_string(),
            Self::IoError { .. } => "A file operation failed. Please try again.".to_string(),

            Self::InvalidConfiguration { setting, .. } => {
                format!("Invalid setting: {}. Please check your configuration.", setting)
            }
            Self::ConfigurationCorrupted { .. } => {
                "Settings are corrupted. Resetting to defaults...".to_string()
            }

            Self::InternalError { .. } => {
                "An unexpected error occurred. Please try again.".to_string()
            }
            Self::Cancelled { .. } => "Operation was cancelled.".to_string(),
            Self::InvalidArgument { .. } => "Invalid input provided.".to_string(),
        }
    }

    /// Returns true if this error should be logged at ERROR level
    pub fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Fatal
    }

    /// Returns true if this error can be automatically retried
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.recovery_action(),
            RecoveryAction::RetryImmediate | RecoveryAction::RetryWithBackoff
        )
    }

    /// Helper to create a database error from any error type
    pub fn database<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::DatabaseError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Helper to create an external process error from an I/O failure
    pub fn external_process(program: impl Into<String>, source: io::Error) -> Self {
        Self::ExternalProcess {
            program: program.into(),
            message: source.to_string(),
            source: Some(source),
        }
    }
}

/// Convenience type alias for Results using AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::FileNotFound {
                path: PathBuf::from("unknown"),
            },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                operation: "file operation".to_string(),
                path: PathBuf::from("unknown"),
            },
            _ => Self::IoError {
                message: err.to_string(),
                source: err,
            },
        }
    }
}
