//! MediaShelf core domain types and error taxonomy

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, ErrorSeverity, RecoveryAction, Result};
pub use types::{
    BookRecord, CatalogStats, DedupKey, Item, ItemFilter, ItemId, MediaType, NewItem, Timestamp,
    Validator,
};
