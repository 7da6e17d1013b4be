//! MediaShelf Library Management
//!
//! Orchestration layer over core, database and config. Owns the external
//! catalog import: fetching, parsing, reconciling against stored items and
//! saving the new ones.

pub mod error;
pub mod fetcher;
pub mod import;
pub mod manager;
pub mod parser;
pub mod reconcile;
pub mod store;

pub use error::{LibraryError, LibraryResult};
pub use fetcher::{
    CatalogFetcher, ScriptCatalogFetcher, ScriptInvocation, StaticCatalogFetcher, BOOKS_SCRIPT,
};
pub use import::{BookImporter, ImportOptions, ImportReport};
pub use manager::LibraryManager;
pub use parser::{CatalogParser, FIELD_SEPARATOR, RECORD_SEPARATOR};
pub use reconcile::{reconcile, reconcile_detailed, ReconcilePlan};
pub use store::{ItemStore, SqliteItemStore};

use mediashelf_config::{Config, ImportConfig};

/// Library configuration
#[derive(Debug, Clone)]
pub struct LibraryConfig {
    /// Database file path
    pub database_path: String,
    /// External catalog import settings
    pub import: ImportConfig,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            database_path: "mediashelf.db".to_string(),
            import: ImportConfig::default(),
        }
    }
}

impl LibraryConfig {
    pub fn new(database_path: impl Into<String>) -> Self {
        Self {
            database_path: database_path.into(),
            ..Default::default()
        }
    }

    /// Takes the database path and import settings from a loaded config file
    pub fn from_config(config: &Config) -> Self {
        Self {
            database_path: config.app.database_path.to_string_lossy().into_owned(),
            import: config.import.clone(),
        }
    }

    pub fn with_import(mut self, import: ImportConfig) -> Self {
        self.import = import;
        self
    }
}
