//! Database connection management

use mediashelf_core::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Database connection pool
pub type DbPool = Pool<Sqlite>;

/// Path value that selects a private in-memory database
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file, or [`IN_MEMORY_PATH`]
    pub path: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Enable Write-Ahead Logging (WAL) mode
    pub enable_wal: bool,
    /// Create database if it doesn't exist
    pub create_if_missing: bool,
    /// How long a writer waits on a locked database before failing
    pub busy_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "mediashelf.db".to_string(),
            max_connections: 5,
            enable_wal: true,
            create_if_missing: true,
            busy_timeout: Duration::from_secs(5),
        }
    }
}

impl DatabaseConfig {
    /// Creates a new configuration with a custom path
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Configuration for a throwaway in-memory database
    ///
    /// Each connection to `:memory:` is a separate database, so the pool is
    /// pinned to a single connection.
    pub fn in_memory() -> Self {
        Self {
            path: IN_MEMORY_PATH.to_string(),
            max_connections: 1,
            enable_wal: false,
            ..Default::default()
        }
    }

    /// Sets the maximum number of connections
    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Enables or disables WAL mode
    pub fn with_wal(mut self, enable: bool) -> Self {
        self.enable_wal = enable;
        self
    }

    /// Sets whether to create the database if missing
    pub fn with_create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    /// Sets the busy timeout
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Returns true if this configuration points at an in-memory database
    pub fn is_in_memory(&self) -> bool {
        self.path == IN_MEMORY_PATH
    }
}

/// Establishes a connection pool to the database
pub async fn connect(config: DatabaseConfig) -> Result<DbPool, AppError> {
    let mut options = SqliteConnectOptions::from_str(&format!("sqlite:{}", config.path))
        .map_err(|e| AppError::database("Invalid database path", e))?
        .create_if_missing(config.create_if_missing)
        .busy_timeout(config.busy_timeout)
        .foreign_keys(true);

    options = if config.enable_wal && !config.is_in_memory() {
        options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
    } else if config.is_in_memory() {
        options.journal_mode(SqliteJournalMode::Memory)
    } else {
        options
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .map_err(|e| AppError::database("Failed to connect to database", e))?;

    log::debug!("Connected to catalog database at {}", config.path);
    Ok(pool)
}

/// Creates an in-memory database, mostly useful in tests
pub async fn connect_in_memory() -> Result<DbPool, AppError> {
    connect(DatabaseConfig::in_memory()).await
}

/// Closes the database connection pool
pub async fn close(pool: DbPool) {
    pool.close().await;
}

/// Checks if the database file exists
pub fn database_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_connect_creates_database() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap().to_string();

        let pool = connect(DatabaseConfig::new(path.clone())).await.unwrap();

        assert!(database_exists(&path));
        close(pool).await;
    }

    #[tokio::test]
    async fn test_connect_with_wal_mode() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap().to_string();

        let pool = connect(DatabaseConfig::new(path).with_wal(true)).await.unwrap();

        let result: (String,) = sqlx::query_as("PRAGMA journal_mode;")
            .fetch_one(&pool)
            .await
            .unwrap();

        assert_eq!(result.0.to_lowercase(), "wal");
        close(pool).await;
    }

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let pool = connect_in_memory().await.unwrap();

        let result: (i32,) = sqlx::query_as("PRAGMA foreign_keys;")
            .fetch_one(&pool)
            .await
            .unwrap();

        assert_eq!(result.0, 1);
        close(pool).await;
    }

    #[tokio::test]
    async fn test_in_memory_pool_is_usable() {
        let pool = connect_in_memory().await.unwrap();

        sqlx::query("SELECT 1;").execute(&pool).await.unwrap();

        close(pool).await;
    }

    #[test]
    fn test_config_builder() {
        let config = DatabaseConfig::new("catalog.db")
            .with_max_connections(20)
            .with_wal(false)
            .with_create_if_missing(false)
            .with_busy_timeout(Duration::from_millis(250));

        assert_eq!(config.path, "catalog.db");
        assert_eq!(config.max_connections, 20);
        assert!(!config.enable_wal);
        assert!(!config.create_if_missing);
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
        assert!(!config.is_in_memory());
    }

    #[test]
    fn test_in_memory_config() {
        let config = DatabaseConfig::in_memory();
        assert!(config.is_in_memory());
        assert_eq!(config.max_connections, 1);
    }

    #[test]
    fn test_database_exists() {
        let temp_file = NamedTempFile::new().unwrap();

        assert!(database_exists(temp_file.path()));
        assert!(!database_exists("/nonexistent/path/to/catalog.sqlite"));
    }

    #[test]
    fn test_config_default() {
        let config = DatabaseConfig::default();

        assert_eq!(config.path, "mediashelf.db");
        assert_eq!(config.max_connections, 5);
        assert!(config.enable_wal);
        assert!(config.create_if_missing);
    }
}
