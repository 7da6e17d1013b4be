use crate::error::{LibraryError, Result};
use crate::fetcher::{CatalogFetcher, ScriptCatalogFetcher, ScriptInvocation};
use crate::import::{BookImporter, ImportOptions, ImportReport};
use crate::store::SqliteItemStore;
pub use crate::LibraryConfig;
use log::info;
use mediashelf_core::{AppError, CatalogStats, Item, ItemFilter, ItemId, NewItem, Validator};
use mediashelf_database::{open, queries::items, DatabaseConfig, DbPool};
use std::sync::atomic::{AtomicBool, Ordering};

/// High-level catalog management
pub struct LibraryManager {
    pool: DbPool,
    config: LibraryConfig,
    importing: AtomicBool,
}

/// Clears the in-progress flag when an import ends, however it ends
struct ImportGuard<'a>(&'a AtomicBool);

impl<'a> ImportGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| LibraryError::ImportInProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for ImportGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl LibraryManager {
    /// Opens the catalog database, applying migrations
    pub async fn new(config: LibraryConfig) -> Result<Self> {
        info!("Opening catalog database: {}", config.database_path);

        let pool = open(DatabaseConfig::new(&config.database_path)).await?;
        Ok(Self::with_pool(pool, config))
    }

    /// Wraps an already migrated pool
    pub fn with_pool(pool: DbPool, config: LibraryConfig) -> Self {
        Self {
            pool,
            config,
            importing: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    /// Fetcher for the configured external catalog script
    pub fn catalog_fetcher(&self) -> ScriptCatalogFetcher {
        ScriptCatalogFetcher::new(ScriptInvocation::from_config(&self.config.import))
    }

    /// Default options derived from the configuration
    pub fn import_options(&self, dry_run: bool) -> ImportOptions {
        ImportOptions {
            dry_run,
            mark_in_app: self.config.import.mark_in_app,
        }
    }

    /// Imports new books from `fetcher`
    ///
    /// Only one import runs at a time; a second call while one is running
    /// fails with [`LibraryError::ImportInProgress`].
    pub async fn import_from_catalog(
        &self,
        fetcher: &dyn CatalogFetcher,
        options: &ImportOptions,
    ) -> Result<ImportReport> {
        let _guard = ImportGuard::acquire(&self.importing)?;

        let mut store = SqliteItemStore::new(self.pool.clone());
        BookImporter::run(fetcher, &mut store, options).await
    }

    /// Returns true while an import is running
    pub fn is_importing(&self) -> bool {
        self.importing.load(Ordering::Acquire)
    }

    /// Lists items matching `filter`, newest first
    pub async fn list_items(&self, filter: &ItemFilter) -> Result<Vec<Item>> {
        Ok(items::list_items_matching(&self.pool, filter).await?)
    }

    pub async fn get_item(&self, id: ItemId) -> Result<Item> {
        items::get_item(&self.pool, id)
            .await
            .map_err(|e| not_found_or(e, id))
    }

    /// Validates and stores a new item
    pub async fn add_item(&self, fields: NewItem) -> Result<Item> {
        let item = Item::from_new(fields);
        item.validate()
            .map_err(|errors| LibraryError::InvalidItem(errors.join("; ")))?;

        items::create_item(&self.pool, &item).await?;
        info!("Added item {} ({})", item.display_title(), item.id);
        Ok(item)
    }

    pub async fn delete_item(&self, id: ItemId) -> Result<()> {
        items::delete_item(&self.pool, id)
            .await
            .map_err(|e| not_found_or(e, id))?;
        info!("Deleted item {}", id);
        Ok(())
    }

    /// Marks or unmarks an item as favorite
    pub async fn set_favorite(&self, id: ItemId, favorite: bool) -> Result<Item> {
        let mut item = self.get_item(id).await?;
        item.favorite = favorite;
        items::update_item(&self.pool, &item)
            .await
            .map_err(|e| not_found_or(e, id))?;
        Ok(item)
    }

    pub async fn get_stats(&self) -> Result<CatalogStats> {
        let all = self.list_items(&ItemFilter::All).await?;
        Ok(CatalogStats::from_items(&all))
    }

    /// Get database pool for advanced operations
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn not_found_or(error: AppError, id: ItemId) -> LibraryError {
    match error {
        AppError::RecordNotFound { .. } => LibraryError::RecordNotFound(id.to_string()),
        other => LibraryError::Database(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::StaticCatalogFetcher;
    use async_trait::async_trait;
    use mediashelf_core::{BookRecord, MediaType};
    use std::sync::Arc;
    use tempfile::NamedTempFile;
    use tokio::sync::Notify;

    async fn setup_test_manager() -> Result<(LibraryManager, NamedTempFile)> {
        let temp_file = NamedTempFile::new()?;

        let db_path = temp_file
            .path()
            .to_str()
            .ok_or_else(|| LibraryError::InvalidItem("Invalid path encoding".to_string()))?;

        let manager = LibraryManager::new(LibraryConfig::new(db_path)).await?;
        Ok((manager, temp_file))
    }

    /// Fetcher that parks until released, to hold an import open
    struct BlockingFetcher {
        started: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl CatalogFetcher for BlockingFetcher {
        async fn fetch(&self) -> Vec<BookRecord> {
            self.started.notify_one();
            self.release.notified().await;
            vec![BookRecord::new("Dune", "Frank Herbert")]
        }

        fn name(&self) -> &str {
            "blocking"
        }
    }

    #[tokio::test]
    async fn test_list_items_empty() -> Result<()> {
        let (manager, _temp) = setup_test_manager().await?;
        assert!(manager.list_items(&ItemFilter::All).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_add_and_get_item() -> Result<()> {
        let (manager, _temp) = setup_test_manager().await?;

        let added = manager
            .add_item(NewItem::new("Alien").with_media_type(MediaType::Movie))
            .await?;
        let fetched = manager.get_item(added.id).await?;

        assert_eq!(fetched, added);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_blank_title_rejected() -> Result<()> {
        let (manager, _temp) = setup_test_manager().await?;
        let result = manager.add_item(NewItem::new("   ")).await;
        assert!(matches!(result, Err(LibraryError::InvalidItem(_))));
        Ok(())
    }

    #[tokio::test]
    async fn test_get_nonexistent_item() -> Result<()> {
        let (manager, _temp) = setup_test_manager().await?;
        let result = manager.get_item(ItemId::new()).await;
        assert!(matches!(result, Err(LibraryError::RecordNotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_nonexistent_item() -> Result<()> {
        let (manager, _temp) = setup_test_manager().await?;
        let result = manager.delete_item(ItemId::new()).await;
        assert!(matches!(result, Err(LibraryError::RecordNotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn test_set_favorite() -> Result<()> {
        let (manager, _temp) = setup_test_manager().await?;
        let item = manager.add_item(NewItem::new("Emma")).await?;

        manager.set_favorite(item.id, true).await?;
        let favorites = manager.list_items(&ItemFilter::Favorites).await?;
        assert_eq!(favorites.len(), 1);

        manager.set_favorite(item.id, false).await?;
        assert!(manager.list_items(&ItemFilter::Favorites).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_stats() -> Result<()> {
        let (manager, _temp) = setup_test_manager().await?;
        manager
            .add_item(NewItem::new("Emma").with_media_type(MediaType::Book))
            .await?;
        manager.add_item(NewItem::new("Untyped")).await?;

        let stats = manager.get_stats().await?;
        assert_eq!(stats.total_items, 2);
        assert_eq!(stats.count_of(&MediaType::Book), 1);
        assert_eq!(stats.untyped_count, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_import_from_catalog() -> Result<()> {
        let (manager, _temp) = setup_test_manager().await?;
        let fetcher = StaticCatalogFetcher::new("saved", "Dune||Frank Herbert;;");

        let report = manager
            .import_from_catalog(&fetcher, &manager.import_options(false))
            .await?;
        assert_eq!(report.created_count(), 1);
        assert!(!manager.is_importing());

        let again = manager
            .import_from_catalog(&fetcher, &manager.import_options(false))
            .await?;
        assert_eq!(again.created_count(), 0);
        assert_eq!(again.skipped_existing, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_import_rejected() -> Result<()> {
        let (manager, _temp) = setup_test_manager().await?;
        let fetcher = BlockingFetcher {
            started: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        };
        let options = manager.import_options(false);

        let first = manager.import_from_catalog(&fetcher, &options);
        let second = async {
            fetcher.started.notified().await;
            let result = manager
                .import_from_catalog(&StaticCatalogFetcher::new("other", ""), &options)
                .await;
            fetcher.release.notify_one();
            result
        };

        let (first, second) = tokio::join!(first, second);
        assert_eq!(first?.created_count(), 1);
        assert!(matches!(second, Err(LibraryError::ImportInProgress)));
        assert!(!manager.is_importing());
        Ok(())
    }
}
