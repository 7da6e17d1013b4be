//! Item persistence seam used by the importer
//!
//! Creations are staged with [`ItemStore::create`] and become durable only
//! when [`ItemStore::save`] commits them as one batch.

use crate::error::{LibraryError, Result};
use async_trait::async_trait;
use log::debug;
use mediashelf_core::{Item, ItemFilter, NewItem};
use mediashelf_database::{queries::items, DbPool};

/// Unit-of-work style access to persisted items
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Returns the committed items matching `filter`
    async fn fetch_all(&self, filter: &ItemFilter) -> Result<Vec<Item>>;

    /// Stages a new item and returns it; nothing is written until [`save`](Self::save)
    fn create(&mut self, fields: NewItem) -> Item;

    /// Commits every staged item atomically
    ///
    /// Staged items are discarded whether or not the commit succeeds.
    async fn save(&mut self) -> Result<()>;

    /// Returns true while staged items are waiting for [`save`](Self::save)
    fn has_changes(&self) -> bool;
}

/// [`ItemStore`] backed by the SQLite catalog
pub struct SqliteItemStore {
    pool: DbPool,
    pending: Vec<Item>,
}

impl SqliteItemStore {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            pending: Vec::new(),
        }
    }

    /// Items staged but not yet saved
    pub fn pending(&self) -> &[Item] {
        &self.pending
    }
}

#[async_trait]
impl ItemStore for SqliteItemStore {
    async fn fetch_all(&self, filter: &ItemFilter) -> Result<Vec<Item>> {
        items::list_items_matching(&self.pool, filter)
            .await
            .map_err(LibraryError::ReadFailed)
    }

    fn create(&mut self, fields: NewItem) -> Item {
        let item = Item::from_new(fields);
        self.pending.push(item.clone());
        item
    }

    async fn save(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let batch = std::mem::take(&mut self.pending);
        items::create_items(&self.pool, &batch)
            .await
            .map_err(LibraryError::SaveFailed)?;

        debug!("Committed {} items", batch.len());
        Ok(())
    }

    fn has_changes(&self) -> bool {
        !self.pending.is_empty()
    }
}
