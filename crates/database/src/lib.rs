//! MediaShelf Database Layer
//!
//! SQLite persistence for catalog items, built on sqlx.

pub mod connection;
pub mod migrations;
pub mod queries;

pub use connection::{connect, connect_in_memory, DatabaseConfig, DbPool};
pub use migrations::{current_version, optimize, run_migrations, verify_integrity};

/// Connects to the database described by `config` and applies pending migrations
pub async fn open(config: DatabaseConfig) -> Result<DbPool, mediashelf_core::AppError> {
    let pool = connect(config).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::items::{create_item, get_item, list_items_matching};
    use mediashelf_core::{AppError, Item, ItemFilter, MediaType, NewItem};
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_full_database_workflow() -> Result<(), AppError> {
        let pool = open(DatabaseConfig::in_memory()).await?;

        let item = Item::from_new(
            NewItem::new("Test Workflow Book")
                .with_description("Test Author")
                .with_media_type(MediaType::Book)
                .with_favorite(true),
        );
        create_item(&pool, &item).await?;

        let retrieved = get_item(&pool, item.id).await?;
        assert_eq!(retrieved.title.as_deref(), Some("Test Workflow Book"));
        assert_eq!(retrieved.description_text.as_deref(), Some("Test Author"));
        assert!(retrieved.favorite);

        Ok(())
    }

    #[tokio::test]
    async fn test_data_survives_reopen() -> Result<(), AppError> {
        let temp_file = NamedTempFile::new()?;
        let path = temp_file.path().to_string_lossy().to_string();

        let pool = open(DatabaseConfig::new(path.clone())).await?;
        let item = Item::from_new(NewItem::new("Persistent").with_media_type(MediaType::Book));
        create_item(&pool, &item).await?;
        connection::close(pool).await;

        let reopened = open(DatabaseConfig::new(path)).await?;
        let books = list_items_matching(&reopened, &ItemFilter::MediaType(MediaType::Book)).await?;
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, item.id);

        Ok(())
    }
}
