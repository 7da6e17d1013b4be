//! Catalog item queries

use crate::DbPool;
use mediashelf_core::{AppError, Item, ItemFilter, ItemId, MediaType, Timestamp};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite};

const ITEM_COLUMNS: &str = "id, title, description_text, media_type, url, favorite, \
     is_downloading, is_on_mac, is_on_iphone, is_in_app, timestamp";

/// Inserts one item using any executor (pool or open transaction)
async fn insert_item<'e, E>(executor: E, item: &Item) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO items (
            id, title, description_text, media_type, url, favorite,
            is_downloading, is_on_mac, is_on_iphone, is_in_app, timestamp
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(item.id.as_string())
    .bind(&item.title)
    .bind(&item.description_text)
    .bind(item.media_type.as_ref().map(MediaType::as_str))
    .bind(&item.url)
    .bind(item.favorite)
    .bind(item.is_downloading)
    .bind(item.is_on_mac)
    .bind(item.is_on_iphone)
    .bind(item.is_in_app)
    .bind(item.timestamp.as_millis())
    .execute(executor)
    .await?;

    Ok(())
}

/// Creates a new item
pub async fn create_item(pool: &DbPool, item: &Item) -> Result<(), AppError> {
    insert_item(pool, item)
        .await
        .map_err(|e| AppError::database("Failed to create item", e))
}

/// Creates a batch of items in a single transaction
///
/// Either every item is committed or none is.
pub async fn create_items(pool: &DbPool, items: &[Item]) -> Result<(), AppError> {
    if items.is_empty() {
        return Ok(());
    }

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| AppError::database("Failed to start transaction", e))?;

    for item in items {
        insert_item(&mut *tx, item)
            .await
            .map_err(|e| AppError::database(format!("Failed to create item {}", item.id), e))?;
    }

    tx.commit()
        .await
        .map_err(|e| AppError::database("Failed to commit item batch", e))?;

    log::debug!("Committed {} new items", items.len());
    Ok(())
}

/// Gets an item by ID
pub async fn get_item(pool: &DbPool, id: ItemId) -> Result<Item, AppError> {
    let row = sqlx::query(&format!("SELECT {} FROM items WHERE id = ?", ITEM_COLUMNS))
        .bind(id.as_string())
        .fetch_optional(pool)
        .await
        .map_err(|e| AppError::database("Failed to get item", e))?
        .ok_or_else(|| AppError::RecordNotFound {
            entity: "item".to_string(),
            identifier: id.to_string(),
        })?;

    row_to_item(row)
}

/// Updates every mutable field of an existing item
pub async fn update_item(pool: &DbPool, item: &Item) -> Result<(), AppError> {
    let result = sqlx::query(
        r#"
        UPDATE items SET
            title = ?, description_text = ?, media_type = ?, url = ?,
            favorite = ?, is_downloading = ?, is_on_mac = ?, is_on_iphone = ?,
            is_in_app = ?
        WHERE id = ?
        "#,
    )
    .bind(&item.title)
    .bind(&item.description_text)
    .bind(item.media_type.as_ref().map(MediaType::as_str))
    .bind(&item.url)
    .bind(item.favorite)
    .bind(item.is_downloading)
    .bind(item.is_on_mac)
    .bind(item.is_on_iphone)
    .bind(item.is_in_app)
    .bind(item.id.as_string())
    .execute(pool)
    .await
    .map_err(|e| AppError::database("Failed to update item", e))?;

    if result.rows_affected() == 0 {
        return Err(AppError::RecordNotFound {
            entity: "item".to_string(),
            identifier: item.id.to_string(),
        });
    }

    Ok(())
}

/// Deletes an item
pub async fn delete_item(pool: &DbPool, id: ItemId) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM items WHERE id = ?")
        .bind(id.as_string())
        .execute(pool)
        .await
        .map_err(|e| AppError::database("Failed to delete item", e))?;

    if result.rows_affected() == 0 {
        return Err(AppError::RecordNotFound {
            entity: "item".to_string(),
            identifier: id.to_string(),
        });
    }

    Ok(())
}

/// Lists all items, newest first
pub async fn list_items(pool: &DbPool) -> Result<Vec<Item>, AppError> {
    list_items_matching(pool, &ItemFilter::All).await
}

/// Lists the items selected by a filter, newest first
pub async fn list_items_matching(
    pool: &DbPool,
    filter: &ItemFilter,
) -> Result<Vec<Item>, AppError> {
    let rows = match filter {
        ItemFilter::All => {
            sqlx::query(&format!(
                "SELECT {} FROM items ORDER BY timestamp DESC",
                ITEM_COLUMNS
            ))
            .fetch_all(pool)
            .await
        }
        ItemFilter::MediaType(media_type) => {
            sqlx::query(&format!(
                "SELECT {} FROM items WHERE media_type = ? ORDER BY timestamp DESC",
                ITEM_COLUMNS
            ))
            .bind(media_type.as_str())
            .fetch_all(pool)
            .await
        }
        ItemFilter::Favorites => {
            sqlx::query(&format!(
                "SELECT {} FROM items WHERE favorite = 1 ORDER BY timestamp DESC",
                ITEM_COLUMNS
            ))
            .fetch_all(pool)
            .await
        }
    }
    .map_err(|e| AppError::database("Failed to list items", e))?;

    rows.into_iter().map(row_to_item).collect()
}

/// Counts all items
pub async fn count_items(pool: &DbPool) -> Result<i64, AppError> {
    sqlx::query_scalar("SELECT COUNT(*) FROM items")
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::database("Failed to count items", e))
}

/// Converts a database row to an Item
pub(crate) fn row_to_item(row: SqliteRow) -> Result<Item, AppError> {
    let id_str: String = row
        .try_get("id")
        .map_err(|e| AppError::database("Missing item ID", e))?;
    let id = ItemId::from_string(&id_str).map_err(|e| AppError::database("Invalid item ID", e))?;

    let media_type: Option<String> = row
        .try_get("media_type")
        .map_err(|e| AppError::database("Missing media type", e))?;

    let timestamp_ms: i64 = row
        .try_get("timestamp")
        .map_err(|e| AppError::database("Missing timestamp", e))?;

    let flag = |column: &str| -> Result<bool, AppError> {
        row.try_get::<bool, _>(column)
            .map_err(|e| AppError::database(format!("Missing {}", column), e))
    };

    Ok(Item {
        id,
        title: row
            .try_get("title")
            .map_err(|e| AppError::database("Missing title", e))?,
        description_text: row
            .try_get("description_text")
            .map_err(|e| AppError::database("Missing description", e))?,
        media_type: media_type.as_deref().map(MediaType::from),
        url: row
            .try_get("url")
            .map_err(|e| AppError::database("Missing url", e))?,
        favorite: flag("favorite")?,
        is_downloading: flag("is_downloading")?,
        is_on_mac: flag("is_on_mac")?,
        is_on_iphone: flag("is_on_iphone")?,
        is_in_app: flag("is_in_app")?,
        timestamp: Timestamp::from_millis(timestamp_ms),
    })
}
