//! Item Repository

use super::{RepoError, RepoResult};
use shared::models::{Item, ItemCreate, ItemUpdate};
use sqlx::SqlitePool;
use sqlx::types::Json;

const ITEM_SELECT: &str =
    "SELECT id, name, category, variations, images, created_at, updated_at FROM items";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Item>> {
    let sql = format!("{ITEM_SELECT} ORDER BY created_at DESC, id DESC");
    let rows = sqlx::query_as::<_, Item>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Item>> {
    let sql = format!("{ITEM_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Item>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: ItemCreate) -> RepoResult<Item> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO items (id, name, category, variations, images, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
    )
    .bind(id)
    .bind(data.name.trim())
    .bind(data.category)
    .bind(Json(&data.variations))
    .bind(Json(&data.images))
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create item".into()))
}

/// Partial update. New images are appended unless `replace_images` is set.
///
/// The transaction opens with a write so it holds the SQLite write lock
/// before reading the current images; concurrent appends serialize.
pub async fn update(pool: &SqlitePool, id: i64, data: ItemUpdate) -> RepoResult<Item> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let touched = sqlx::query("UPDATE items SET updated_at = ?1 WHERE id = ?2")
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if touched.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Item {id} not found")));
    }

    let images = if data.replace_images {
        data.images
    } else {
        let Json(mut images) =
            sqlx::query_scalar::<_, Json<Vec<String>>>("SELECT images FROM items WHERE id = ?")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        images.extend(data.images);
        images
    };
    let variations = data.variations.map(Json);

    sqlx::query(
        "UPDATE items SET name = COALESCE(?1, name), category = COALESCE(?2, category), variations = COALESCE(?3, variations), images = ?4 WHERE id = ?5",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.category)
    .bind(variations)
    .bind(Json(&images))
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Item {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM items WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
