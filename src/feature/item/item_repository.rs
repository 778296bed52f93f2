//! Types and functions for storing and loading items from the database.

use crate::infra::{database::DbConnection, error::ApiResult, pagination::PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::instrument;
use utoipa::ToSchema;
use validator::Validate;
use uuid::Uuid;

/// A new item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewItem {
    /// The item's title.
    #[schema(example = "My item")]
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    /// The item's description.
    #[schema(example = "A very interesting item")]
    #[validate(length(max = 255))]
    pub description: Option<String>,
}

/// A partial update of an item.
/// Fields left out keep their previous value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ItemUpdate {
    /// The item's new title.
    #[schema(example = "Updated title")]
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    /// The item's new description.
    #[schema(example = "Updated description")]
    #[validate(length(max = 255))]
    pub description: Option<String>,
}

/// An existing item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Item {
    /// The item's id.
    pub id: Uuid,
    /// The item's title.
    #[schema(example = "My item")]
    pub title: String,
    /// The item's description.
    #[schema(example = "A very interesting item")]
    pub description: Option<String>,
    /// The id of the user owning the item.
    pub owner_id: Uuid,
}

/// Creates a new item owned by `owner_id`. The id is assigned by the database.
#[instrument(skip(conn))]
pub async fn create_item(
    conn: &mut DbConnection,
    new_item: &NewItem,
    owner_id: Uuid,
) -> ApiResult<Item> {
    tracing::info!("Creating item {:?}", new_item);
    let item = sqlx::query_as::<_, Item>(
        r#"
        INSERT INTO items (title, description, owner_id)
        VALUES ($1, $2, $3)
        RETURNING id, title, description, owner_id
        "#,
    )
    .bind(&new_item.title)
    .bind(&new_item.description)
    .bind(owner_id)
    .fetch_one(&mut *conn)
    .await?;
    tracing::info!("Created item {}", item.id);
    Ok(item)
}

/// Fetches an item by id.
#[instrument(skip(conn))]
pub async fn fetch_item(conn: &mut DbConnection, id: Uuid) -> ApiResult<Option<Item>> {
    let item = sqlx::query_as::<_, Item>(
        r#"
        SELECT id, title, description, owner_id FROM items
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(item)
}

/// Lists items, restricted to a single owner when `owner` is given.
#[instrument(skip(conn))]
pub async fn list_items(
    conn: &mut DbConnection,
    owner: Option<Uuid>,
    params: &PaginationParams,
) -> ApiResult<Vec<Item>> {
    let items = sqlx::query_as::<_, Item>(
        r#"
        SELECT id, title, description, owner_id FROM items
        WHERE ($1::uuid IS NULL OR owner_id = $1)
        ORDER BY id
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(owner)
    .bind(params.limit())
    .bind(params.offset())
    .fetch_all(&mut *conn)
    .await?;
    Ok(items)
}

/// Counts items, restricted to a single owner when `owner` is given.
/// Independent of pagination.
#[instrument(skip(conn))]
pub async fn count_items(conn: &mut DbConnection, owner: Option<Uuid>) -> ApiResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM items
        WHERE ($1::uuid IS NULL OR owner_id = $1)
        "#,
    )
    .bind(owner)
    .fetch_one(&mut *conn)
    .await?;
    Ok(count)
}

/// Applies a partial update to an item. Fields left out of `update` keep
/// their previous value; `id` and `owner_id` are immutable.
#[instrument(skip(conn))]
pub async fn update_item(
    conn: &mut DbConnection,
    id: Uuid,
    update: &ItemUpdate,
) -> ApiResult<Option<Item>> {
    let item = sqlx::query_as::<_, Item>(
        r#"
        UPDATE items
        SET title = COALESCE($2, title),
            description = COALESCE($3, description)
        WHERE id = $1
        RETURNING id, title, description, owner_id
        "#,
    )
    .bind(id)
    .bind(&update.title)
    .bind(&update.description)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(item)
}

/// Deletes an item by id. Returns whether a row was deleted.
#[instrument(skip(conn))]
pub async fn delete_item(conn: &mut DbConnection, id: Uuid) -> ApiResult<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM items
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Searches items by case-insensitive substring match on title or
/// description, restricted to a single owner when `owner` is given.
///
/// An empty query matches every item: the pattern degenerates to `%%`,
/// which all titles satisfy.
#[instrument(skip(conn))]
pub async fn search_items(
    conn: &mut DbConnection,
    query: &str,
    owner: Option<Uuid>,
    params: &PaginationParams,
) -> ApiResult<Vec<Item>> {
    let items = sqlx::query_as::<_, Item>(
        r#"
        SELECT id, title, description, owner_id FROM items
        WHERE ($1::uuid IS NULL OR owner_id = $1)
          AND (title ILIKE '%' || $2 || '%' OR description ILIKE '%' || $2 || '%')
        ORDER BY id
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(owner)
    .bind(query)
    .bind(params.limit())
    .bind(params.offset())
    .fetch_all(&mut *conn)
    .await?;
    Ok(items)
}

/// Counts search matches. Independent of pagination.
#[instrument(skip(conn))]
pub async fn count_search_items(
    conn: &mut DbConnection,
    query: &str,
    owner: Option<Uuid>,
) -> ApiResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM items
        WHERE ($1::uuid IS NULL OR owner_id = $1)
          AND (title ILIKE '%' || $2 || '%' OR description ILIKE '%' || $2 || '%')
        "#,
    )
    .bind(owner)
    .bind(query)
    .fetch_one(&mut *conn)
    .await?;
    Ok(count)
}
