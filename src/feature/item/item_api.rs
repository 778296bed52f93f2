//! The item API implementation.

use crate::{
    feature::item::{
        item_repository::{Item, ItemUpdate, NewItem},
        item_service,
    },
    infra::{
        database::DbPool,
        error::{ApiResult, ClientError},
        extract::{Json, Query},
        pagination::PaginationParams,
        security::CurrentUser,
        state::AppState,
        validation::Valid,
    },
};
use axum::{extract::State, Router};
use axum_extra::routing::{RouterExt, TypedPath};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// The item API endpoints.
pub fn routes() -> Router<AppState> {
    Router::new()
        .typed_post(create_item)
        .typed_get(search_items)
        .typed_get(get_item)
        .typed_put(update_item)
        .typed_delete(delete_item)
        .typed_get(list_items)
}

#[derive(Deserialize, TypedPath)]
#[typed_path("/items", rejection(ClientError))]
pub(crate) struct Items;

#[derive(Deserialize, TypedPath)]
#[typed_path("/items/:id", rejection(ClientError))]
pub(crate) struct ItemsId(Uuid);

#[derive(Deserialize, TypedPath)]
#[typed_path("/items/search", rejection(ClientError))]
pub(crate) struct ItemsSearch;

/// A page of items together with the total number of matches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ItemPage {
    /// The requested page of items.
    pub data: Vec<Item>,
    /// The total number of matching items, independent of the page size.
    pub count: i64,
}

/// A plain acknowledgment message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Message {
    pub message: String,
}

/// Search parameters.
#[derive(Clone, Debug, Serialize, Deserialize, IntoParams)]
pub struct SearchParams {
    /// The substring to look for in titles and descriptions.
    q: String,
    /// The number of elements to skip.
    offset: Option<i64>,
    /// The maximum number of elements to return.
    limit: Option<i64>,
}

/// Creates a new item owned by the caller.
#[utoipa::path(
    post,
    path = "/api/items",
    request_body = NewItem,
    security(("basic" = [])),
    responses(
        (status = 200, description = "Ok", body = Item),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 422, description = "Unprocessable Entity", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    )
)]
#[instrument(skip_all, fields(new_item))]
pub(crate) async fn create_item(
    Items: Items,
    State(db): State<DbPool>,
    user: CurrentUser,
    Json(new_item): Json<NewItem>,
) -> ApiResult<Json<Item>> {
    let new_item = Valid::new(new_item)?;
    let mut tx = db.begin().await?;
    let item = item_service::create_item(&mut tx, &user, new_item).await?;
    tx.commit().await?;
    Ok(Json(item))
}

/// Gets an item by id.
#[utoipa::path(
    get,
    path = "/api/items/{id}",
    security(("basic" = [])),
    responses(
        (status = 200, description = "Ok", body = Item),
        (status = 400, description = "Not enough permissions", body = ErrorBody),
        (status = 404, description = "Item not found", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    )
)]
#[instrument(skip_all, fields(id))]
pub(crate) async fn get_item(
    ItemsId(id): ItemsId,
    State(db): State<DbPool>,
    user: CurrentUser,
) -> ApiResult<Json<Item>> {
    let mut tx = db.begin().await?;
    let item = item_service::read_item(&mut tx, &user, id).await?;
    tx.commit().await?;
    Ok(Json(item))
}

/// Lists items with the total count.
/// Superusers see all items, everyone else only their own.
#[utoipa::path(
    get,
    path = "/api/items",
    params(PaginationParams),
    security(("basic" = [])),
    responses(
        (status = 200, description = "Ok", body = ItemPage),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    )
)]
#[instrument(skip_all)]
pub(crate) async fn list_items(
    Items: Items,
    State(db): State<DbPool>,
    user: CurrentUser,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ItemPage>> {
    let mut tx = db.begin().await?;
    let (data, count) = item_service::list_items(&mut tx, &user, &params).await?;
    tx.commit().await?;
    Ok(Json(ItemPage { data, count }))
}

/// Partially updates an item. Fields left out keep their previous value.
#[utoipa::path(
    put,
    path = "/api/items/{id}",
    request_body = ItemUpdate,
    security(("basic" = [])),
    responses(
        (status = 200, description = "Ok", body = Item),
        (status = 400, description = "Not enough permissions", body = ErrorBody),
        (status = 404, description = "Item not found", body = ErrorBody),
        (status = 422, description = "Unprocessable Entity", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    )
)]
#[instrument(skip_all, fields(id))]
pub(crate) async fn update_item(
    ItemsId(id): ItemsId,
    State(db): State<DbPool>,
    user: CurrentUser,
    Json(update): Json<ItemUpdate>,
) -> ApiResult<Json<Item>> {
    let update = Valid::new(update)?;
    let mut tx = db.begin().await?;
    let item = item_service::update_item(&mut tx, &user, id, update).await?;
    tx.commit().await?;
    Ok(Json(item))
}

/// Deletes an item.
#[utoipa::path(
    delete,
    path = "/api/items/{id}",
    security(("basic" = [])),
    responses(
        (status = 200, description = "Ok", body = Message),
        (status = 400, description = "Not enough permissions", body = ErrorBody),
        (status = 404, description = "Item not found", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    )
)]
#[instrument(skip_all, fields(id))]
pub(crate) async fn delete_item(
    ItemsId(id): ItemsId,
    State(db): State<DbPool>,
    user: CurrentUser,
) -> ApiResult<Json<Message>> {
    let mut tx = db.begin().await?;
    item_service::delete_item(&mut tx, &user, id).await?;
    tx.commit().await?;
    Ok(Json(Message {
        message: "Item deleted successfully".to_string(),
    }))
}

/// Searches items by case-insensitive substring match on title or
/// description, with the same ownership scoping as listing.
#[utoipa::path(
    get,
    path = "/api/items/search",
    params(SearchParams),
    security(("basic" = [])),
    responses(
        (status = 200, description = "Ok", body = ItemPage),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    )
)]
#[instrument(skip_all, fields(params))]
pub(crate) async fn search_items(
    ItemsSearch: ItemsSearch,
    State(db): State<DbPool>,
    user: CurrentUser,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<ItemPage>> {
    let pagination = PaginationParams::new(params.offset, params.limit);
    let mut tx = db.begin().await?;
    let (data, count) = item_service::search_items(&mut tx, &user, &params.q, &pagination).await?;
    tx.commit().await?;
    Ok(Json(ItemPage { data, count }))
}
