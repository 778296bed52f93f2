//! A service for interacting with items.
//!
//! Single-item operations check existence before permission: a request for a
//! nonexistent id yields [`ClientError::NotFound`] for every caller, even one
//! that would otherwise be denied. This leaks existence to authenticated
//! callers and is part of the published contract.

use crate::{
    feature::item::item_repository::{self, Item, ItemUpdate, NewItem},
    infra::{
        database::DbConnection,
        error::{ApiResult, ClientError},
        pagination::PaginationParams,
        security::CurrentUser,
        validation::Valid,
    },
};
use tracing::instrument;
use uuid::Uuid;

const ITEM_NOT_FOUND: &str = "Item not found";

/// Creates a new item owned by the caller.
#[instrument(skip(conn))]
pub async fn create_item(
    conn: &mut DbConnection,
    user: &CurrentUser,
    new_item: Valid<NewItem>,
) -> ApiResult<Item> {
    item_repository::create_item(conn, new_item.inner(), user.id()).await
}

/// Reads an item, if the caller owns it or is a superuser.
#[instrument(skip(conn))]
pub async fn read_item(conn: &mut DbConnection, user: &CurrentUser, id: Uuid) -> ApiResult<Item> {
    let item = item_repository::fetch_item(conn, id)
        .await?
        .ok_or(ClientError::NotFound(ITEM_NOT_FOUND))?;
    if !user.can_access(item.owner_id) {
        return Err(ClientError::PermissionDenied.into());
    }
    Ok(item)
}

/// Lists items with the total count. Superusers see items across all owners,
/// everyone else only their own.
#[instrument(skip(conn))]
pub async fn list_items(
    conn: &mut DbConnection,
    user: &CurrentUser,
    params: &PaginationParams,
) -> ApiResult<(Vec<Item>, i64)> {
    let owner = (!user.is_superuser()).then(|| user.id());
    let items = item_repository::list_items(conn, owner, params).await?;
    let count = item_repository::count_items(conn, owner).await?;
    Ok((items, count))
}

/// Applies a partial update to an item, if the caller owns it or is a
/// superuser. Fields left out keep their previous value.
#[instrument(skip(conn))]
pub async fn update_item(
    conn: &mut DbConnection,
    user: &CurrentUser,
    id: Uuid,
    update: Valid<ItemUpdate>,
) -> ApiResult<Item> {
    let item = item_repository::fetch_item(conn, id)
        .await?
        .ok_or(ClientError::NotFound(ITEM_NOT_FOUND))?;
    if !user.can_access(item.owner_id) {
        return Err(ClientError::PermissionDenied.into());
    }
    let updated = item_repository::update_item(conn, id, update.inner())
        .await?
        .ok_or(ClientError::NotFound(ITEM_NOT_FOUND))?;
    Ok(updated)
}

/// Deletes an item, if the caller owns it or is a superuser.
#[instrument(skip(conn))]
pub async fn delete_item(conn: &mut DbConnection, user: &CurrentUser, id: Uuid) -> ApiResult<()> {
    let item = item_repository::fetch_item(conn, id)
        .await?
        .ok_or(ClientError::NotFound(ITEM_NOT_FOUND))?;
    if !user.can_access(item.owner_id) {
        return Err(ClientError::PermissionDenied.into());
    }
    item_repository::delete_item(conn, id).await?;
    Ok(())
}

/// Searches items by case-insensitive substring match on title or
/// description, with the same ownership scoping as [`list_items`].
/// An empty query matches all items.
#[instrument(skip(conn))]
pub async fn search_items(
    conn: &mut DbConnection,
    user: &CurrentUser,
    query: &str,
    params: &PaginationParams,
) -> ApiResult<(Vec<Item>, i64)> {
    let owner = (!user.is_superuser()).then(|| user.id());
    let items = item_repository::search_items(conn, query, owner, params).await?;
    let count = item_repository::count_search_items(conn, query, owner).await?;
    Ok((items, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::{pool::PoolConnection, Postgres};

    fn user() -> CurrentUser {
        CurrentUser::new(
            Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap(),
            false,
        )
    }

    fn admin() -> CurrentUser {
        CurrentUser::new(
            Uuid::parse_str("00000000-0000-0000-0000-000000000002").unwrap(),
            true,
        )
    }

    fn new_item(title: &str, description: Option<&str>) -> Valid<NewItem> {
        Valid::new(NewItem {
            title: title.to_string(),
            description: description.map(String::from),
        })
        .unwrap()
    }

    #[sqlx::test(fixtures("users"))]
    async fn created_item_can_be_read_back(mut conn: PoolConnection<Postgres>) {
        let user = user();
        let item = create_item(&mut conn, &user, new_item("Foo", Some("Fighters")))
            .await
            .unwrap();
        assert_eq!("Foo", item.title);
        assert_eq!(Some("Fighters".to_string()), item.description);
        assert_eq!(user.id(), item.owner_id);

        let fetched = read_item(&mut conn, &user, item.id).await.unwrap();
        assert_eq!(item, fetched);
    }

    #[sqlx::test(fixtures("users"))]
    async fn missing_item_gives_not_found_even_for_low_privilege_callers(
        mut conn: PoolConnection<Postgres>,
    ) {
        let id = Uuid::new_v4();
        for caller in [user(), admin()] {
            let result = read_item(&mut conn, &caller, id).await;
            assert!(matches!(
                result,
                Err(crate::infra::error::ApiError::ClientError(
                    ClientError::NotFound("Item not found")
                ))
            ));
        }
    }

    #[sqlx::test(fixtures("users"))]
    async fn non_owner_cannot_read_update_or_delete(mut conn: PoolConnection<Postgres>) {
        let item = create_item(&mut conn, &admin(), new_item("Admin's", None))
            .await
            .unwrap();

        let denied = |r: ApiResult<Item>| {
            matches!(
                r,
                Err(crate::infra::error::ApiError::ClientError(
                    ClientError::PermissionDenied
                ))
            )
        };

        assert!(denied(read_item(&mut conn, &user(), item.id).await));
        assert!(denied(
            update_item(
                &mut conn,
                &user(),
                item.id,
                Valid::new(ItemUpdate::default()).unwrap()
            )
            .await
        ));
        let result = delete_item(&mut conn, &user(), item.id).await;
        assert!(matches!(
            result,
            Err(crate::infra::error::ApiError::ClientError(
                ClientError::PermissionDenied
            ))
        ));
    }

    #[sqlx::test(fixtures("users"))]
    async fn superuser_can_access_other_owners_items(mut conn: PoolConnection<Postgres>) {
        let item = create_item(&mut conn, &user(), new_item("User's", None))
            .await
            .unwrap();
        let fetched = read_item(&mut conn, &admin(), item.id).await.unwrap();
        assert_eq!(item, fetched);
    }

    #[sqlx::test(fixtures("users"))]
    async fn list_scopes_to_owner_and_counts_all_matches(mut conn: PoolConnection<Postgres>) {
        create_item(&mut conn, &admin(), new_item("A1", None))
            .await
            .unwrap();
        create_item(&mut conn, &admin(), new_item("A2", None))
            .await
            .unwrap();
        create_item(&mut conn, &user(), new_item("U1", None))
            .await
            .unwrap();

        let (items, count) = list_items(&mut conn, &user(), &PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(1, items.len());
        assert_eq!(1, count);
        assert_eq!(user().id(), items[0].owner_id);

        let (items, count) = list_items(&mut conn, &admin(), &PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(3, items.len());
        assert_eq!(3, count);

        // Count reflects the full matching set, not the returned page.
        let page = PaginationParams::new(None, Some(1));
        let (items, count) = list_items(&mut conn, &admin(), &page).await.unwrap();
        assert_eq!(1, items.len());
        assert_eq!(3, count);
    }

    #[sqlx::test(fixtures("users"))]
    async fn update_is_partial(mut conn: PoolConnection<Postgres>) {
        let user = user();
        let item = create_item(&mut conn, &user, new_item("Old title", Some("Old description")))
            .await
            .unwrap();

        let update = Valid::new(ItemUpdate {
            title: Some("New title".to_string()),
            description: None,
        })
        .unwrap();
        let updated = update_item(&mut conn, &user, item.id, update).await.unwrap();
        assert_eq!("New title", updated.title);
        assert_eq!(Some("Old description".to_string()), updated.description);
        assert_eq!(item.id, updated.id);
        assert_eq!(item.owner_id, updated.owner_id);

        let update = Valid::new(ItemUpdate {
            title: None,
            description: Some("New description".to_string()),
        })
        .unwrap();
        let updated = update_item(&mut conn, &user, item.id, update).await.unwrap();
        assert_eq!("New title", updated.title);
        assert_eq!(Some("New description".to_string()), updated.description);
    }

    #[sqlx::test(fixtures("users"))]
    async fn deleted_item_is_gone(mut conn: PoolConnection<Postgres>) {
        let user = user();
        let item = create_item(&mut conn, &user, new_item("Doomed", None))
            .await
            .unwrap();
        delete_item(&mut conn, &user, item.id).await.unwrap();
        let result = read_item(&mut conn, &user, item.id).await;
        assert!(matches!(
            result,
            Err(crate::infra::error::ApiError::ClientError(
                ClientError::NotFound("Item not found")
            ))
        ));
    }

    #[sqlx::test(fixtures("users"))]
    async fn search_matches_title_or_description_case_insensitively(
        mut conn: PoolConnection<Postgres>,
    ) {
        let admin = admin();
        create_item(&mut conn, &admin, new_item("Test Item", Some("This is a test item")))
            .await
            .unwrap();
        create_item(
            &mut conn,
            &admin,
            new_item("Another Item", Some("This contains test in description")),
        )
        .await
        .unwrap();
        create_item(&mut conn, &admin, new_item("Unrelated", Some("This won't match")))
            .await
            .unwrap();

        let params = PaginationParams::default();
        let (_, count) = search_items(&mut conn, &admin, "Test", &params).await.unwrap();
        assert_eq!(2, count);
        let (_, count) = search_items(&mut conn, &admin, "test", &params).await.unwrap();
        assert_eq!(2, count);
        let (items, count) = search_items(&mut conn, &admin, "nonexistent", &params)
            .await
            .unwrap();
        assert_eq!(0, count);
        assert!(items.is_empty());
    }

    #[sqlx::test(fixtures("users"))]
    async fn search_scopes_to_owner(mut conn: PoolConnection<Postgres>) {
        create_item(&mut conn, &admin(), new_item("User Item", Some("the admin's")))
            .await
            .unwrap();
        create_item(&mut conn, &user(), new_item("User Item", Some("the user's")))
            .await
            .unwrap();

        let (items, count) = search_items(&mut conn, &user(), "User", &PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(1, count);
        assert_eq!(user().id(), items[0].owner_id);
    }

    #[sqlx::test(fixtures("users"))]
    async fn empty_query_matches_all_items(mut conn: PoolConnection<Postgres>) {
        create_item(&mut conn, &admin(), new_item("One", None))
            .await
            .unwrap();
        create_item(&mut conn, &admin(), new_item("Two", Some("described")))
            .await
            .unwrap();

        let (items, count) = search_items(&mut conn, &admin(), "", &PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(2, count);
        assert_eq!(2, items.len());
    }
}
