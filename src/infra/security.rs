//! Authentication and authorization.
//!
//! Callers authenticate with HTTP Basic credentials (email and password),
//! verified against the `users` table. The resulting [`CurrentUser`] is the
//! identity every item operation is performed as, and carries the ownership
//! guard used by single-item reads, updates and deletes.

use super::{
    database::{DbConnection, DbPool},
    error::{ApiError, ApiResult, ClientError},
};
use crate::feature::user::user_repository;
use axum::{async_trait, extract::FromRef, extract::FromRequestParts, RequestPartsExt};
use axum_extra::{
    headers::{authorization::Basic, Authorization},
    TypedHeader,
};
use http::request::Parts;
use tracing::instrument;
use uuid::Uuid;

/// The authenticated caller of a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    id: Uuid,
    is_superuser: bool,
}

impl CurrentUser {
    pub fn new(id: Uuid, is_superuser: bool) -> Self {
        Self { id, is_superuser }
    }

    /// The caller's user id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Whether the caller has unrestricted access to all items.
    pub fn is_superuser(&self) -> bool {
        self.is_superuser
    }

    /// Whether the caller may read, update or delete a resource
    /// owned by `owner_id`. Superusers may access everything,
    /// everyone else only their own resources.
    pub fn can_access(&self, owner_id: Uuid) -> bool {
        self.is_superuser || self.id == owner_id
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    DbPool: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Get authorization header
        let TypedHeader(auth) = parts
            .extract::<TypedHeader<Authorization<Basic>>>()
            .await
            .map_err(|_| ClientError::Unauthorized)?;

        // Get db connection
        let db = DbPool::from_ref(state);
        let mut conn = db.acquire().await.map_err(ApiError::from)?;

        // Authenticate user
        let user = authenticate(&mut conn, auth.username(), auth.password()).await?;

        Ok(user)
    }
}

/// Validate a user's password.
#[instrument(skip(conn, password))]
pub async fn authenticate(
    conn: &mut DbConnection,
    email: &str,
    password: &str,
) -> ApiResult<CurrentUser> {
    tracing::debug!("Fetching user {}", email);
    let user = user_repository::find_user_by_email(conn, email)
        .await?
        .ok_or(ClientError::Unauthorized)?;

    tracing::debug!("Verifying password");
    let password_is_ok = bcrypt::verify(password, &user.hashed_password)?;
    if password_is_ok {
        Ok(CurrentUser::new(user.id, user.is_superuser))
    } else {
        Err(ClientError::Unauthorized.into())
    }
}

#[cfg(test)]
mod tests {
    use super::{authenticate, CurrentUser};
    use crate::infra::error::{ApiError, ClientError};
    use sqlx::{pool::PoolConnection, Postgres};
    use uuid::Uuid;

    #[test]
    fn superuser_can_access_other_owners() {
        let superuser = CurrentUser::new(Uuid::new_v4(), true);
        assert!(superuser.can_access(Uuid::new_v4()));
    }

    #[test]
    fn owner_can_access_own_resources_only() {
        let id = Uuid::new_v4();
        let user = CurrentUser::new(id, false);
        assert!(user.can_access(id));
        assert!(!user.can_access(Uuid::new_v4()));
    }

    #[sqlx::test(fixtures("users"))]
    async fn user_with_correct_password_can_login(mut conn: PoolConnection<Postgres>) {
        let user = authenticate(&mut conn, "user@example.com", "secret")
            .await
            .unwrap();
        assert!(!user.is_superuser());

        let admin = authenticate(&mut conn, "admin@example.com", "secret")
            .await
            .unwrap();
        assert!(admin.is_superuser());
    }

    #[sqlx::test(fixtures("users"))]
    async fn user_with_incorrect_password_cannot_login(mut conn: PoolConnection<Postgres>) {
        let result = authenticate(&mut conn, "user@example.com", "notsecret").await;
        assert!(matches!(
            result,
            Err(ApiError::ClientError(ClientError::Unauthorized))
        ));
    }

    #[sqlx::test]
    async fn unknown_user_cannot_login(mut conn: PoolConnection<Postgres>) {
        let result = authenticate(&mut conn, "nobody@example.com", "secret").await;
        assert!(matches!(
            result,
            Err(ApiError::ClientError(ClientError::Unauthorized))
        ));
    }
}
