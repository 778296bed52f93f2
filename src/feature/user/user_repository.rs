//! Types and functions for loading users from the database.
//!
//! Users are managed elsewhere; this application only reads them for
//! authentication and for seeding demo data.

use crate::infra::{database::DbConnection, error::ApiResult};
use sqlx::FromRow;
use tracing::instrument;
use uuid::Uuid;

/// A user row.
#[derive(Clone, Debug, FromRow)]
pub struct User {
    /// The user's id.
    pub id: Uuid,
    /// The user's email, used as the login name.
    pub email: String,
    /// The bcrypt hash of the user's password.
    pub hashed_password: String,
    /// Whether the user has unrestricted access to all items.
    pub is_superuser: bool,
}

/// Looks up a user by email.
#[instrument(skip(conn))]
pub async fn find_user_by_email(conn: &mut DbConnection, email: &str) -> ApiResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, hashed_password, is_superuser FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(user)
}
