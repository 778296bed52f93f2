//! One-shot demo data seeding.
//!
//! Runs at startup after migrations. If the configured first superuser
//! exists, a fixed set of sample items is created for it; otherwise seeding
//! is skipped silently. Seeding is not idempotent: running the binary again
//! inserts the samples again.

use crate::{
    feature::{item::item_repository, user::user_repository},
    infra::{config::SeedConfig, database::DbPool, error::ApiResult},
};
use tracing::instrument;

/// The sample items created for the first superuser.
const SAMPLE_ITEMS: [(&str, &str); 5] = [
    (
        "Welcome to the item API",
        "This is a sample item to demonstrate the application. You can create, edit, and delete items.",
    ),
    (
        "Project documentation",
        "Remember to update the README and add proper documentation for your project.",
    ),
    (
        "Database migrations",
        "Schema changes live in the migrations directory and are applied at startup.",
    ),
    (
        "API testing",
        "Try the endpoints from the interactive docs at /api/swagger-ui or with your favorite HTTP client.",
    ),
    (
        "Client integration",
        "The OpenAPI document at /api/openapi.json can be used to generate typed clients.",
    ),
];

/// Creates the sample items owned by the configured superuser.
/// Does nothing if that user does not exist yet.
#[instrument(skip(db))]
pub async fn seed_demo_items(db: &DbPool, config: &SeedConfig) -> ApiResult<()> {
    let mut tx = db.begin().await?;

    let Some(superuser) =
        user_repository::find_user_by_email(&mut tx, &config.first_superuser).await?
    else {
        tracing::info!(
            "Superuser {} does not exist, skipping demo items",
            config.first_superuser
        );
        return Ok(());
    };

    for (title, description) in SAMPLE_ITEMS {
        let new_item = item_repository::NewItem {
            title: title.to_string(),
            description: Some(description.to_string()),
        };
        item_repository::create_item(&mut tx, &new_item, superuser.id).await?;
    }
    tx.commit().await?;

    tracing::info!("Created {} sample items", SAMPLE_ITEMS.len());
    Ok(())
}
