//! Seed command - Ensures the default tags exist.

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{Database, TagRepository, TagStore};

/// Execute the seed command. Safe to run repeatedly.
pub async fn execute(config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;

    TagStore::new(db.get_connection(), config.db_timeout)
        .seed_defaults()
        .await
}
