//! Tag registry with find-or-create semantics.

use std::time::Duration;

use async_trait::async_trait;
use sea_orm::{
    sea_query::OnConflict, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, SqlErr,
};

use super::bounded;
use super::entities::{tag, TagEntity};
use crate::config::DEFAULT_TAGS;
use crate::domain::Tag;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// All tags ordered by name.
    async fn find_all(&self) -> AppResult<Vec<Tag>>;

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Tag>>;

    /// Return the tag called `name`, inserting it first when absent.
    ///
    /// Safe under concurrent callers: a lost insert race resolves to the winner's row.
    async fn create_if_not_exists(&self, name: &str) -> AppResult<Tag>;

    /// Ensure every default tag exists.
    async fn seed_defaults(&self) -> AppResult<()>;
}

pub struct TagStore {
    db: DatabaseConnection,
    timeout: Duration,
}

impl TagStore {
    pub fn new(db: DatabaseConnection, timeout: Duration) -> Self {
        Self { db, timeout }
    }

    async fn lookup(&self, name: &str) -> AppResult<Option<Tag>> {
        let found = TagEntity::find()
            .filter(tag::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        Ok(found.map(Tag::from))
    }

    async fn find_or_insert(&self, name: &str) -> AppResult<Tag> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Tag name is required"));
        }

        if let Some(existing) = self.lookup(name).await? {
            return Ok(existing);
        }

        let model = tag::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        };
        let inserted = TagEntity::insert(model)
            .on_conflict(OnConflict::column(tag::Column::Name).do_nothing().to_owned())
            .exec_without_returning(&self.db)
            .await;

        match inserted {
            Ok(_) => {}
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                tracing::debug!(tag = name, "Tag inserted concurrently");
            }
            Err(err) => return Err(err.into()),
        }

        self.lookup(name)
            .await?
            .ok_or_else(|| AppError::internal(format!("Tag '{}' missing after insert", name)))
    }
}

#[async_trait]
impl TagRepository for TagStore {
    async fn find_all(&self) -> AppResult<Vec<Tag>> {
        bounded(self.timeout, async {
            let tags = TagEntity::find()
                .order_by_asc(tag::Column::Name)
                .all(&self.db)
                .await?;
            Ok(tags.into_iter().map(Tag::from).collect())
        })
        .await
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Tag>> {
        bounded(self.timeout, self.lookup(name.trim())).await
    }

    async fn create_if_not_exists(&self, name: &str) -> AppResult<Tag> {
        bounded(self.timeout, self.find_or_insert(name)).await
    }

    async fn seed_defaults(&self) -> AppResult<()> {
        for name in DEFAULT_TAGS {
            bounded(self.timeout, self.find_or_insert(name)).await?;
        }

        tracing::info!(count = DEFAULT_TAGS.len(), "Default tags seeded");
        Ok(())
    }
}
