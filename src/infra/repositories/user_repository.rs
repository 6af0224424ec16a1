//! User directory backed by the `users` table.

use std::time::Duration;

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use uuid::Uuid;

use super::bounded;
use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{Email, User};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. A taken email fails with `Conflict`.
    async fn save(&self, user: &User) -> AppResult<()>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> AppResult<Option<User>>;

    /// Overwrite every mutable column of an existing user.
    async fn update(&self, user: &User) -> AppResult<()>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
    timeout: Duration,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection, timeout: Duration) -> Self {
        Self { db, timeout }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn save(&self, user: &User) -> AppResult<()> {
        bounded(self.timeout, async {
            UserEntity::insert(ActiveModel::from(user))
                .exec_without_returning(&self.db)
                .await
                .map_err(|e| AppError::from_db(e, "Email", "User"))?;

            tracing::debug!(user_id = %user.id, "User saved");
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        bounded(self.timeout, async {
            let result = UserEntity::find_by_id(id).one(&self.db).await?;
            Ok(result.map(User::from))
        })
        .await
    }

    async fn find_by_email(&self, email: &Email) -> AppResult<Option<User>> {
        bounded(self.timeout, async {
            let result = UserEntity::find()
                .filter(user::Column::Email.eq(email.as_str()))
                .one(&self.db)
                .await?;
            Ok(result.map(User::from))
        })
        .await
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        bounded(self.timeout, async {
            let result = UserEntity::update_many()
                .col_expr(user::Column::Name, Expr::value(user.name.clone()))
                .col_expr(user::Column::Email, Expr::value(user.email.as_str().to_string()))
                .col_expr(user::Column::PasswordHash, Expr::value(user.password_hash.clone()))
                .col_expr(user::Column::Role, Expr::value(user.role.to_string()))
                .col_expr(user::Column::UpdatedAt, Expr::value(user.updated_at))
                .filter(user::Column::Id.eq(user.id))
                .exec(&self.db)
                .await
                .map_err(|e| AppError::from_db(e, "Email", "User"))?;

            if result.rows_affected == 0 {
                return Err(AppError::not_found("User"));
            }
            Ok(())
        })
        .await
    }
}
