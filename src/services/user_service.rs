//! User service - Handles user-related business logic.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Email, User};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    async fn get_by_email(&self, email: &Email) -> AppResult<User>;

    /// Grant the host role. Promoting a host is a no-op.
    async fn promote_to_host(&self, id: Uuid) -> AppResult<User>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow.users().find_by_id(id).await?.ok_or_not_found("User")
    }

    async fn get_by_email(&self, email: &Email) -> AppResult<User> {
        self.uow
            .users()
            .find_by_email(email)
            .await?
            .ok_or_not_found("User")
    }

    async fn promote_to_host(&self, id: Uuid) -> AppResult<User> {
        let mut user = self.get_user(id).await?;

        if user.promote_to_host() {
            self.uow.users().update(&user).await?;
            tracing::info!(user_id = %user.id, "User promoted to host");
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::errors::AppError;
    use crate::infra::{MockEventRepository, MockSessionRepository, MockTagRepository, MockUserRepository};
    use crate::services::test_support::StubUow;
    use tokio_test::{assert_err, assert_ok};

    fn manager(users: MockUserRepository) -> UserManager<StubUow> {
        UserManager::new(StubUow::new(
            users,
            MockSessionRepository::new(),
            MockTagRepository::new(),
            MockEventRepository::new(),
        ))
    }

    fn attendee() -> User {
        User::new("Ada", Email::parse("ada@example.com").unwrap(), "d".into()).unwrap()
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let err = assert_err!(manager(users).get_user(Uuid::new_v4()).await);
        assert!(matches!(err, AppError::NotFound(r) if r == "User"));
    }

    #[tokio::test]
    async fn test_promote_persists_once() {
        let user = attendee();
        let id = user.id;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        users
            .expect_update()
            .withf(|u| u.role == UserRole::Host)
            .times(1)
            .returning(|_| Ok(()));

        let promoted = assert_ok!(manager(users).promote_to_host(id).await);
        assert!(promoted.is_host());
    }

    #[tokio::test]
    async fn test_promote_host_is_noop() {
        let mut host = attendee();
        host.promote_to_host();

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(host.clone())));
        users.expect_update().never();

        let result = manager(users).promote_to_host(Uuid::new_v4()).await.unwrap();
        assert!(result.is_host());
    }
}
