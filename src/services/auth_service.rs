//! Authentication service - registration, login and session handling.
//!
//! Credentials are checked through the injected `Hasher`; sessions live in
//! the session store reached through the Unit of Work.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Email, Hasher, Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Well-formed digest verified when the email is unknown, so both failure
/// paths do the same hashing work.
const DUMMY_DIGEST: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an attendee account. Stops at the first failing step.
    async fn register(&self, name: &str, email: &str, password: &str) -> AppResult<User>;

    /// Verify credentials and open a session, returning its token.
    async fn login(&self, email: &str, password: &str) -> AppResult<(String, User)>;

    /// Close a session. Unknown tokens succeed.
    async fn logout(&self, token: &str) -> AppResult<()>;

    /// Resolve a session token to its user, or `Unauthorized`.
    async fn authenticate(&self, token: &str) -> AppResult<User>;
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    hasher: Arc<dyn Hasher>,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, hasher: Arc<dyn Hasher>) -> Self {
        Self { uow, hasher }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, name: &str, email: &str, password: &str) -> AppResult<User> {
        let email = Email::parse(email)?;
        let password = Password::parse(password)?;
        let digest = self.hasher.hash(password.expose())?;
        let user = User::new(name, email, digest)?;

        self.uow.users().save(&user).await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    async fn login(&self, email: &str, password: &str) -> AppResult<(String, User)> {
        let email = Email::parse(email)?;
        let password = Password::parse(password)?;

        let found = self.uow.users().find_by_email(&email).await?;
        let digest = found
            .as_ref()
            .map_or(DUMMY_DIGEST, |user| user.password_hash.as_str());
        let password_valid = self.hasher.verify(password.expose(), digest);

        let user = match found {
            Some(user) if password_valid => user,
            Some(user) => {
                tracing::debug!(user_id = %user.id, "Login rejected: password mismatch");
                return Err(AppError::InvalidCredentials);
            }
            None => {
                tracing::debug!("Login rejected: unknown email");
                return Err(AppError::InvalidCredentials);
            }
        };

        let token = self.uow.sessions().create(&user.email).await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User logged in");
        Ok((token, user))
    }

    async fn logout(&self, token: &str) -> AppResult<()> {
        self.uow.sessions().delete(token).await
    }

    async fn authenticate(&self, token: &str) -> AppResult<User> {
        match self.uow.sessions().resolve(token).await {
            Ok(user) => Ok(user),
            Err(AppError::NotFound(_)) => Err(AppError::Unauthorized),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MockHasher;
    use crate::infra::{MockEventRepository, MockSessionRepository, MockTagRepository, MockUserRepository};
    use crate::services::test_support::StubUow;
    use mockall::predicate::eq;

    fn stored_user(email: &str) -> User {
        User::new("Ada", Email::parse(email).unwrap(), "stored-digest".to_string()).unwrap()
    }

    fn service(
        users: MockUserRepository,
        sessions: MockSessionRepository,
        hasher: MockHasher,
    ) -> Authenticator<StubUow> {
        let uow = StubUow::new(users, sessions, MockTagRepository::new(), MockEventRepository::new());
        Authenticator::new(uow, Arc::new(hasher))
    }

    #[tokio::test]
    async fn test_register_persists_attendee() {
        let mut users = MockUserRepository::new();
        users
            .expect_save()
            .withf(|user| user.email.as_str() == "ada@example.com" && user.password_hash == "digest")
            .times(1)
            .returning(|_| Ok(()));

        let mut hasher = MockHasher::new();
        hasher.expect_hash().returning(|_| Ok("digest".to_string()));

        let auth = service(users, MockSessionRepository::new(), hasher);
        let user = auth
            .register("Ada", " Ada@Example.com ", "Secret1!")
            .await
            .unwrap();

        assert!(!user.is_host());
        assert_eq!(user.name, "Ada");
    }

    #[tokio::test]
    async fn test_register_stops_at_first_failure() {
        // Neither the hasher nor the store may be touched
        let auth = service(
            MockUserRepository::new(),
            MockSessionRepository::new(),
            MockHasher::new(),
        );

        let bad_email = auth.register("Ada", "not-an-email", "Secret1!").await;
        assert!(matches!(bad_email, Err(AppError::Validation(msg)) if msg == "Email is in invalid format"));

        let weak = auth.register("Ada", "ada@example.com", "secret11").await;
        assert!(matches!(weak, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut users = MockUserRepository::new();
        users
            .expect_save()
            .returning(|_| Err(AppError::conflict("Email")));

        let mut hasher = MockHasher::new();
        hasher.expect_hash().returning(|_| Ok("digest".to_string()));

        let auth = service(users, MockSessionRepository::new(), hasher);
        let result = auth.register("Ada", "ada@example.com", "Secret1!").await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_login_issues_session() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|email| Ok(Some(stored_user(email.as_str()))));

        let mut sessions = MockSessionRepository::new();
        sessions
            .expect_create()
            .times(1)
            .returning(|_| Ok("token-123".to_string()));

        let mut hasher = MockHasher::new();
        hasher
            .expect_verify()
            .with(eq("Secret1!"), eq("stored-digest"))
            .returning(|_, _| true);

        let auth = service(users, sessions, hasher);
        let (token, user) = auth.login("ada@example.com", "Secret1!").await.unwrap();

        assert_eq!(token, "token-123");
        assert_eq!(user.email.as_str(), "ada@example.com");
    }

    #[tokio::test]
    async fn test_login_failures_are_uniform() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|email| {
            if email.as_str() == "ada@example.com" {
                Ok(Some(stored_user("ada@example.com")))
            } else {
                Ok(None)
            }
        });

        let mut hasher = MockHasher::new();
        // The unknown email still goes through verification, against the dummy digest
        hasher
            .expect_verify()
            .with(eq("Secret1!"), eq(DUMMY_DIGEST))
            .times(1)
            .returning(|_, _| false);
        hasher
            .expect_verify()
            .with(eq("Wrong1!!"), eq("stored-digest"))
            .times(1)
            .returning(|_, _| false);

        let auth = service(users, MockSessionRepository::new(), hasher);

        let unknown = auth.login("nobody@example.com", "Secret1!").await.unwrap_err();
        let mismatch = auth.login("ada@example.com", "Wrong1!!").await.unwrap_err();

        assert!(matches!(unknown, AppError::InvalidCredentials));
        assert!(matches!(mismatch, AppError::InvalidCredentials));
        assert_eq!(unknown.to_string(), mismatch.to_string());
    }

    #[tokio::test]
    async fn test_authenticate_maps_missing_session() {
        let mut sessions = MockSessionRepository::new();
        sessions
            .expect_resolve()
            .returning(|_| Err(AppError::not_found("Session")));

        let auth = service(MockUserRepository::new(), sessions, MockHasher::new());
        let result = auth.authenticate("stale").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_authenticate_passes_store_errors() {
        let mut sessions = MockSessionRepository::new();
        sessions.expect_resolve().returning(|_| Err(AppError::Timeout));

        let auth = service(MockUserRepository::new(), sessions, MockHasher::new());

        assert!(matches!(auth.authenticate("t").await, Err(AppError::Timeout)));
    }
}
