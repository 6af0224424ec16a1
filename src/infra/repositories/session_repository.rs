//! Session store: opaque tokens mapped to users.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, RngCore};
use sea_orm::{ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use super::bounded;
use super::entities::{session, user, SessionEntity, UserEntity};
use crate::config::SESSION_TOKEN_BYTES;
use crate::domain::{Email, User};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Mint and persist a token for the user owning `email`.
    async fn create(&self, email: &Email) -> AppResult<String>;

    /// Owner of a live session. Unknown or expired tokens give `NotFound("Session")`.
    async fn resolve(&self, token: &str) -> AppResult<User>;

    /// Remove a session. Unknown tokens are ignored.
    async fn delete(&self, token: &str) -> AppResult<()>;
}

pub struct SessionStore {
    db: DatabaseConnection,
    timeout: Duration,
    ttl: Option<chrono::Duration>,
}

impl SessionStore {
    pub fn new(db: DatabaseConnection, timeout: Duration, ttl: Option<chrono::Duration>) -> Self {
        Self { db, timeout, ttl }
    }

    fn is_expired(&self, created_at: chrono::DateTime<chrono::Utc>) -> bool {
        expired(created_at, self.ttl, chrono::Utc::now())
    }
}

/// A lifetime reaching past the representable range never expires.
fn expired(
    created_at: chrono::DateTime<chrono::Utc>,
    ttl: Option<chrono::Duration>,
    now: chrono::DateTime<chrono::Utc>,
) -> bool {
    ttl.and_then(|ttl| created_at.checked_add_signed(ttl))
        .map_or(false, |deadline| deadline <= now)
}

/// 256 bits from the OS generator, URL-safe base64 without padding.
fn generate_token() -> String {
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[async_trait]
impl SessionRepository for SessionStore {
    async fn create(&self, email: &Email) -> AppResult<String> {
        bounded(self.timeout, async {
            let owner = UserEntity::find()
                .filter(user::Column::Email.eq(email.as_str()))
                .one(&self.db)
                .await?
                .ok_or_else(|| AppError::not_found("User"))?;

            let token = generate_token();
            let model = session::ActiveModel {
                token: Set(token.clone()),
                user_id: Set(owner.id),
                created_at: Set(chrono::Utc::now()),
            };
            SessionEntity::insert(model)
                .exec_without_returning(&self.db)
                .await
                .map_err(|e| AppError::from_db(e, "Session", "User"))?;

            tracing::debug!(user_id = %owner.id, "Session created");
            Ok(token)
        })
        .await
    }

    async fn resolve(&self, token: &str) -> AppResult<User> {
        bounded(self.timeout, async {
            let (session, owner) = SessionEntity::find_by_id(token.to_string())
                .find_also_related(UserEntity)
                .one(&self.db)
                .await?
                .ok_or_else(|| AppError::not_found("Session"))?;

            if self.is_expired(session.created_at) {
                tracing::debug!(user_id = %session.user_id, "Session expired");
                return Err(AppError::not_found("Session"));
            }

            owner
                .map(User::from)
                .ok_or_else(|| AppError::not_found("Session"))
        })
        .await
    }

    async fn delete(&self, token: &str) -> AppResult<()> {
        bounded(self.timeout, async {
            let result = SessionEntity::delete_by_id(token.to_string())
                .exec(&self.db)
                .await?;

            tracing::debug!(removed = result.rows_affected, "Session deleted");
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let token = generate_token();

        // 32 bytes encode to 43 characters without padding
        assert_eq!(token.len(), 43);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_expiry() {
        let now = chrono::Utc::now();
        let hour = chrono::Duration::hours(1);

        assert!(!expired(now, None, now));
        assert!(!expired(now, Some(hour), now));
        assert!(expired(now - hour * 2, Some(hour), now));
        assert!(expired(now, Some(chrono::Duration::zero()), now));
    }

    #[test]
    fn test_huge_ttl_never_expires() {
        let now = chrono::Utc::now();
        let ttl = chrono::Duration::try_hours(10_000_000_000).unwrap();

        assert!(!expired(now, Some(ttl), now));
        assert!(!expired(now, Some(chrono::Duration::MAX), now));
    }

    #[test]
    fn test_tokens_are_unique() {
        let tokens: std::collections::HashSet<String> = (0..64).map(|_| generate_token()).collect();
        assert_eq!(tokens.len(), 64);
    }
}
