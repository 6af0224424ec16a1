//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.
//! Every store call is bounded by the configured store timeout.

use std::future::Future;
use std::time::Duration;

use crate::errors::{AppError, AppResult};

pub(crate) mod entities;
mod event_repository;
mod session_repository;
mod tag_repository;
mod user_repository;

pub use event_repository::{EventRepository, EventStore};
pub use session_repository::{SessionRepository, SessionStore};
pub use tag_repository::{TagRepository, TagStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use event_repository::MockEventRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use session_repository::MockSessionRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use tag_repository::MockTagRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;

/// Run a store operation, failing with [`AppError::Timeout`] once `limit` elapses.
///
/// The operation future is dropped on timeout; an open transaction inside it
/// rolls back when dropped.
pub(crate) async fn bounded<T, F>(limit: Duration, operation: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(limit_ms = limit.as_millis() as u64, "Store operation timed out");
            Err(AppError::Timeout)
        }
    }
}
