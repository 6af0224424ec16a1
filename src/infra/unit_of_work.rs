//! Unit of Work pattern implementation.
//!
//! Centralizes access to the four stores and owns the transaction runner
//! that backs every multi-statement write.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use sea_orm::{
    AccessMode, ConnectionTrait, DatabaseBackend, DatabaseConnection, DatabaseTransaction,
    IsolationLevel, TransactionTrait,
};

use super::repositories::{
    EventRepository, EventStore, SessionRepository, SessionStore, TagRepository, TagStore,
    UserRepository, UserStore,
};
use crate::config::Config;
use crate::errors::AppResult;

/// Unit of Work trait for dependency injection.
///
/// Services are generic over this, so tests can hand them mock stores.
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn sessions(&self) -> Arc<dyn SessionRepository>;

    fn tags(&self) -> Arc<dyn TagRepository>;

    fn events(&self) -> Arc<dyn EventRepository>;
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    users: Arc<UserStore>,
    sessions: Arc<SessionStore>,
    tags: Arc<TagStore>,
    events: Arc<EventStore>,
}

impl Persistence {
    /// Build every store over one connection pool.
    pub fn new(db: DatabaseConnection, config: &Config) -> Self {
        let timeout = config.db_timeout;

        Self {
            users: Arc::new(UserStore::new(db.clone(), timeout)),
            sessions: Arc::new(SessionStore::new(db.clone(), timeout, config.session_ttl)),
            tags: Arc::new(TagStore::new(db.clone(), timeout)),
            events: Arc::new(EventStore::new(db, timeout)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn sessions(&self) -> Arc<dyn SessionRepository> {
        self.sessions.clone()
    }

    fn tags(&self) -> Arc<dyn TagRepository> {
        self.tags.clone()
    }

    fn events(&self) -> Arc<dyn EventRepository> {
        self.events.clone()
    }
}

/// Run `f` inside one transaction: commit on `Ok`, roll back on `Err`.
///
/// The closure must only talk to the store through the transaction it is given.
pub(crate) async fn in_transaction<F, T>(db: &DatabaseConnection, f: F) -> AppResult<T>
where
    F: for<'a> FnOnce(
            &'a DatabaseTransaction,
        ) -> Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>
        + Send,
    T: Send,
{
    // SQLite has no per-transaction isolation settings
    let (isolation, access) = match db.get_database_backend() {
        DatabaseBackend::Postgres => (
            Some(IsolationLevel::ReadCommitted),
            Some(AccessMode::ReadWrite),
        ),
        _ => (None, None),
    };

    let txn = db.begin_with_config(isolation, access).await?;

    match f(&txn).await {
        Ok(result) => {
            txn.commit().await?;
            Ok(result)
        }
        Err(e) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!("Transaction rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}
