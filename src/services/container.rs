//! Service Container - Centralized service access.

use std::sync::Arc;

use super::{AuthService, Authenticator, EventManager, EventService, UserManager, UserService};
use crate::config::Config;
use crate::infra::{Argon2Hasher, Persistence};

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn events(&self) -> Arc<dyn EventService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    event_service: Arc<dyn EventService>,
}

impl Services {
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        event_service: Arc<dyn EventService>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            event_service,
        }
    }

    /// Wire every service over one Unit of Work and the argon2 hasher.
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: &Config) -> Self {
        let uow = Arc::new(Persistence::new(db, config));
        let hasher = Arc::new(Argon2Hasher::new());

        Self::new(
            Arc::new(Authenticator::new(uow.clone(), hasher)),
            Arc::new(UserManager::new(uow.clone())),
            Arc::new(EventManager::new(uow)),
        )
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn events(&self) -> Arc<dyn EventService> {
        self.event_service.clone()
    }
}
