//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{AuthService, EventService, ServiceContainer, Services, UserService};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub event_service: Arc<dyn EventService>,
    pub database: Arc<Database>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire the production services over the database connection.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let container = Services::from_connection(database.get_connection(), &config);
        Self::new(&container, database, config)
    }

    /// Build state from an already assembled service container.
    pub fn new(services: &impl ServiceContainer, database: Arc<Database>, config: Config) -> Self {
        Self {
            auth_service: services.auth(),
            user_service: services.users(),
            event_service: services.events(),
            database,
            config: Arc::new(config),
        }
    }
}
