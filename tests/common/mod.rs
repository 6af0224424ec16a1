//! Shared fixtures for integration tests: an in-memory SQLite store migrated
//! with the production migrator, plus a cheap hasher.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use chrono::{TimeZone, Utc};
use sea_orm::{ConnectOptions, Database as SeaDatabase, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use convenly::api::{create_router, AppState};
use convenly::config::Config;
use convenly::domain::{Email, Event, Hasher, NewEvent, User};
use convenly::errors::AppResult;
use convenly::infra::{Database, Migrator, Persistence, TagRepository, UnitOfWork, UserRepository};
use convenly::services::{Authenticator, EventManager, Services, UserManager};

/// Salted but instant stand-in for argon2: `<random salt>:<plaintext>`.
pub struct FastHasher;

impl Hasher for FastHasher {
    fn hash(&self, plaintext: &str) -> AppResult<String> {
        Ok(format!("{}:{}", Uuid::new_v4().simple(), plaintext))
    }

    fn verify(&self, plaintext: &str, digest: &str) -> bool {
        digest
            .split_once(':')
            .map_or(false, |(_, stored)| stored == plaintext)
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        db_timeout: Duration::from_secs(5),
        cookie_secure: false,
        ..Config::default()
    }
}

/// Fresh, migrated, seeded database. One connection, so the in-memory data
/// lives as long as the pool.
pub async fn connect() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = SeaDatabase::connect(options).await.expect("sqlite connect");
    Migrator::up(&db, None).await.expect("migrations");
    db
}

pub struct TestContext {
    pub db: DatabaseConnection,
    pub config: Config,
    pub uow: Arc<Persistence>,
    pub services: Services,
}

impl TestContext {
    pub async fn new() -> Self {
        let db = connect().await;
        let config = test_config();
        let uow = Arc::new(Persistence::new(db.clone(), &config));
        uow.tags().seed_defaults().await.expect("seed tags");

        let services = Services::new(
            Arc::new(Authenticator::new(uow.clone(), Arc::new(FastHasher))),
            Arc::new(UserManager::new(uow.clone())),
            Arc::new(EventManager::new(uow.clone())),
        );

        Self {
            db,
            config,
            uow,
            services,
        }
    }

    pub fn router(&self) -> Router {
        let database = Arc::new(Database::from_connection(self.db.clone()));
        create_router(AppState::new(&self.services, database, self.config.clone()))
    }

    /// Insert a user directly, bypassing registration.
    pub async fn user(&self, email: &str) -> User {
        let user = User::new("Test User", Email::parse(email).unwrap(), "x:pw".into()).unwrap();
        self.uow.users().save(&user).await.unwrap();
        user
    }

    pub async fn host(&self, email: &str) -> User {
        let mut user = self.user(email).await;
        user.promote_to_host();
        self.uow.users().update(&user).await.unwrap();
        user
    }

    /// Persist an event dated `2025-<month>-<day> 12:00 UTC`.
    pub async fn event(&self, organizer: &User, name: &str, month: u32, day: u32, fee: f64, tags: &[&str]) -> Event {
        let event = NewEvent {
            name: name.to_string(),
            description: format!("{} description", name),
            date: Utc.with_ymd_and_hms(2025, month, day, 12, 0, 0).unwrap(),
            latitude: 52.23,
            longitude: 21.01,
            fee,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
        .into_event(organizer.id)
        .unwrap();

        self.uow.events().save(&event).await.unwrap();
        event
    }
}
