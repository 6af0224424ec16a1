//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connection and migrations
//! - Repositories over the relational store
//! - Unit of Work for store access and transactions
//! - The argon2 password hasher

pub mod db;
pub mod repositories;
pub mod security;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    EventRepository, EventStore, SessionRepository, SessionStore, TagRepository, TagStore,
    UserRepository, UserStore,
};
pub use security::Argon2Hasher;
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockEventRepository, MockSessionRepository, MockTagRepository, MockUserRepository,
};
