//! Convenly - event discovery and RSVP API
//!
//! Users register, log in with server-side sessions, become hosts, publish
//! events and register to attend them.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Value objects, entities and the hashing capability
//! - **services**: Application use cases
//! - **infra**: Database, repositories, Unit of Work and the argon2 hasher
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server (migrates and seeds tags first)
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Seed the default tags
//! cargo run -- seed
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Email, Event, EventFilter, Password, Tag, User, UserRole};
pub use errors::{AppError, AppResult};
