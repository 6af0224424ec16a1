//! Domain layer - Core business entities and logic
//!
//! Value objects (Email, Password), entities (User, Event, Tag) and the
//! hashing capability the services depend on. No I/O lives here.

pub mod email;
pub mod event;
pub mod hasher;
pub mod password;
pub mod tag;
pub mod user;

pub use email::{Email, EmailError};
pub use event::{normalize_tag_names, Event, EventFilter, NewEvent};
pub use hasher::Hasher;
pub use password::{Password, PasswordError};
pub use tag::Tag;
pub use user::{User, UserResponse, UserRole};

#[cfg(any(test, feature = "test-utils"))]
pub use hasher::MockHasher;
