//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Email;
use crate::config::{MAX_NAME_LENGTH, MIN_NAME_LENGTH, ROLE_ATTENDEE, ROLE_HOST};
use crate::errors::{AppError, AppResult};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Attendee,
    Host,
}

impl UserRole {
    /// Check if this role may create and delete events
    pub fn is_host(&self) -> bool {
        matches!(self, UserRole::Host)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Attendee => ROLE_ATTENDEE,
            UserRole::Host => ROLE_HOST,
        }
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_HOST => UserRole::Host,
            _ => UserRole::Attendee,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: Email,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new attendee. The name is trimmed and length-checked.
    pub fn new(name: &str, email: Email, password_hash: String) -> AppResult<Self> {
        let name = validate_name(name)?;
        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            role: UserRole::Attendee,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_host(&self) -> bool {
        self.role.is_host()
    }

    /// Grant the host role. Returns false if the user already was a host.
    pub fn promote_to_host(&mut self) -> bool {
        if self.is_host() {
            return false;
        }
        self.role = UserRole::Host;
        self.updated_at = Utc::now();
        true
    }
}

fn validate_name(raw: &str) -> AppResult<String> {
    let name = raw.trim();
    let length = name.chars().count();

    if length < MIN_NAME_LENGTH {
        return Err(AppError::validation("Name is too short"));
    }
    if length > MAX_NAME_LENGTH {
        return Err(AppError::validation("Name is too long"));
    }
    Ok(name.to_string())
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// User display name
    #[schema(example = "Jane Doe")]
    pub name: String,
    /// Canonical (lower-cased) email address
    #[schema(example = "jane@example.com")]
    pub email: String,
    pub role: UserRole,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email.into(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}
