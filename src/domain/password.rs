//! Password value object.
//!
//! Holds a plaintext password that passed the length and strength rules.
//! It only lives long enough to be hashed; see [`Hasher`](super::Hasher).

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::config::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PasswordError {
    #[error("Password is too short")]
    TooShort,

    #[error("Password is too long")]
    TooLong,

    #[error(
        "Password should contain at least one uppercase letter, one lowercase letter, one digit, and one special character"
    )]
    TooWeak,
}

/// Character classes that must all be present.
static CHARACTER_CLASSES: Lazy<[Regex; 4]> = Lazy::new(|| {
    [r"[a-z]", r"[A-Z]", r"[0-9]", r"[!@#~$%^&*()+|_]"]
        .map(|pattern| Regex::new(pattern).expect("static password pattern"))
});

/// Validated plaintext password.
#[derive(Clone)]
pub struct Password(String);

// Never print the plaintext
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

impl Password {
    /// Parse raw user input. Length is checked before strength.
    pub fn parse(raw: &str) -> Result<Self, PasswordError> {
        let trimmed = raw.trim();
        let length = trimmed.chars().count();

        if length < MIN_PASSWORD_LENGTH {
            return Err(PasswordError::TooShort);
        }
        if length > MAX_PASSWORD_LENGTH {
            return Err(PasswordError::TooLong);
        }
        if !CHARACTER_CLASSES.iter().all(|class| class.is_match(trimmed)) {
            return Err(PasswordError::TooWeak);
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}
