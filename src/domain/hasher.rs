//! Credential hashing capability.

use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// One-way, salted password hashing.
///
/// Hashing the same plaintext twice yields different digests; both verify.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait Hasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> AppResult<String>;

    /// Returns false for a mismatch and for a digest it cannot parse.
    fn verify(&self, plaintext: &str, digest: &str) -> bool;
}
