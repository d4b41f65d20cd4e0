//! Password hashing port for room passwords.
//!
//! Hashing is CPU-bound and synchronous; callers on the async runtime
//! should expect it to take a few milliseconds.

use crate::domain::foundation::DomainError;

pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing hash string.
    fn hash(&self, plain: &str) -> Result<String, DomainError>;

    /// Check a plaintext password against a stored hash.
    ///
    /// # Errors
    ///
    /// - `InternalError` if the stored hash cannot be parsed
    fn verify(&self, plain: &str, hash: &str) -> Result<bool, DomainError>;
}
