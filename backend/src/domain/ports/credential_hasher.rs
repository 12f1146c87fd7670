//! Driven port for one-way password hashing.

use crate::domain::{Password, PasswordHash};

use super::define_port_error;

define_port_error! {
    /// Failures raised by credential hashers.
    pub enum CredentialHasherError {
        /// The hash could not be produced (for example bad cost parameters).
        Hashing { message: String } => "password hashing failed: {message}",
        /// A stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Salted, adaptive-cost password hashing.
///
/// Every call to [`CredentialHasher::hash`] uses a fresh random salt, so the
/// same password never produces the same output twice. Implementations are
/// CPU bound and synchronous.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    /// Produce an encoded hash of `password`.
    fn hash(&self, password: &Password) -> Result<PasswordHash, CredentialHasherError>;

    /// Report whether `password` matches `hash`.
    fn verify(&self, hash: &PasswordHash, password: &Password)
    -> Result<bool, CredentialHasherError>;
}
