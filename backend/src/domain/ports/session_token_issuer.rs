//! Driven port for signed, expiring session tokens.
//!
//! A token is either valid (signature verifies and the current instant is
//! before its expiry) or invalid. There is no revocation list; a leaked token
//! stays usable until it expires.

use chrono::{DateTime, Utc};

use crate::domain::{SessionIdentity, SessionToken, UserId};

use super::define_port_error;

define_port_error! {
    /// Failures raised while issuing or verifying tokens.
    pub enum SessionTokenError {
        /// Input is not a well-formed token.
        Malformed { message: String } => "session token is malformed: {message}",
        /// Signature does not match the configured secret.
        SignatureMismatch => "session token signature does not verify",
        /// Token expiry has passed.
        Expired => "session token has expired",
        /// Token could not be signed.
        Signing { message: String } => "session token signing failed: {message}",
    }
}

impl SessionTokenError {
    /// Whether the error means "not authenticated" rather than a server fault.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::Malformed { .. } | Self::SignatureMismatch | Self::Expired
        )
    }
}

/// Freshly issued token and its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Encoded token.
    pub token: SessionToken,
    /// Expiry instant embedded in the token.
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies session tokens.
///
/// Secret and lifetime are constructor inputs of the implementation; nothing
/// is read from the environment at call time.
#[cfg_attr(test, mockall::automock)]
pub trait SessionTokenIssuer: Send + Sync {
    /// Issue a token for `user_id` expiring one lifetime from now.
    fn issue(&self, user_id: UserId, email: &str) -> Result<IssuedToken, SessionTokenError>;

    /// Check signature and expiry, returning the embedded identity.
    fn verify(&self, token: &str) -> Result<SessionIdentity, SessionTokenError>;
}
