//! Driving port for registration, login and session checks.
//!
//! Inbound adapters call [`IdentityCommand`] without knowing which hasher,
//! token issuer or repository sits behind it, so handler tests can swap in
//! a mock.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    LoginCredentials, ProfileChanges, PublicUser, RegistrationRequest, SessionIdentity,
    SessionToken, UserId, UserProfile,
};

use super::define_port_error;

define_port_error! {
    /// Failures of identity operations. Each failed call yields exactly one.
    pub enum IdentityError {
        /// A user with this email already exists.
        EmailAlreadyExists => "email is already registered",
        /// Email does not look like an address.
        InvalidEmail => "email is not a valid address",
        /// Password does not satisfy the policy.
        InvalidPassword { message: String } => "{message}",
        /// Display name length is out of bounds.
        InvalidName { message: String } => "{message}",
        /// Unknown email or wrong password; the two are not distinguished.
        InvalidCredentials => "invalid email or password",
        /// Token was malformed, forged or expired.
        Unauthenticated => "authentication required",
        /// The authenticated user no longer exists.
        UserNotFound => "user not found",
        /// Password hashing failed.
        CredentialHashing { message: String } => "credential hashing failed: {message}",
        /// Token could not be issued.
        TokenIssuance { message: String } => "token issuance failed: {message}",
        /// The user repository failed.
        RepositoryFailure { message: String, unavailable: bool } =>
            "user repository failure: {message}",
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    /// Signed session token.
    pub token: SessionToken,
    /// Token expiry.
    pub expires_at: DateTime<Utc>,
    /// Public projection of the logged-in user.
    pub user: PublicUser,
}

/// Identity use-cases exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityCommand: Send + Sync {
    /// Register a new user. Performs exactly one repository write.
    async fn register(&self, request: RegistrationRequest) -> Result<UserProfile, IdentityError>;

    /// Verify credentials and issue a session token. Performs no writes.
    async fn login(&self, credentials: LoginCredentials) -> Result<LoginOutcome, IdentityError>;

    /// Verify a bearer token.
    async fn authenticate(&self, token: &str) -> Result<SessionIdentity, IdentityError>;

    /// Read the caller's profile.
    async fn profile(&self, user_id: UserId) -> Result<UserProfile, IdentityError>;

    /// Apply profile changes. Performs at most one repository write.
    async fn update_profile(
        &self,
        user_id: UserId,
        changes: ProfileChanges,
    ) -> Result<UserProfile, IdentityError>;
}
