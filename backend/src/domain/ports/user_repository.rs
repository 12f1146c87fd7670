//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another user already holds this email.
        EmailConflict { email: String } => "email already registered: {email}",
        /// Update targeted a user that does not exist.
        Missing { id: String } => "user {id} not found",
    }
}

/// Durable user storage keyed by identifier and by unique email.
///
/// Emails are stored in their normalised form; lookups take the same form.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, failing with
    /// [`UserPersistenceError::EmailConflict`] when the email is taken.
    async fn create(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a user by normalised email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Overwrite an existing user. Email uniqueness still applies.
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;
}
