//! Authentication primitives: credentials, password policy and session
//! identity.
//!
//! Plaintext passwords only ever live inside [`Zeroizing`] buffers and are
//! wiped when the owning value drops.

use std::fmt;

use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

use super::user::{EmailAddress, UserId};

/// Reasons a password fails the active policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordPolicyError {
    /// Password is shorter than the policy minimum.
    #[error("password must be at least {min} characters")]
    TooShort {
        /// Minimum accepted length in characters.
        min: usize,
    },
}

/// Rule set applied to new passwords.
///
/// Registration and profile updates both go through this trait, so swapping
/// in a stricter policy changes every entry point at once.
pub trait PasswordPolicy: Send + Sync {
    /// Accept or reject `password`.
    fn validate(&self, password: &str) -> Result<(), PasswordPolicyError>;
}

/// Default minimum password length in characters.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Policy requiring a minimum number of characters.
///
/// # Examples
/// ```
/// use readlist::domain::{MinimumLengthPolicy, PasswordPolicy};
///
/// let policy = MinimumLengthPolicy::default();
/// assert!(policy.validate("password123").is_ok());
/// assert!(policy.validate("short").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimumLengthPolicy {
    min: usize,
}

impl MinimumLengthPolicy {
    /// Policy with a custom minimum.
    #[must_use]
    pub fn new(min: usize) -> Self {
        Self { min }
    }
}

impl Default for MinimumLengthPolicy {
    fn default() -> Self {
        Self::new(PASSWORD_MIN_LENGTH)
    }
}

impl PasswordPolicy for MinimumLengthPolicy {
    fn validate(&self, password: &str) -> Result<(), PasswordPolicyError> {
        if password.chars().count() < self.min {
            return Err(PasswordPolicyError::TooShort { min: self.min });
        }
        Ok(())
    }
}

/// Plaintext password held in a zeroizing buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Wrap a plaintext password.
    pub fn new(plaintext: impl Into<String>) -> Self {
        Self(Zeroizing::new(plaintext.into()))
    }

    /// Plaintext, for hashing or verification only.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Raw registration input. Validation happens in the identity service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    /// Requested email.
    pub email: String,
    /// Requested password.
    pub password: Password,
    /// Requested display name.
    pub name: String,
    /// Genre preference tags.
    pub genres: Vec<String>,
}

/// Login input. The email is normalised for lookup; the password is kept
/// exactly as supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Password,
}

impl LoginCredentials {
    /// Build credentials from raw payload strings.
    #[must_use]
    pub fn new(email: &str, password: impl Into<String>) -> Self {
        Self {
            email: EmailAddress::normalise(email),
            password: Password::new(password),
        }
    }

    /// Normalised email used for lookups.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Supplied password.
    #[must_use]
    pub fn password(&self) -> &Password {
        &self.password
    }
}

/// Requested profile changes. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    /// New email.
    pub email: Option<String>,
    /// New display name.
    pub name: Option<String>,
    /// New password.
    pub password: Option<Password>,
}

impl ProfileChanges {
    /// True when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.name.is_none() && self.password.is_none()
    }
}

/// Identity carried by a verified session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    /// Authenticated user.
    pub user_id: UserId,
    /// Email at the time the token was issued.
    pub email: String,
    /// Instant after which the token stops verifying.
    pub expires_at: DateTime<Utc>,
}

/// Encoded session token handed to clients.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap an encoded token.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded form for the `Authorization` header.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the encoded form.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("password123")]
    #[case("12345678")]
    #[case("pässwörd")]
    fn minimum_length_accepts(#[case] password: &str) {
        assert!(MinimumLengthPolicy::default().validate(password).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("1234567")]
    #[case("short")]
    fn minimum_length_rejects(#[case] password: &str) {
        assert_eq!(
            MinimumLengthPolicy::default().validate(password),
            Err(PasswordPolicyError::TooShort { min: 8 })
        );
    }

    #[rstest]
    fn custom_minimum_is_honoured() {
        let policy = MinimumLengthPolicy::new(12);
        assert!(policy.validate("password123").is_err());
        assert!(policy.validate("password1234").is_ok());
    }

    #[rstest]
    fn login_normalises_email_and_keeps_password() {
        let creds = LoginCredentials::new("  Alice@Example.COM ", " pw with spaces ");
        assert_eq!(creds.email(), "alice@example.com");
        assert_eq!(creds.password().expose(), " pw with spaces ");
    }

    #[rstest]
    fn secrets_are_redacted_in_debug() {
        let creds = LoginCredentials::new("a@b.co", "hunter22");
        let rendered = format!("{creds:?} {:?}", SessionToken::new("abc.def.ghi"));
        assert!(!rendered.contains("hunter22"));
        assert!(!rendered.contains("abc.def.ghi"));
    }

    #[rstest]
    fn empty_profile_changes() {
        assert!(ProfileChanges::default().is_empty());
        let changes = ProfileChanges {
            name: Some("Bo".to_owned()),
            ..ProfileChanges::default()
        };
        assert!(!changes.is_empty());
    }
}
