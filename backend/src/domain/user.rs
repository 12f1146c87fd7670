//! User identity model.
//!
//! A [`User`] is only ever built from validated parts: [`EmailAddress`] and
//! [`DisplayName`] check their input on construction, and [`PasswordHash`]
//! holds the hasher's output, never a plaintext password.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation failures for user attributes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Identifier is not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// Email does not match the accepted address shape.
    #[error("email is not a valid address")]
    InvalidEmail,
    /// Display name is shorter than the minimum.
    #[error("name must be at least {min} characters")]
    DisplayNameTooShort {
        /// Minimum accepted length in characters.
        min: usize,
    },
    /// Display name is longer than the maximum.
    #[error("name must be at most {max} characters")]
    DisplayNameTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
    /// Stored credential hash was empty.
    #[error("password hash must not be empty")]
    EmptyPasswordHash,
}

/// Stable user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse an identifier from its hyphenated string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a fresh identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Normalised email address.
///
/// Input is trimmed and lower-cased before validation, so two addresses that
/// differ only in case compare equal.
///
/// # Examples
/// ```
/// use readlist::domain::EmailAddress;
///
/// let email = EmailAddress::parse("  Alice@Example.com ").unwrap();
/// assert_eq!(email.as_ref(), "alice@example.com");
/// assert!(EmailAddress::parse("alice@").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalise and validate an address.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = Self::normalise(raw.as_ref());
        if !email_regex().is_match(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }

    /// Canonical lookup key for `raw` without validating it.
    #[must_use]
    pub fn normalise(raw: &str) -> String {
        raw.trim().to_lowercase()
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

/// Minimum display name length in characters.
pub const DISPLAY_NAME_MIN: usize = 2;
/// Maximum display name length in characters.
pub const DISPLAY_NAME_MAX: usize = 50;

/// Human readable name, trimmed, between [`DISPLAY_NAME_MIN`] and
/// [`DISPLAY_NAME_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`].
    pub fn new(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = name.as_ref().trim();
        let length = trimmed.chars().count();
        if length < DISPLAY_NAME_MIN {
            return Err(UserValidationError::DisplayNameTooShort {
                min: DISPLAY_NAME_MIN,
            });
        }
        if length > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Encoded output of a credential hasher (for example a PHC string).
///
/// `Debug` never prints the hash.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash, rejecting empty input.
    pub fn new(encoded: impl Into<String>) -> Result<Self, UserValidationError> {
        let encoded = encoded.into();
        if encoded.trim().is_empty() {
            return Err(UserValidationError::EmptyPasswordHash);
        }
        Ok(Self(encoded))
    }

    /// Encoded hash string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Persisted fields of a [`User`], used when rebuilding one from storage.
#[derive(Debug, Clone)]
pub struct UserParts {
    /// Identifier.
    pub id: UserId,
    /// Unique email.
    pub email: EmailAddress,
    /// Display name.
    pub name: DisplayName,
    /// Credential hash.
    pub password_hash: PasswordHash,
    /// Genre preference tags.
    pub genres: Vec<String>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last update instant.
    pub updated_at: DateTime<Utc>,
}

/// Registered user.
///
/// ## Invariants
/// - `updated_at >= created_at`.
/// - `password_hash` is hasher output, never plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: EmailAddress,
    name: DisplayName,
    password_hash: PasswordHash,
    genres: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a brand new user stamped at `now`.
    #[must_use]
    pub fn register(
        email: EmailAddress,
        name: DisplayName,
        password_hash: PasswordHash,
        genres: Vec<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::random(),
            email,
            name,
            password_hash,
            genres,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a user from stored parts. A stale `updated_at` is clamped to
    /// `created_at`.
    #[must_use]
    pub fn from_parts(parts: UserParts) -> Self {
        let UserParts {
            id,
            email,
            name,
            password_hash,
            genres,
            created_at,
            updated_at,
        } = parts;
        Self {
            id,
            email,
            name,
            password_hash,
            genres,
            created_at,
            updated_at: updated_at.max(created_at),
        }
    }

    /// Identifier.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Email address.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Stored credential hash.
    #[must_use]
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Genre preference tags.
    #[must_use]
    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    /// Creation instant.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last update instant.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Change the email address.
    pub fn change_email(&mut self, email: EmailAddress, now: DateTime<Utc>) {
        self.email = email;
        self.touch(now);
    }

    /// Change the display name.
    pub fn rename(&mut self, name: DisplayName, now: DateTime<Utc>) {
        self.name = name;
        self.touch(now);
    }

    /// Replace the credential hash.
    pub fn change_password_hash(&mut self, password_hash: PasswordHash, now: DateTime<Utc>) {
        self.password_hash = password_hash;
        self.touch(now);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }

    /// Projection safe to hand to other users and clients.
    #[must_use]
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.to_string(),
            name: self.name.to_string(),
        }
    }

    /// Full profile for the user themselves, without the credential hash.
    #[must_use]
    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.to_string(),
            name: self.name.to_string(),
            genres: self.genres.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Public-safe user projection returned on login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PublicUser {
    /// Identifier.
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: UserId,
    /// Email address.
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// Display name.
    #[schema(example = "Alice")]
    pub name: String,
}

/// User view returned by registration and profile reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Identifier.
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: UserId,
    /// Email address.
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// Display name.
    #[schema(example = "Alice")]
    pub name: String,
    /// Genre preference tags.
    pub genres: Vec<String>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last update instant.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests;
