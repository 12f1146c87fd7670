//! Identity domain service.
//!
//! Implements [`IdentityCommand`]: registration, login, bearer-token checks
//! and profile maintenance. Validation runs before any repository write, and
//! login failures never reveal whether the email exists.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, error, info, warn};

use crate::domain::ports::{
    CredentialHasher, CredentialHasherError, IdentityCommand, IdentityError, LoginOutcome,
    SessionTokenError, SessionTokenIssuer, UserPersistenceError, UserRepository,
};
use crate::domain::{
    DisplayName, EmailAddress, LoginCredentials, MinimumLengthPolicy, PasswordPolicy,
    ProfileChanges, RegistrationRequest, SessionIdentity, User, UserId, UserProfile,
};

/// Identity service implementing the [`IdentityCommand`] driving port.
#[derive(Clone)]
pub struct IdentityService<U> {
    users: Arc<U>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<dyn SessionTokenIssuer>,
    password_policy: Arc<dyn PasswordPolicy>,
    clock: Arc<dyn Clock>,
}

impl<U> IdentityService<U> {
    /// Create a service using the default minimum-length password policy.
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// # use readlist::domain::IdentityService;
    /// # use readlist::outbound::memory::InMemoryUserRepository;
    /// # use readlist::outbound::security::{Argon2CredentialHasher, JwtSessionTokenIssuer};
    /// let service = IdentityService::new(
    ///     Arc::new(InMemoryUserRepository::default()),
    ///     Arc::new(Argon2CredentialHasher::default()),
    ///     Arc::new(JwtSessionTokenIssuer::new(
    ///         b"secret".to_vec(),
    ///         chrono::Duration::hours(24),
    ///         Arc::new(DefaultClock),
    ///     )),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(
        users: Arc<U>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn SessionTokenIssuer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            password_policy: Arc::new(MinimumLengthPolicy::default()),
            clock,
        }
    }

    /// Replace the password policy.
    #[must_use]
    pub fn with_password_policy(mut self, policy: Arc<dyn PasswordPolicy>) -> Self {
        self.password_policy = policy;
        self
    }
}

fn map_user_error(err: UserPersistenceError) -> IdentityError {
    match err {
        UserPersistenceError::Connection { message } => {
            error!(error = %message, "user repository unavailable");
            IdentityError::repository_failure(message, true)
        }
        UserPersistenceError::Query { message } => {
            error!(error = %message, "user repository query failed");
            IdentityError::repository_failure(message, false)
        }
        UserPersistenceError::EmailConflict { .. } => IdentityError::email_already_exists(),
        UserPersistenceError::Missing { .. } => IdentityError::user_not_found(),
    }
}

fn map_hashing_error(err: &CredentialHasherError) -> IdentityError {
    error!(error = %err, "password hashing failed");
    IdentityError::credential_hashing(err.to_string())
}

fn map_token_error(err: &SessionTokenError) -> IdentityError {
    if err.is_rejection() {
        debug!(reason = %err, "bearer token rejected");
        IdentityError::unauthenticated()
    } else {
        error!(error = %err, "session token failure");
        IdentityError::token_issuance(err.to_string())
    }
}

fn clean_genres(genres: Vec<String>) -> Vec<String> {
    genres
        .into_iter()
        .map(|genre| genre.trim().to_owned())
        .filter(|genre| !genre.is_empty())
        .collect()
}

impl<U> IdentityService<U>
where
    U: UserRepository,
{
    async fn load_user(&self, user_id: UserId) -> Result<User, IdentityError> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(IdentityError::user_not_found)
    }

    async fn email_taken_by_other(
        &self,
        email: &EmailAddress,
        user_id: UserId,
    ) -> Result<bool, IdentityError> {
        let existing = self
            .users
            .find_by_email(email.as_ref())
            .await
            .map_err(map_user_error)?;
        Ok(existing.is_some_and(|other| other.id() != user_id))
    }

    fn validate_password(&self, password: &str) -> Result<(), IdentityError> {
        self.password_policy
            .validate(password)
            .map_err(|err| IdentityError::invalid_password(err.to_string()))
    }
}

#[async_trait]
impl<U> IdentityCommand for IdentityService<U>
where
    U: UserRepository,
{
    async fn register(&self, request: RegistrationRequest) -> Result<UserProfile, IdentityError> {
        let RegistrationRequest {
            email,
            password,
            name,
            genres,
        } = request;

        let existing = self
            .users
            .find_by_email(&EmailAddress::normalise(&email))
            .await
            .map_err(map_user_error)?;
        if existing.is_some() {
            return Err(IdentityError::email_already_exists());
        }

        let email = EmailAddress::parse(&email).map_err(|_| IdentityError::invalid_email())?;
        self.validate_password(password.expose())?;
        let name = DisplayName::new(&name).map_err(|err| IdentityError::invalid_name(err.to_string()))?;

        let password_hash = self
            .hasher
            .hash(&password)
            .map_err(|err| map_hashing_error(&err))?;
        let user = User::register(
            email,
            name,
            password_hash,
            clean_genres(genres),
            self.clock.utc(),
        );
        self.users.create(&user).await.map_err(map_user_error)?;

        info!(user_id = %user.id(), "user registered");
        Ok(user.to_profile())
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<LoginOutcome, IdentityError> {
        let Some(user) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
        else {
            warn!("login rejected: unknown email");
            return Err(IdentityError::invalid_credentials());
        };

        match self
            .hasher
            .verify(user.password_hash(), credentials.password())
        {
            Ok(true) => {}
            Ok(false) => {
                warn!(user_id = %user.id(), "login rejected: password mismatch");
                return Err(IdentityError::invalid_credentials());
            }
            Err(err) => {
                warn!(user_id = %user.id(), error = %err, "login rejected: stored hash unusable");
                return Err(IdentityError::invalid_credentials());
            }
        }

        let issued = self
            .tokens
            .issue(user.id(), user.email().as_ref())
            .map_err(|err| map_token_error(&err))?;

        info!(user_id = %user.id(), "user logged in");
        Ok(LoginOutcome {
            token: issued.token,
            expires_at: issued.expires_at,
            user: user.to_public(),
        })
    }

    async fn authenticate(&self, token: &str) -> Result<SessionIdentity, IdentityError> {
        self.tokens
            .verify(token)
            .map_err(|err| map_token_error(&err))
    }

    async fn profile(&self, user_id: UserId) -> Result<UserProfile, IdentityError> {
        self.load_user(user_id).await.map(|user| user.to_profile())
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        changes: ProfileChanges,
    ) -> Result<UserProfile, IdentityError> {
        let mut user = self.load_user(user_id).await?;
        if changes.is_empty() {
            return Ok(user.to_profile());
        }
        let ProfileChanges {
            email,
            name,
            password,
        } = changes;

        let email = email
            .map(|raw| EmailAddress::parse(raw).map_err(|_| IdentityError::invalid_email()))
            .transpose()?;
        let name = name
            .map(|raw| DisplayName::new(raw).map_err(|err| IdentityError::invalid_name(err.to_string())))
            .transpose()?;
        if let Some(password) = &password {
            self.validate_password(password.expose())?;
        }

        if let Some(email) = &email {
            if email != user.email() && self.email_taken_by_other(email, user_id).await? {
                return Err(IdentityError::email_already_exists());
            }
        }

        let now = self.clock.utc();
        if let Some(password) = password {
            let hash = self
                .hasher
                .hash(&password)
                .map_err(|err| map_hashing_error(&err))?;
            user.change_password_hash(hash, now);
        }
        if let Some(email) = email {
            user.change_email(email, now);
        }
        if let Some(name) = name {
            user.rename(name, now);
        }

        self.users.update(&user).await.map_err(map_user_error)?;
        info!(user_id = %user.id(), "profile updated");
        Ok(user.to_profile())
    }
}

#[cfg(test)]
mod tests;
