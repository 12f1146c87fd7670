//! HS256 JSON Web Token implementation of [`SessionTokenIssuer`].
//!
//! Expiry is checked against the injected clock rather than the system time,
//! and a token is valid only while `now < issued_at + ttl`. The registered
//! `exp` claim is rounded up to whole seconds; the exact instant travels in
//! `exp_ns`.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{IssuedToken, SessionTokenError, SessionTokenIssuer};
use crate::domain::{SessionIdentity, SessionToken, UserId};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    iat: i64,
    exp: i64,
    exp_ns: i64,
}

fn whole_seconds_ceil(instant: DateTime<Utc>) -> i64 {
    if instant.timestamp_subsec_nanos() == 0 {
        instant.timestamp()
    } else {
        instant.timestamp() + 1
    }
}

/// Signs and verifies session tokens with a shared secret.
#[derive(Clone)]
pub struct JwtSessionTokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtSessionTokenIssuer {
    /// Issuer signing with `secret`; tokens live for `ttl`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use mockable::DefaultClock;
    /// use readlist::domain::UserId;
    /// use readlist::domain::ports::SessionTokenIssuer;
    /// use readlist::outbound::security::JwtSessionTokenIssuer;
    ///
    /// let issuer = JwtSessionTokenIssuer::new(
    ///     b"secret".to_vec(),
    ///     chrono::Duration::hours(24),
    ///     Arc::new(DefaultClock),
    /// );
    /// let user = UserId::random();
    /// let issued = issuer.issue(user, "alice@example.com").unwrap();
    /// let identity = issuer.verify(issued.token.as_str()).unwrap();
    /// assert_eq!(identity.user_id, user);
    /// ```
    #[must_use]
    pub fn new(secret: Vec<u8>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(&secret),
            decoding: DecodingKey::from_secret(&secret),
            validation,
            ttl,
            clock,
        }
    }

    /// Token lifetime.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl fmt::Debug for JwtSessionTokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtSessionTokenIssuer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

fn map_decode_error(error: &jsonwebtoken::errors::Error) -> SessionTokenError {
    match error.kind() {
        ErrorKind::InvalidSignature => SessionTokenError::signature_mismatch(),
        ErrorKind::ExpiredSignature => SessionTokenError::expired(),
        _ => SessionTokenError::malformed(error.to_string()),
    }
}

impl SessionTokenIssuer for JwtSessionTokenIssuer {
    fn issue(&self, user_id: UserId, email: &str) -> Result<IssuedToken, SessionTokenError> {
        let now = self.clock.utc();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| SessionTokenError::signing("expiry out of range"))?;
        let exp_ns = expires_at
            .timestamp_nanos_opt()
            .ok_or_else(|| SessionTokenError::signing("expiry out of range"))?;
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_owned(),
            iat: now.timestamp(),
            exp: whole_seconds_ceil(expires_at),
            exp_ns,
        };
        let encoded = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| SessionTokenError::signing(err.to_string()))?;
        Ok(IssuedToken {
            token: SessionToken::new(encoded),
            expires_at,
        })
    }

    fn verify(&self, token: &str) -> Result<SessionIdentity, SessionTokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|err| map_decode_error(&err))?;
        let claims = data.claims;
        let expires_at = DateTime::<Utc>::from_timestamp_nanos(claims.exp_ns);
        if whole_seconds_ceil(expires_at) != claims.exp {
            return Err(SessionTokenError::malformed("expiry claims disagree"));
        }
        if self.clock.utc() >= expires_at {
            return Err(SessionTokenError::expired());
        }
        let user_id = UserId::new(&claims.sub)
            .map_err(|_| SessionTokenError::malformed("subject is not a user id"))?;
        Ok(SessionIdentity {
            user_id,
            email: claims.email,
            expires_at,
        })
    }
}
