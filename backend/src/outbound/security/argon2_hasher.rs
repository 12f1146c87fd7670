//! Argon2id implementation of [`CredentialHasher`].
//!
//! Hashes are stored in PHC string form (`$argon2id$v=19$m=..,t=..,p=..$..`),
//! so verification always uses the parameters recorded in the stored hash and
//! cost overrides only affect newly hashed passwords.

use std::fmt;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    Error as PhcError, PasswordHash as PhcHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::domain::ports::{CredentialHasher, CredentialHasherError};
use crate::domain::{Password, PasswordHash};

/// Argon2id hasher with a random salt per password.
#[derive(Clone, Default)]
pub struct Argon2CredentialHasher {
    argon2: Argon2<'static>,
}

impl Argon2CredentialHasher {
    /// Hasher with explicit memory (KiB) and iteration costs.
    ///
    /// # Errors
    ///
    /// [`CredentialHasherError::Hashing`] when the costs fall outside the
    /// ranges Argon2 accepts.
    ///
    /// # Examples
    /// ```
    /// use readlist::outbound::security::Argon2CredentialHasher;
    ///
    /// assert!(Argon2CredentialHasher::with_cost(19_456, 2).is_ok());
    /// assert!(Argon2CredentialHasher::with_cost(0, 2).is_err());
    /// ```
    pub fn with_cost(memory_kib: u32, iterations: u32) -> Result<Self, CredentialHasherError> {
        let params = Params::new(memory_kib, iterations, Params::DEFAULT_P_COST, None)
            .map_err(|err| CredentialHasherError::hashing(format!("invalid argon2 cost: {err}")))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl fmt::Debug for Argon2CredentialHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Argon2CredentialHasher")
            .field("params", self.argon2.params())
            .finish()
    }
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, password: &Password) -> Result<PasswordHash, CredentialHasherError> {
        let salt = SaltString::generate(&mut OsRng);
        let encoded = self
            .argon2
            .hash_password(password.expose().as_bytes(), &salt)
            .map_err(|err| CredentialHasherError::hashing(err.to_string()))?
            .to_string();
        PasswordHash::new(encoded).map_err(|err| CredentialHasherError::hashing(err.to_string()))
    }

    fn verify(
        &self,
        hash: &PasswordHash,
        password: &Password,
    ) -> Result<bool, CredentialHasherError> {
        let parsed = PhcHash::new(hash.as_str())
            .map_err(|err| CredentialHasherError::malformed_hash(err.to_string()))?;
        match self
            .argon2
            .verify_password(password.expose().as_bytes(), &parsed)
        {
            Ok(()) => Ok(true),
            Err(PhcError::Password) => Ok(false),
            Err(err) => Err(CredentialHasherError::malformed_hash(err.to_string())),
        }
    }
}
