//! Credential hashing and session token adapters.
//!
//! Both adapters take their configuration through constructor arguments and
//! never read the environment.

mod argon2_hasher;
mod jwt_issuer;

pub use argon2_hasher::Argon2CredentialHasher;
pub use jwt_issuer::JwtSessionTokenIssuer;
