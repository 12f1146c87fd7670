//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (repositories, hasher, token issuer, catalog) are implemented
//! by outbound adapters. Driving ports (identity and reading-list commands)
//! are implemented by the domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod book_repository;
mod catalog_search;
mod credential_hasher;
mod identity_command;
mod reading_list_command;
mod session_token_issuer;
mod user_repository;

#[cfg(test)]
pub use book_repository::MockBookRepository;
pub use book_repository::{BookPersistenceError, BookRepository};
#[cfg(test)]
pub use catalog_search::MockCatalogSearch;
pub use catalog_search::{CatalogSearch, CatalogSearchError, CatalogVolume, FixtureCatalogSearch};
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHasher, CredentialHasherError};
#[cfg(test)]
pub use identity_command::MockIdentityCommand;
pub use identity_command::{IdentityCommand, IdentityError, LoginOutcome};
#[cfg(test)]
pub use reading_list_command::MockReadingListCommand;
pub use reading_list_command::{AddBookRequest, ReadingListCommand, ReadingListError};
#[cfg(test)]
pub use session_token_issuer::MockSessionTokenIssuer;
pub use session_token_issuer::{IssuedToken, SessionTokenError, SessionTokenIssuer};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
