//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and depend only on
//! domain ports, so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{CatalogSearch, IdentityCommand, ReadingListCommand};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration, login and session checks.
    pub identity: Arc<dyn IdentityCommand>,
    /// Reading-list use-cases.
    pub reading_list: Arc<dyn ReadingListCommand>,
    /// External catalog lookups.
    pub catalog: Arc<dyn CatalogSearch>,
}

impl HttpState {
    /// Bundle the ports used by the handlers.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use readlist::domain::ports::FixtureCatalogSearch;
    /// use readlist::domain::{IdentityService, ReadingListService};
    /// use readlist::inbound::http::state::HttpState;
    /// use readlist::outbound::memory::{InMemoryBookRepository, InMemoryUserRepository};
    /// use readlist::outbound::security::{Argon2CredentialHasher, JwtSessionTokenIssuer};
    ///
    /// let users = Arc::new(InMemoryUserRepository::new());
    /// let clock = Arc::new(DefaultClock);
    /// let tokens = JwtSessionTokenIssuer::new(
    ///     b"secret".to_vec(),
    ///     chrono::Duration::hours(24),
    ///     clock.clone(),
    /// );
    /// let identity = IdentityService::new(
    ///     users.clone(),
    ///     Arc::new(Argon2CredentialHasher::default()),
    ///     Arc::new(tokens),
    ///     clock.clone(),
    /// );
    /// let reading_list =
    ///     ReadingListService::new(Arc::new(InMemoryBookRepository::new()), users, clock);
    /// let state = HttpState::new(
    ///     Arc::new(identity),
    ///     Arc::new(reading_list),
    ///     Arc::new(FixtureCatalogSearch),
    /// );
    /// let _identity = state.identity.clone();
    /// ```
    pub fn new(
        identity: Arc<dyn IdentityCommand>,
        reading_list: Arc<dyn ReadingListCommand>,
        catalog: Arc<dyn CatalogSearch>,
    ) -> Self {
        Self {
            identity,
            reading_list,
            catalog,
        }
    }
}
