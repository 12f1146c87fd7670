//! Adapter selection for the HTTP state.
//!
//! With a database pool the services persist through Diesel; without one
//! they share in-memory repositories that vanish on restart.

use std::sync::Arc;

use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{BookRepository, UserRepository};
use crate::domain::{IdentityService, ReadingListService};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{InMemoryBookRepository, InMemoryUserRepository};
use crate::outbound::persistence::{DieselBookRepository, DieselUserRepository};
use crate::outbound::security::JwtSessionTokenIssuer;

use super::ServerConfig;

fn assemble<U, B>(
    config: &ServerConfig,
    users: Arc<U>,
    books: Arc<B>,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    U: UserRepository + 'static,
    B: BookRepository + 'static,
{
    let tokens = JwtSessionTokenIssuer::new(
        config.token_secret.to_vec(),
        config.token_ttl,
        clock.clone(),
    );
    let identity = IdentityService::new(
        users.clone(),
        Arc::new(config.hasher.clone()),
        Arc::new(tokens),
        clock.clone(),
    );
    let reading_list = ReadingListService::new(books, users, clock);
    HttpState::new(
        Arc::new(identity),
        Arc::new(reading_list),
        config.catalog.clone(),
    )
}

/// Build handler state for `config`, reading time from `clock`.
pub fn build_http_state(config: &ServerConfig, clock: Arc<dyn Clock>) -> HttpState {
    match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL repositories");
            assemble(
                config,
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(DieselBookRepository::new(pool.clone())),
                clock,
            )
        }
        None => {
            warn!("no database configured; data is kept in memory");
            assemble(
                config,
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryBookRepository::new()),
                clock,
            )
        }
    }
}
