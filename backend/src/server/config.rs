//! Application settings and the server configuration derived from them.
//!
//! Settings load through OrthoConfig from CLI flags, `READLIST_*`
//! environment variables and configuration files, in that precedence.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use rand::RngCore;
use serde::Deserialize;
use tracing::{info, warn};
use url::Url;
use zeroize::Zeroizing;

use crate::domain::ports::{CatalogSearch, FixtureCatalogSearch};
use crate::outbound::catalog::{DEFAULT_GOOGLE_BOOKS_BASE_URL, GoogleBooksCatalog};
use crate::outbound::persistence::DbPool;
use crate::outbound::security::Argon2CredentialHasher;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TOKEN_TTL_SECONDS: i64 = 86_400;
const DEFAULT_CATALOG_TIMEOUT_SECONDS: u64 = 10;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const EPHEMERAL_SECRET_LEN: usize = 32;

/// Raw settings as supplied by the operator.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "READLIST")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string. Without one, data lives in memory.
    pub database_url: Option<String>,
    /// Pool size for the database.
    pub db_max_connections: Option<u32>,
    /// HMAC secret used to sign session tokens.
    pub token_secret: Option<String>,
    /// Session lifetime in seconds.
    pub token_ttl_seconds: Option<i64>,
    /// Accept a generated secret outside debug builds.
    #[ortho_config(default = false)]
    pub allow_ephemeral_secret: bool,
    /// Argon2 memory cost in KiB.
    pub argon2_memory_kib: Option<u32>,
    /// Argon2 iteration count.
    pub argon2_iterations: Option<u32>,
    /// Google Books API key. Without one, catalog search returns nothing.
    pub google_books_api_key: Option<String>,
    /// Google Books endpoint override.
    pub google_books_base_url: Option<String>,
    /// Catalog request timeout in seconds.
    pub catalog_timeout_seconds: Option<u64>,
}

/// Settings that cannot be turned into a runnable configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// Bind address did not parse.
    #[error("invalid bind address {value}: {message}")]
    BindAddress {
        /// Offending value.
        value: String,
        /// Parser message.
        message: String,
    },
    /// No token secret and generated secrets are not allowed.
    #[error("READLIST_TOKEN_SECRET must be set in release builds")]
    MissingTokenSecret,
    /// Token lifetime must be positive.
    #[error("token ttl must be a positive number of seconds, got {0}")]
    TokenTtl(i64),
    /// Argon2 parameters rejected.
    #[error("invalid argon2 parameters: {0}")]
    Hasher(String),
    /// Catalog endpoint or client could not be built.
    #[error("invalid catalog configuration: {0}")]
    Catalog(String),
}

impl AppSettings {
    /// Listen address, defaulting to all interfaces on port 8080.
    ///
    /// # Errors
    ///
    /// [`SettingsError::BindAddress`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddress {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Non-blank database URL, if any.
    pub fn database_url(&self) -> Option<&str> {
        non_blank(self.database_url.as_deref())
    }

    /// Database pool size.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Session lifetime.
    ///
    /// # Errors
    ///
    /// [`SettingsError::TokenTtl`] for zero or negative values.
    pub fn token_ttl(&self) -> Result<TimeDelta, SettingsError> {
        let seconds = self.token_ttl_seconds.unwrap_or(DEFAULT_TOKEN_TTL_SECONDS);
        if seconds <= 0 {
            return Err(SettingsError::TokenTtl(seconds));
        }
        TimeDelta::try_seconds(seconds).ok_or(SettingsError::TokenTtl(seconds))
    }

    /// Catalog request timeout.
    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(
            self.catalog_timeout_seconds
                .unwrap_or(DEFAULT_CATALOG_TIMEOUT_SECONDS),
        )
    }

    /// Signing secret, generating one when none is configured and that is
    /// permitted.
    ///
    /// # Errors
    ///
    /// [`SettingsError::MissingTokenSecret`] when no secret is configured in
    /// a release build without `allow_ephemeral_secret`.
    pub fn token_secret(&self) -> Result<Zeroizing<Vec<u8>>, SettingsError> {
        resolve_token_secret(
            non_blank(self.token_secret.as_deref()),
            cfg!(debug_assertions) || self.allow_ephemeral_secret,
        )
    }

    /// Password hasher with any configured cost overrides.
    ///
    /// # Errors
    ///
    /// [`SettingsError::Hasher`] when Argon2 rejects the costs.
    pub fn credential_hasher(&self) -> Result<Argon2CredentialHasher, SettingsError> {
        match (self.argon2_memory_kib, self.argon2_iterations) {
            (None, None) => Ok(Argon2CredentialHasher::default()),
            (memory, iterations) => Argon2CredentialHasher::with_cost(
                memory.unwrap_or(argon2::Params::DEFAULT_M_COST),
                iterations.unwrap_or(argon2::Params::DEFAULT_T_COST),
            )
            .map_err(|err| SettingsError::Hasher(err.to_string())),
        }
    }

    /// Catalog adapter: Google Books when a key is configured, otherwise a
    /// catalog that finds nothing.
    ///
    /// # Errors
    ///
    /// [`SettingsError::Catalog`] for an unparsable base URL or a client
    /// that fails to build.
    pub fn catalog(&self) -> Result<Arc<dyn CatalogSearch>, SettingsError> {
        let Some(api_key) = non_blank(self.google_books_api_key.as_deref()) else {
            info!("no Google Books API key configured; catalog search returns no results");
            return Ok(Arc::new(FixtureCatalogSearch));
        };
        let raw_url = non_blank(self.google_books_base_url.as_deref())
            .unwrap_or(DEFAULT_GOOGLE_BOOKS_BASE_URL);
        let base_url = Url::parse(raw_url).map_err(|err| SettingsError::Catalog(err.to_string()))?;
        let catalog = GoogleBooksCatalog::new(base_url, api_key, self.catalog_timeout())
            .map_err(|err| SettingsError::Catalog(err.to_string()))?;
        Ok(Arc::new(catalog))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn resolve_token_secret(
    configured: Option<&str>,
    allow_ephemeral: bool,
) -> Result<Zeroizing<Vec<u8>>, SettingsError> {
    if let Some(secret) = configured {
        return Ok(Zeroizing::new(secret.as_bytes().to_vec()));
    }
    if !allow_ephemeral {
        return Err(SettingsError::MissingTokenSecret);
    }
    warn!("no token secret configured; generated a temporary one (sessions end on restart)");
    let mut secret = Zeroizing::new(vec![0_u8; EPHEMERAL_SECRET_LEN]);
    rand::thread_rng().fill_bytes(secret.as_mut_slice());
    Ok(secret)
}

/// Everything the server needs to start.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) token_secret: Zeroizing<Vec<u8>>,
    pub(crate) token_ttl: TimeDelta,
    pub(crate) hasher: Argon2CredentialHasher,
    pub(crate) catalog: Arc<dyn CatalogSearch>,
}

impl ServerConfig {
    /// In-memory configuration with default costs, a 24 hour session
    /// lifetime and an empty catalog.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, token_secret: Vec<u8>) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            token_secret: Zeroizing::new(token_secret),
            token_ttl: TimeDelta::seconds(DEFAULT_TOKEN_TTL_SECONDS),
            hasher: Argon2CredentialHasher::default(),
            catalog: Arc::new(FixtureCatalogSearch),
        }
    }

    /// Build from loaded settings. The database pool is attached separately
    /// because creating it is async.
    ///
    /// # Errors
    ///
    /// Any [`SettingsError`] raised while resolving individual settings.
    pub fn from_settings(settings: &AppSettings) -> Result<Self, SettingsError> {
        Ok(Self {
            bind_addr: settings.bind_addr()?,
            db_pool: None,
            token_secret: settings.token_secret()?,
            token_ttl: settings.token_ttl()?,
            hasher: settings.credential_hasher()?,
            catalog: settings.catalog()?,
        })
    }

    /// Persist through PostgreSQL instead of memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Override the session lifetime.
    #[must_use]
    pub fn with_token_ttl(mut self, ttl: TimeDelta) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Override the password hasher.
    #[must_use]
    pub fn with_hasher(mut self, hasher: Argon2CredentialHasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Override the catalog adapter.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Arc<dyn CatalogSearch>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Socket address the server binds to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Session lifetime.
    #[must_use]
    pub fn token_ttl(&self) -> TimeDelta {
        self.token_ttl
    }
}
