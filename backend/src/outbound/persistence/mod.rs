//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories here translate between Diesel rows and domain types and hold
//! no business rules. Connections come from a `bb8` pool through
//! `diesel-async`, and every database failure is mapped onto the port's own
//! error type.
//!
//! # Example
//!
//! ```ignore
//! use readlist::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/readlist")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_book_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_book_repository::DieselBookRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
