//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel
//! - **memory**: process-local repositories for tests and database-less runs
//! - **security**: Argon2 credential hashing and JWT session tokens
//! - **catalog**: Google Books catalog search over HTTP
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod catalog;
pub mod memory;
pub mod persistence;
pub mod security;
