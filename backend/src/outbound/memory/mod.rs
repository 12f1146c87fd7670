//! Process-local repositories backed by mutex-protected maps.
//!
//! Used when no database URL is configured and by the integration suite.
//! Contents vanish with the process.

mod book_repository;
mod user_repository;

pub use book_repository::InMemoryBookRepository;
pub use user_repository::InMemoryUserRepository;
