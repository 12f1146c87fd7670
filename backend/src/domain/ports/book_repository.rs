//! Port for reading-list persistence.

use async_trait::async_trait;

use crate::domain::{BookEntry, BookId, ReadingStatus, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by book repository adapters.
    pub enum BookPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "book repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "book repository query failed: {message}",
        /// Update or delete targeted an entry that does not exist.
        Missing { id: String } => "book {id} not found",
    }
}

/// Per-user book storage.
///
/// List operations return entries oldest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Persist a new entry.
    async fn save(&self, entry: &BookEntry) -> Result<(), BookPersistenceError>;

    /// Fetch one entry.
    async fn find_by_id(&self, id: BookId) -> Result<Option<BookEntry>, BookPersistenceError>;

    /// All entries owned by `user_id`.
    async fn find_by_user_id(&self, user_id: UserId)
    -> Result<Vec<BookEntry>, BookPersistenceError>;

    /// Entries owned by `user_id` with the given status.
    async fn find_by_user_id_and_status(
        &self,
        user_id: UserId,
        status: ReadingStatus,
    ) -> Result<Vec<BookEntry>, BookPersistenceError>;

    /// Overwrite an existing entry. Owner and creation time are fixed at save.
    async fn update(&self, entry: &BookEntry) -> Result<(), BookPersistenceError>;

    /// Remove an entry.
    async fn delete(&self, id: BookId) -> Result<(), BookPersistenceError>;
}
