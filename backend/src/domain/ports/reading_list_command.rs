//! Driving port for reading-list use-cases.

use async_trait::async_trait;

use crate::domain::{BookDetails, BookEntry, BookId, BookValidationError, UserId};

use super::define_port_error;

define_port_error! {
    /// Failures of reading-list operations.
    pub enum ReadingListError {
        /// The acting user does not exist.
        UserNotFound { user_id: String } => "user {user_id} not found",
        /// No entry with this identifier (or not owned by the caller).
        BookNotFound { book_id: String } => "book {book_id} not found",
        /// Status is outside the recognised set.
        InvalidStatus { value: String } => "unknown reading status: {value}",
        /// Book metadata breaks an entry invariant.
        InvalidBook { reason: BookValidationError } => "{reason}",
        /// A repository failed.
        RepositoryFailure { message: String, unavailable: bool } =>
            "reading list repository failure: {message}",
    }
}

/// Input for [`ReadingListCommand::add_book`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddBookRequest {
    /// Owning user.
    pub user_id: UserId,
    /// Catalog metadata.
    pub details: BookDetails,
    /// Initial status, as supplied by the client.
    pub status: String,
}

/// Reading-list use-cases exposed to inbound adapters.
///
/// Status arguments are raw strings so that unknown values surface as
/// [`ReadingListError::InvalidStatus`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReadingListCommand: Send + Sync {
    /// Add a book for an existing user.
    async fn add_book(&self, request: AddBookRequest) -> Result<BookEntry, ReadingListError>;

    /// All of a user's entries.
    async fn list_books(&self, user_id: UserId) -> Result<Vec<BookEntry>, ReadingListError>;

    /// A user's entries with one status.
    async fn list_books_by_status(
        &self,
        user_id: UserId,
        status: &str,
    ) -> Result<Vec<BookEntry>, ReadingListError>;

    /// Change an entry's status.
    async fn update_status(&self, book_id: BookId, status: &str) -> Result<(), ReadingListError>;

    /// Change the status of an entry owned by `owner`.
    async fn update_owned_status(
        &self,
        owner: UserId,
        book_id: BookId,
        status: &str,
    ) -> Result<BookEntry, ReadingListError>;

    /// Delete an entry.
    async fn remove_book(&self, book_id: BookId) -> Result<(), ReadingListError>;

    /// Delete an entry owned by `owner`.
    async fn remove_owned_book(&self, owner: UserId, book_id: BookId)
    -> Result<(), ReadingListError>;
}
