//! Reading-list domain service.
//!
//! Implements [`ReadingListCommand`]. Every operation reads its working state
//! from the repositories at call time; status and metadata checks happen
//! before any write.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, error};

use crate::domain::ports::{
    AddBookRequest, BookPersistenceError, BookRepository, ReadingListCommand, ReadingListError,
    UserPersistenceError, UserRepository,
};
use crate::domain::{BookEntry, BookId, ReadingStatus, UserId};

/// Reading-list service implementing the [`ReadingListCommand`] driving port.
#[derive(Clone)]
pub struct ReadingListService<B, U> {
    books: Arc<B>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<B, U> ReadingListService<B, U> {
    /// Create a service over the given repositories.
    pub fn new(books: Arc<B>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            books,
            users,
            clock,
        }
    }
}

fn map_book_error(err: BookPersistenceError) -> ReadingListError {
    match err {
        BookPersistenceError::Connection { message } => {
            error!(error = %message, "book repository unavailable");
            ReadingListError::repository_failure(message, true)
        }
        BookPersistenceError::Query { message } => {
            error!(error = %message, "book repository query failed");
            ReadingListError::repository_failure(message, false)
        }
        BookPersistenceError::Missing { id } => ReadingListError::book_not_found(id),
    }
}

fn map_user_error(err: UserPersistenceError) -> ReadingListError {
    match err {
        UserPersistenceError::Connection { message } => {
            error!(error = %message, "user repository unavailable");
            ReadingListError::repository_failure(message, true)
        }
        UserPersistenceError::Missing { id } => ReadingListError::user_not_found(id),
        other => {
            error!(error = %other, "user repository failure");
            ReadingListError::repository_failure(other.to_string(), false)
        }
    }
}

fn parse_status(raw: &str) -> Result<ReadingStatus, ReadingListError> {
    raw.parse::<ReadingStatus>()
        .map_err(|err| ReadingListError::invalid_status(err.value))
}

impl<B, U> ReadingListService<B, U>
where
    B: BookRepository,
    U: UserRepository,
{
    async fn ensure_user_exists(&self, user_id: UserId) -> Result<(), ReadingListError> {
        let found = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?;
        if found.is_none() {
            return Err(ReadingListError::user_not_found(user_id.to_string()));
        }
        Ok(())
    }

    /// Load an entry, optionally requiring a particular owner. Entries owned
    /// by someone else are reported as missing.
    async fn load_entry(
        &self,
        book_id: BookId,
        owner: Option<UserId>,
    ) -> Result<BookEntry, ReadingListError> {
        let entry = self
            .books
            .find_by_id(book_id)
            .await
            .map_err(map_book_error)?
            .ok_or_else(|| ReadingListError::book_not_found(book_id.to_string()))?;
        match owner {
            Some(owner) if !entry.is_owned_by(owner) => {
                debug!(%book_id, "book belongs to another user");
                Err(ReadingListError::book_not_found(book_id.to_string()))
            }
            _ => Ok(entry),
        }
    }

    async fn change_status(
        &self,
        book_id: BookId,
        owner: Option<UserId>,
        raw_status: &str,
    ) -> Result<BookEntry, ReadingListError> {
        let mut entry = self.load_entry(book_id, owner).await?;
        let status = parse_status(raw_status)?;
        entry.set_status(status, self.clock.utc());
        self.books.update(&entry).await.map_err(map_book_error)?;
        debug!(%book_id, %status, "reading status updated");
        Ok(entry)
    }

    async fn delete_entry(
        &self,
        book_id: BookId,
        owner: Option<UserId>,
    ) -> Result<(), ReadingListError> {
        self.load_entry(book_id, owner).await?;
        self.books.delete(book_id).await.map_err(map_book_error)?;
        debug!(%book_id, "book removed");
        Ok(())
    }
}

#[async_trait]
impl<B, U> ReadingListCommand for ReadingListService<B, U>
where
    B: BookRepository,
    U: UserRepository,
{
    async fn add_book(&self, request: AddBookRequest) -> Result<BookEntry, ReadingListError> {
        let AddBookRequest {
            user_id,
            details,
            status,
        } = request;
        self.ensure_user_exists(user_id).await?;
        let status = parse_status(&status)?;
        let entry = BookEntry::create(user_id, details, status, self.clock.utc())
            .map_err(ReadingListError::invalid_book)?;

        self.books.save(&entry).await.map_err(map_book_error)?;
        debug!(book_id = %entry.id(), %user_id, "book added");
        Ok(entry)
    }

    async fn list_books(&self, user_id: UserId) -> Result<Vec<BookEntry>, ReadingListError> {
        self.books
            .find_by_user_id(user_id)
            .await
            .map_err(map_book_error)
    }

    async fn list_books_by_status(
        &self,
        user_id: UserId,
        status: &str,
    ) -> Result<Vec<BookEntry>, ReadingListError> {
        let status = parse_status(status)?;
        self.books
            .find_by_user_id_and_status(user_id, status)
            .await
            .map_err(map_book_error)
    }

    async fn update_status(&self, book_id: BookId, status: &str) -> Result<(), ReadingListError> {
        self.change_status(book_id, None, status).await.map(|_| ())
    }

    async fn update_owned_status(
        &self,
        owner: UserId,
        book_id: BookId,
        status: &str,
    ) -> Result<BookEntry, ReadingListError> {
        self.change_status(book_id, Some(owner), status).await
    }

    async fn remove_book(&self, book_id: BookId) -> Result<(), ReadingListError> {
        self.delete_entry(book_id, None).await
    }

    async fn remove_owned_book(
        &self,
        owner: UserId,
        book_id: BookId,
    ) -> Result<(), ReadingListError> {
        self.delete_entry(book_id, Some(owner)).await
    }
}
