//! In-memory [`BookRepository`].

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{BookPersistenceError, BookRepository};
use crate::domain::{BookEntry, BookId, ReadingStatus, UserId};

/// Book store keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryBookRepository {
    books: Mutex<HashMap<BookId, BookEntry>>,
}

impl InMemoryBookRepository {
    /// Empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<BookId, BookEntry>>, BookPersistenceError> {
        self.books
            .lock()
            .map_err(|_| BookPersistenceError::query("book store lock poisoned"))
    }

    fn collect<F>(&self, keep: F) -> Result<Vec<BookEntry>, BookPersistenceError>
    where
        F: Fn(&BookEntry) -> bool,
    {
        let books = self.lock()?;
        let mut entries: Vec<BookEntry> = books
            .values()
            .filter(|&entry| keep(entry))
            .cloned()
            .collect();
        entries.sort_by_key(|entry| (entry.created_at(), *entry.id().as_uuid()));
        Ok(entries)
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn save(&self, entry: &BookEntry) -> Result<(), BookPersistenceError> {
        self.lock()?.insert(entry.id(), entry.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: BookId) -> Result<Option<BookEntry>, BookPersistenceError> {
        Ok(self.lock()?.get(&id).cloned())
    }

    async fn find_by_user_id(
        &self,
        user_id: UserId,
    ) -> Result<Vec<BookEntry>, BookPersistenceError> {
        self.collect(|entry| entry.is_owned_by(user_id))
    }

    async fn find_by_user_id_and_status(
        &self,
        user_id: UserId,
        status: ReadingStatus,
    ) -> Result<Vec<BookEntry>, BookPersistenceError> {
        self.collect(|entry| entry.is_owned_by(user_id) && entry.status() == status)
    }

    async fn update(&self, entry: &BookEntry) -> Result<(), BookPersistenceError> {
        let mut books = self.lock()?;
        match books.get_mut(&entry.id()) {
            Some(stored) => {
                *stored = entry.clone();
                Ok(())
            }
            None => Err(BookPersistenceError::missing(entry.id().to_string())),
        }
    }

    async fn delete(&self, id: BookId) -> Result<(), BookPersistenceError> {
        self.lock()?
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| BookPersistenceError::missing(id.to_string()))
    }
}
