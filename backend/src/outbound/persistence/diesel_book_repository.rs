//! PostgreSQL-backed [`BookRepository`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{BookPersistenceError, BookRepository};
use crate::domain::{
    BookDetails, BookEntry, BookEntryParts, BookId, ReadingStatus, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{BookChangeset, BookRow, NewBookRow};
use super::pool::{DbPool, PoolError};
use super::schema::books;

/// Diesel implementation of the book repository port.
#[derive(Clone)]
pub struct DieselBookRepository {
    pool: DbPool,
}

impl DieselBookRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BookPersistenceError {
    map_basic_pool_error(error, BookPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> BookPersistenceError {
    map_basic_diesel_error(
        error,
        BookPersistenceError::query,
        BookPersistenceError::connection,
    )
}

fn row_to_entry(row: BookRow) -> Result<BookEntry, BookPersistenceError> {
    let book_id = row.id;
    let status = row.status.parse::<ReadingStatus>().map_err(|err| {
        warn!(%book_id, status = %err.value, "stored book has unknown status");
        BookPersistenceError::query(format!("stored book {book_id} has invalid status"))
    })?;
    BookEntry::from_parts(BookEntryParts {
        id: BookId::from_uuid(row.id),
        details: BookDetails {
            catalog_id: row.catalog_id,
            title: row.title,
            authors: row.authors,
            description: row.description,
            categories: row.categories,
            image_ref: row.image_ref,
        },
        status,
        owner: UserId::from_uuid(row.user_id),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
    .map_err(|err| {
        warn!(%book_id, error = %err, "stored book failed validation");
        BookPersistenceError::query(format!("stored book {book_id} is invalid: {err}"))
    })
}

fn rows_to_entries(rows: Vec<BookRow>) -> Result<Vec<BookEntry>, BookPersistenceError> {
    rows.into_iter().map(row_to_entry).collect()
}

#[async_trait]
impl BookRepository for DieselBookRepository {
    async fn save(&self, entry: &BookEntry) -> Result<(), BookPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewBookRow {
            id: *entry.id().as_uuid(),
            user_id: *entry.owner().as_uuid(),
            catalog_id: entry.catalog_id(),
            title: entry.title(),
            authors: entry.authors(),
            description: entry.description(),
            categories: entry.categories(),
            image_ref: entry.image_ref(),
            status: entry.status().as_str(),
            created_at: entry.created_at(),
            updated_at: entry.updated_at(),
        };
        diesel::insert_into(books::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: BookId) -> Result<Option<BookEntry>, BookPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<BookRow> = books::table
            .find(id.as_uuid())
            .select(BookRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_entry).transpose()
    }

    async fn find_by_user_id(
        &self,
        user_id: UserId,
    ) -> Result<Vec<BookEntry>, BookPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<BookRow> = books::table
            .filter(books::user_id.eq(user_id.as_uuid()))
            .order((books::created_at.asc(), books::id.asc()))
            .select(BookRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_entries(rows)
    }

    async fn find_by_user_id_and_status(
        &self,
        user_id: UserId,
        status: ReadingStatus,
    ) -> Result<Vec<BookEntry>, BookPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<BookRow> = books::table
            .filter(books::user_id.eq(user_id.as_uuid()))
            .filter(books::status.eq(status.as_str()))
            .order((books::created_at.asc(), books::id.asc()))
            .select(BookRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_entries(rows)
    }

    async fn update(&self, entry: &BookEntry) -> Result<(), BookPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = BookChangeset {
            catalog_id: entry.catalog_id(),
            title: entry.title(),
            authors: entry.authors(),
            description: entry.description(),
            categories: entry.categories(),
            image_ref: entry.image_ref(),
            status: entry.status().as_str(),
            updated_at: entry.updated_at(),
        };
        let affected = diesel::update(books::table.find(entry.id().as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if affected == 0 {
            return Err(BookPersistenceError::missing(entry.id().to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: BookId) -> Result<(), BookPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::delete(books::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if affected == 0 {
            return Err(BookPersistenceError::missing(id.to_string()));
        }
        Ok(())
    }
}
