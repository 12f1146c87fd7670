//! Book catalog outbound adapters.
//!
//! Provides a thin HTTP implementation of the `CatalogSearch` port backed by
//! the Google Books volumes API.

mod dto;
mod google_books;

pub use google_books::{DEFAULT_GOOGLE_BOOKS_BASE_URL, GoogleBooksCatalog};
