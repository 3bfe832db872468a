//! Persistence gateway for books.
//!
//! Handlers only ever see [`BookStore`]; the PostgreSQL adapter is one
//! implementation, test doubles are others.

use async_trait::async_trait;

use super::models::{Book, BookFields, BookId};

#[cfg(test)]
pub(crate) mod memory;
mod postgres;

pub use postgres::PgBookStore;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("book {0} not found")]
    NotFound(BookId),

    #[error("database failure: {0}")]
    Database(#[from] sqlx::Error),
}

/// Capability set the book handlers need from a relational store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Insert a new row; the returned record carries the store-assigned id
    async fn create(&self, fields: BookFields) -> Result<Book, StoreError>;

    /// Every row, in store-native order
    async fn find_all(&self) -> Result<Vec<Book>, StoreError>;

    /// Rows whose name, description or author contains `term`, ignoring case.
    /// No match is an empty list, not an error.
    async fn find_matching(&self, term: &str) -> Result<Vec<Book>, StoreError>;

    /// Fails with [`StoreError::NotFound`] when no row has `id`
    async fn find_by_id(&self, id: BookId) -> Result<Book, StoreError>;

    /// Overwrite the row identified by `book.id`
    async fn save(&self, book: &Book) -> Result<(), StoreError>;

    /// Remove the row identified by `book.id`
    async fn delete(&self, book: &Book) -> Result<(), StoreError>;
}
