use async_trait::async_trait;
use sqlx::PgPool;

use super::{BookStore, StoreError};
use crate::modules::books::models::{Book, BookFields, BookId};

/// `books` table access over a shared connection pool.
#[derive(Clone)]
pub struct PgBookStore {
    pool: PgPool,
}

impl PgBookStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn create(&self, fields: BookFields) -> Result<Book, StoreError> {
        let book = sqlx::query_as::<_, Book>(
            "INSERT INTO books (name, description, author)
             VALUES ($1, $2, $3)
             RETURNING id, name, description, author",
        )
        .bind(fields.name)
        .bind(fields.description)
        .bind(fields.author)
        .fetch_one(&self.pool)
        .await?;

        Ok(book)
    }

    async fn find_all(&self) -> Result<Vec<Book>, StoreError> {
        let books = sqlx::query_as::<_, Book>("SELECT id, name, description, author FROM books")
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    async fn find_matching(&self, term: &str) -> Result<Vec<Book>, StoreError> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT id, name, description, author FROM books
             WHERE name ILIKE $1 OR description ILIKE $1 OR author ILIKE $1",
        )
        .bind(contains_pattern(term))
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn find_by_id(&self, id: BookId) -> Result<Book, StoreError> {
        sqlx::query_as::<_, Book>("SELECT id, name, description, author FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    async fn save(&self, book: &Book) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE books SET name = $2, description = $3, author = $4 WHERE id = $1",
        )
        .bind(book.id)
        .bind(&book.name)
        .bind(&book.description)
        .bind(&book.author)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(book.id));
        }
        Ok(())
    }

    async fn delete(&self, book: &Book) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(book.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(book.id));
        }
        Ok(())
    }
}

/// `%term%` with LIKE wildcards in `term` escaped (backslash is the default escape).
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
