use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{BookStore, StoreError};
use crate::modules::books::models::{Book, BookFields, BookId};

/// Stateful in-memory store for request round-trip tests.
#[derive(Default)]
pub(crate) struct MemoryBookStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    last_id: BookId,
    books: BTreeMap<BookId, Book>,
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn create(&self, fields: BookFields) -> Result<Book, StoreError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let book = Book {
            id: inner.last_id,
            name: fields.name,
            description: fields.description,
            author: fields.author,
        };
        inner.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn find_all(&self) -> Result<Vec<Book>, StoreError> {
        Ok(self.inner.read().await.books.values().cloned().collect())
    }

    async fn find_matching(&self, term: &str) -> Result<Vec<Book>, StoreError> {
        let needle = term.to_lowercase();
        let matches = |text: &str| text.to_lowercase().contains(&needle);

        Ok(self
            .inner
            .read()
            .await
            .books
            .values()
            .filter(|b| matches(&b.name) || matches(&b.description) || matches(&b.author))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: BookId) -> Result<Book, StoreError> {
        self.inner
            .read()
            .await
            .books
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn save(&self, book: &Book) -> Result<(), StoreError> {
        match self.inner.write().await.books.get_mut(&book.id) {
            Some(stored) => {
                *stored = book.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(book.id)),
        }
    }

    async fn delete(&self, book: &Book) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .books
            .remove(&book.id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(book.id))
    }
}
