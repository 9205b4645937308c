use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::record::Book;
use crate::store::{BookStore, StoreError};

/// Process-local store; contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryBookStore {
    books: RwLock<BTreeMap<String, Book>>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_books(books: impl IntoIterator<Item = Book>) -> Self {
        Self {
            books: RwLock::new(
                books
                    .into_iter()
                    .map(|book| (book.id.clone(), book))
                    .collect(),
            ),
        }
    }

    pub(crate) async fn snapshot(&self) -> Vec<Book> {
        self.books.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn find_all(&self) -> Result<Vec<Book>, StoreError> {
        Ok(self.snapshot().await)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Book>, StoreError> {
        Ok(self.books.read().await.get(id).cloned())
    }

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>, StoreError> {
        Ok(self
            .books
            .read()
            .await
            .values()
            .find(|book| book.isbn == isbn)
            .cloned())
    }

    async fn save(&self, book: Book) -> Result<(), StoreError> {
        self.books.write().await.insert(book.id.clone(), book);
        Ok(())
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.books.write().await.remove(id).is_some())
    }
}
