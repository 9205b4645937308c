use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::record::Book;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to access book file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("book file {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Persistence contract the book service is written against.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Every stored record, ordered by id.
    async fn find_all(&self) -> Result<Vec<Book>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Book>, StoreError>;

    /// First record (by id order) carrying `isbn`.
    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>, StoreError>;

    /// Insert or replace the record with `book.id`.
    async fn save(&self, book: Book) -> Result<(), StoreError>;

    /// Returns whether a record was removed.
    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError>;
}
