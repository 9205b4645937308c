use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::memory::InMemoryBookStore;
use crate::record::Book;
use crate::store::{BookStore, StoreError};

/// Store backed by a JSON array on disk.
///
/// The whole file is held in memory and rewritten on each mutation. Writes go
/// to a sibling temp file that is renamed over the original, so a crash leaves
/// either the old or the new contents, and a failed write leaves memory as it
/// was.
pub struct FileBookStore {
    path: PathBuf,
    books: InMemoryBookStore,
    write_lock: Mutex<()>,
}

impl FileBookStore {
    /// Load `path`, starting empty if the file does not exist yet.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let books: Vec<Book> = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        tracing::debug!(path = %path.display(), count = books.len(), "book file loaded");

        Ok(Self {
            path,
            books: InMemoryBookStore::from_books(books),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current contents keyed by id, for building the next on-disk state.
    async fn staged(&self) -> BTreeMap<String, Book> {
        self.books
            .snapshot()
            .await
            .into_iter()
            .map(|book| (book.id.clone(), book))
            .collect()
    }

    async fn write_file(&self, books: &BTreeMap<String, Book>) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        let books: Vec<&Book> = books.values().collect();
        let bytes = serde_json::to_vec_pretty(&books).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_err)?;
        Ok(())
    }
}

#[async_trait]
impl BookStore for FileBookStore {
    async fn find_all(&self) -> Result<Vec<Book>, StoreError> {
        self.books.find_all().await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Book>, StoreError> {
        self.books.find_by_id(id).await
    }

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>, StoreError> {
        self.books.find_by_isbn(isbn).await
    }

    // Mutations reach memory only after the file write succeeds.
    async fn save(&self, book: Book) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut next = self.staged().await;
        next.insert(book.id.clone(), book.clone());
        self.write_file(&next).await?;
        self.books.save(book).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut next = self.staged().await;
        if next.remove(id).is_none() {
            return Ok(false);
        }
        self.write_file(&next).await?;
        self.books.delete_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Per-test directory under the system temp dir, removed on drop.
    struct Scratch {
        dir: PathBuf,
    }

    impl Scratch {
        fn new() -> Self {
            Self {
                dir: std::env::temp_dir().join(format!("usedbook-{}", Book::generate_id())),
            }
        }

        fn books_path(&self) -> PathBuf {
            self.dir.join("books.json")
        }

        /// Put a regular file where the store's directory should be.
        fn block_directory(&self) {
            let _ = std::fs::remove_dir_all(&self.dir);
            std::fs::write(&self.dir, b"in the way").unwrap();
        }
    }

    impl Drop for Scratch {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.dir);
            let _ = std::fs::remove_file(&self.dir);
        }
    }

    fn book(isbn: &str, price: f64) -> Book {
        Book {
            id: Book::generate_id(),
            isbn: isbn.to_string(),
            title: "Refactoring".to_string(),
            author: Some("M. Fowler".to_string()),
            edition: Some("2nd".to_string()),
            price,
        }
    }

    #[tokio::test]
    async fn missing_file_opens_empty() {
        let scratch = Scratch::new();
        let store = FileBookStore::open(scratch.books_path()).await.unwrap();
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn mutations_survive_reopen() {
        let scratch = Scratch::new();
        let kept = book("111", 30.0);
        let sold = book("222", 20.0);

        {
            let store = FileBookStore::open(scratch.books_path()).await.unwrap();
            store.save(kept.clone()).await.unwrap();
            store.save(sold.clone()).await.unwrap();
            assert!(store.delete_by_id(&sold.id).await.unwrap());
            assert!(!store.delete_by_id(&sold.id).await.unwrap());
        }

        let reopened = FileBookStore::open(scratch.books_path()).await.unwrap();
        assert_eq!(reopened.find_all().await.unwrap(), vec![kept]);

        let dir = scratch.dir.clone();
        drop(scratch);
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn failed_save_leaves_store_unchanged() {
        let scratch = Scratch::new();
        let store = FileBookStore::open(scratch.books_path()).await.unwrap();
        scratch.block_directory();

        let err = store.save(book("111", 30.0)).await.unwrap_err();

        assert!(matches!(err, StoreError::Io { .. }));
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_delete_keeps_the_copy() {
        let scratch = Scratch::new();
        let store = FileBookStore::open(scratch.books_path()).await.unwrap();
        let listed = book("111", 30.0);
        store.save(listed.clone()).await.unwrap();
        scratch.block_directory();

        assert!(store.delete_by_id(&listed.id).await.is_err());
        assert_eq!(store.find_by_id(&listed.id).await.unwrap(), Some(listed));
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let scratch = Scratch::new();
        let path = scratch.books_path();
        tokio::fs::create_dir_all(&scratch.dir).await.unwrap();
        tokio::fs::write(&path, b"not json").await.unwrap();

        let err = FileBookStore::open(&path).await.err().unwrap();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }
}
