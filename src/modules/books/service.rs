use std::sync::Arc;

use thiserror::Error;
use usedbook_db::{BookStore, StoreError};

use super::models::{Book, NewListing};
use super::pricing;

#[derive(Error, Debug)]
pub enum BookError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidOperation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type BookResult<T> = Result<T, BookError>;

/// Inventory operations over an explicitly supplied book store.
#[derive(Clone)]
pub struct BookService {
    store: Arc<dyn BookStore>,
}

impl BookService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    /// All copies currently in stock.
    pub async fn get_available_books(&self) -> BookResult<Vec<Book>> {
        Ok(self.store.find_all().await?)
    }

    /// Buy the copy with `id`, removing it from the inventory.
    pub async fn buy_book(&self, id: &str) -> BookResult<()> {
        let not_found = || BookError::NotFound(format!("Book with ID {} not found.", id));

        let book = self.store.find_by_id(id).await?.ok_or_else(not_found)?;

        // A concurrent buyer may have taken it between lookup and delete
        if !self.store.delete_by_id(id).await? {
            return Err(not_found());
        }

        tracing::info!(book_id = %book.id, isbn = %book.isbn, price = book.price, "book bought");
        Ok(())
    }

    /// Resell the copy with `id`: a depreciated copy joins the inventory.
    pub async fn sell_book(&self, id: &str) -> BookResult<f64> {
        let original = self.store.find_by_id(id).await?.ok_or_else(|| {
            BookError::NotFound(format!("Book with ID {} not found for resale.", id))
        })?;
        self.resell(&original).await
    }

    /// Resell a copy located by ISBN.
    pub async fn sell_book_by_isbn(&self, isbn: &str) -> BookResult<f64> {
        let original = self
            .store
            .find_by_isbn(isbn)
            .await?
            .ok_or_else(|| BookError::NotFound(format!("No book with ISBN {} found.", isbn)))?;
        self.resell(&original).await
    }

    /// List a new copy at its asking price. Duplicate ISBNs are allowed.
    pub async fn sell_new_book(&self, listing: NewListing) -> BookResult<f64> {
        if !listing.violations().is_empty() {
            return Err(BookError::InvalidOperation(
                "Invalid book data provided.".to_string(),
            ));
        }

        let book = listing.into_book();
        let price = book.price;
        tracing::info!(book_id = %book.id, isbn = %book.isbn, price, "new book listed");

        self.store.save(book).await?;
        Ok(price)
    }

    // The original copy stays listed alongside the resold one.
    async fn resell(&self, original: &Book) -> BookResult<f64> {
        let price = pricing::resale_price(original.price);
        let copy = original.copy_at(price);

        tracing::info!(
            source_id = %original.id,
            book_id = %copy.id,
            isbn = %copy.isbn,
            price,
            "book resold"
        );

        self.store.save(copy).await?;
        Ok(price)
    }
}
