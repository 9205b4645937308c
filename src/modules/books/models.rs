use serde::{Deserialize, Serialize};

pub use usedbook_db::Book;

/// A brand-new listing offered by a seller.
///
/// Every field defaults so that missing values surface as validation
/// violations rather than as JSON decoding failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewListing {
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub edition: Option<String>,
    #[serde(default)]
    pub price: f64,
}

/// One rejected field of a [`NewListing`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: &'static str,
    pub error: &'static str,
}

impl NewListing {
    /// Fields that break the listing rules; empty when the listing is valid.
    pub fn violations(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        if self.isbn.trim().is_empty() {
            violations.push(Violation {
                field: "isbn",
                error: "ISBN must not be blank",
            });
        }
        if self.title.trim().is_empty() {
            violations.push(Violation {
                field: "title",
                error: "Title must not be blank",
            });
        }
        // Also rejects NaN
        if !(self.price > 0.0 && self.price.is_finite()) {
            violations.push(Violation {
                field: "price",
                error: "Price must be positive",
            });
        }
        violations
    }

    pub fn into_book(self) -> Book {
        Book {
            id: Book::generate_id(),
            isbn: self.isbn,
            title: self.title,
            author: self.author,
            edition: self.edition,
            price: self.price,
        }
    }
}

/// Body returned when a copy is listed for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleReceipt {
    pub status: String,
    pub price: f64,
}

impl SaleReceipt {
    pub fn success(price: f64) -> Self {
        Self {
            status: "success".to_string(),
            price,
        }
    }
}

/// Body returned when a copy is bought out of the inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    pub status: String,
    pub id: String,
}

impl PurchaseReceipt {
    pub fn success(id: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            id: id.into(),
        }
    }
}
