use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single physical copy listed for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Store-generated identifier, unique per copy
    pub id: String,
    pub isbn: String,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub edition: Option<String>,
    pub price: f64,
}

impl Book {
    /// Fresh record id. UUID v7 keeps ids sortable by creation time.
    pub fn generate_id() -> String {
        Uuid::now_v7().to_string()
    }

    /// Another copy of this book under a new id at `price`.
    pub fn copy_at(&self, price: f64) -> Self {
        Self {
            id: Self::generate_id(),
            price,
            ..self.clone()
        }
    }
}
