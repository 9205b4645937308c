//! Book record and the store backends the service persists it with.

use std::sync::Arc;

use usedbook_kernel::settings::{StoreBackend, StoreSettings};

mod file;
mod memory;
pub mod record;
pub mod store;

pub use file::FileBookStore;
pub use memory::InMemoryBookStore;
pub use record::Book;
pub use store::{BookStore, StoreError};

/// Open the store backend selected by configuration.
pub async fn connect(settings: &StoreSettings) -> Result<Arc<dyn BookStore>, StoreError> {
    match settings.backend {
        StoreBackend::Memory => {
            tracing::info!(target: "usedbook-db", backend = "memory", "opening book store");
            Ok(Arc::new(InMemoryBookStore::new()))
        }
        StoreBackend::File => {
            tracing::info!(
                target: "usedbook-db",
                backend = "file",
                path = %settings.path.display(),
                "opening book store"
            );
            Ok(Arc::new(FileBookStore::open(&settings.path).await?))
        }
    }
}
