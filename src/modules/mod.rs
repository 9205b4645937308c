pub mod books;

use std::sync::Arc;

use usedbook_db::BookStore;
use usedbook_kernel::ModuleRegistry;

/// Register all service modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, store: Arc<dyn BookStore>) {
    registry.register(books::create_module(store));
}
