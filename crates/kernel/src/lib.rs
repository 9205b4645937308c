//! Settings, module trait, and module registry shared by every service crate.

pub mod module;
pub mod registry;
pub mod settings;

pub use module::{mount_path, InitCtx, Module};
pub use registry::ModuleRegistry;
