//! Used book inventory service.
//!
//! Wires the book store chosen by configuration into the books module and
//! serves it over HTTP.

pub mod modules;

use std::sync::Arc;

use anyhow::Context;
use usedbook_db::BookStore;
use usedbook_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub use modules::books::{models, pricing, service};

/// Registry holding every module, backed by `store`.
pub fn build_registry(store: Arc<dyn BookStore>) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store);
    registry
}

/// Open the store, run the module lifecycle, and serve until shutdown.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let store = usedbook_db::connect(&settings.store)
        .await
        .context("failed to open book store")?;

    let registry = build_registry(store);
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served = usedbook_http::start_server(&registry, &settings).await;
    let stopped = registry.stop_all().await;
    shutdown_outcome(served, stopped)
}

// A server failure outranks a failure to stop cleanly afterwards.
fn shutdown_outcome(
    served: anyhow::Result<()>,
    stopped: anyhow::Result<()>,
) -> anyhow::Result<()> {
    match (served, stopped) {
        (Ok(()), stopped) => stopped,
        (Err(served), Ok(())) => Err(served),
        (Err(served), Err(stopped)) => {
            tracing::error!(error = %format!("{stopped:#}"), "failed to stop modules");
            Err(served)
        }
    }
}
