use anyhow::Context;
use usedbook_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load settings")?;
    usedbook_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        store = ?settings.store.backend,
        "usedbook-app bootstrap starting"
    );

    usedbook_app::run(settings).await
}
