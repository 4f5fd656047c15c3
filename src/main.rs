use anyhow::Context;
use codeshelf_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load codeshelf settings")?;
    codeshelf_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        address = %settings.server.bind_address(),
        seed = settings.catalog.seed,
        "codeshelf server bootstrap starting"
    );

    codeshelf_app::serve(&settings).await
}
