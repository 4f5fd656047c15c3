//! Codeshelf application library
//!
//! Application modules plus the bootstrap that wires them into the HTTP
//! server.

pub mod modules;

use anyhow::Context;
use codeshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub use modules::*;

/// Build a registry holding every application module
pub fn registry(settings: &Settings) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, settings);
    registry
}

/// Run the catalog server until a shutdown signal arrives
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let registry = registry(settings);
    let ctx = InitCtx { settings };

    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    let served = codeshelf_http::start_server(&registry, settings)
        .await
        .context("catalog server failed");

    shut_down(&registry, served).await
}

/// Stop every module, keeping a server failure ahead of any stop failure
async fn shut_down(registry: &ModuleRegistry, served: anyhow::Result<()>) -> anyhow::Result<()> {
    let stopped = registry.stop_modules().await;

    match (served, stopped) {
        (Err(err), Err(stop_err)) => {
            tracing::error!(error = ?stop_err, "module shutdown failed after server error");
            Err(err)
        }
        (served, stopped) => served.and(stopped),
    }
}
