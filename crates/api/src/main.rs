//! Flight Delay Pipeline - Main Entry Point

use anyhow::Context;
use api::{bootstrap, init_logging, run_server, Settings};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== Flight Delay Pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    let settings = Settings::load().context("Failed to load configuration")?;

    // Training must complete before the listener binds; the process must not
    // serve predictions with an unfitted model.
    let model = bootstrap::train_from_dataset(&settings).context("Startup training failed")?;

    run_server(&settings, model).await
}
