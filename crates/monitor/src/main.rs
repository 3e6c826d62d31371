//! Drowsiness Monitor - Main Entry Point

use std::path::PathBuf;

use monitor::{init_logging, run, Settings, DEFAULT_CONFIG_FILE};
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    let settings = Settings::load(&config_path)?;
    init_logging(&settings.log_level)?;

    info!("=== Drowsiness Monitor v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Settings from {} (missing file uses defaults)", config_path.display());

    let summary = run(settings).await?;
    summary.log();

    Ok(())
}
