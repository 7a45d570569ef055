//! Listing Scout command line entry point
//!
//! Usage: `listing-scout [CONFIG_PATH]`. Without a path the per-user
//! configuration file is used (and created with defaults when missing).

use anyhow::Context;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use listing_scout::application::{Driver, ItemProcessor, Pacer, RandomDelay};
use listing_scout::infrastructure::{
    ConfigManager, HttpPageProvider, init_logging_with_config, read_input_rows,
    write_output_records,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let manager = match std::env::args().nth(1) {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    let first_run = !manager.config_path().exists();
    let config = manager
        .load_config()
        .await
        .with_context(|| format!("Failed to load configuration from {:?}", manager.config_path()))?;

    // No subscriber exists before this call; startup events are logged after it.
    init_logging_with_config(&config.logging)?;
    info!("🚀 Listing Scout starting");
    if first_run {
        info!("📝 Wrote default configuration to {:?}", manager.config_path());
    }
    info!("⚙️ Loaded configuration from {:?}", manager.config_path());

    let rows = read_input_rows(&config.io.input_path, &config.io.effective_required_columns())?;
    info!("📄 Loaded {} item(s) from {:?}", rows.len(), config.io.input_path);

    let provider = Arc::new(HttpPageProvider::new(&config.scraping)?);
    let pacer: Arc<dyn Pacer> = Arc::new(RandomDelay::from_config(&config.scraping));
    let processor = ItemProcessor::new(&config, provider, Arc::clone(&pacer))?;
    let driver = Driver::new(processor, pacer);

    let cancel = CancellationToken::new();
    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("🛑 Interrupt received, stopping after the current item");
            ctrl_c_token.cancel();
        }
    });

    let summary = driver.run(&rows, &cancel).await;

    let written = write_output_records(&config.io.output_path, &summary.records)?;
    info!(
        "✅ Extraction complete. Rows saved: {} ({} skipped) to {:?}",
        written,
        summary.skipped.len(),
        config.io.output_path
    );
    Ok(())
}
