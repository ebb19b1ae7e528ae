//! Baarez Daemon - prompt-routing agent backend
//!
//! Classifies free-text prompts and answers them with the fact store or the calculator.

use anyhow::Result;
use baarezd::config::Config;
use baarezd::server;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Baarez Daemon v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::load();
    server::run(config).await?;

    info!("Baarez Daemon stopped");
    Ok(())
}
