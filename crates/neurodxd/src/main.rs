//! NeuroDx Daemon - serves the explanation service over HTTP
//!
//! Answers questions about a diagnosis, runs the prediction provider on
//! uploaded scans and renders reports.

use anyhow::Result;
use neurodx_common::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("NeuroDx Daemon v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::load(None)?;
    neurodxd::server::run(&config).await?;

    Ok(())
}
