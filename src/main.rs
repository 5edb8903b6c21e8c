//! KunaCollector - Main Entry Point
//!
//! Polls per-symbol trade history from the Kuna exchange into a local
//! deduplicated cache, persisted as one CSV file per symbol.

use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use kuna_collector::collector::{Poller, SymbolRegistry, TradeStore};
use kuna_collector::config::loader::load_config;
use kuna_collector::kuna::rest::KunaRestClient;

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Override the data directory from the configuration
    #[arg(long)]
    data_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting KunaCollector");
    info!("Configuration file: {}", args.config);

    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let mut config = load_config(Some(&args.config)).context("failed to load configuration")?;
    if let Some(data_dir) = args.data_dir {
        config.collector.data_dir = data_dir;
    }

    let client = KunaRestClient::from_config(&config.kuna, &config.settings)
        .context("failed to build REST client")?;

    // Symbol discovery runs once; without a listing nothing can be tracked
    let registry = SymbolRegistry::from_config(&config.collector);
    let symbols = registry
        .refresh(&client)
        .await
        .context("failed to fetch the market listing at startup")?;

    let store = TradeStore::new(&config.collector.data_dir)
        .context("failed to prepare the data directory")?;

    let mut poller = Poller::new(
        client,
        store,
        symbols,
        Duration::from_secs(config.collector.poll_interval_seconds),
    );
    poller.hydrate();

    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received shutdown signal");
            let _ = stop_tx.send(true);
        }
    });

    poller.run(stop_rx).await?;

    info!("Collector stopped");
    Ok(())
}
