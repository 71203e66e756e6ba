//! repairdesk server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), creates an empty
//! in-memory session store, and serves the JSON API under `/api`. The store
//! is discarded on shutdown.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use repairdesk_api::SharedStore;
use repairdesk_core::Store;
use repairdesk_server::{ServerConfig, app, sample};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "repairdesk repair-request server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Seed demo records regardless of the configuration.
  #[arg(long)]
  sample_data: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let mut store = Store::new();
  if cli.sample_data || server_cfg.seed_sample_data {
    sample::seed(&mut store).context("failed to seed sample data")?;
  }
  let store = repairdesk_api::shared(store);

  let address = server_cfg.address();
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app(store.clone()))
    .with_graceful_shutdown(shutdown_signal(store))
    .await
    .context("server error")?;

  Ok(())
}

/// Resolve on Ctrl-C, reporting what the session held before it goes away.
async fn shutdown_signal(store: SharedStore) {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!("failed to listen for shutdown signal: {e}");
    std::future::pending::<()>().await;
  }
  let store = store.read().await;
  tracing::info!(
    requests = store.requests().len(),
    persons = store.persons().len(),
    "shutting down; discarding session data"
  );
}
