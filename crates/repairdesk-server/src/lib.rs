//! HTTP host for the repairdesk API.
//!
//! Holds the server configuration and assembles the top-level router; the
//! binary in `main.rs` adds logging, signal handling and the listener.

pub mod sample;

use std::path::Path;

use axum::Router;
use repairdesk_api::{SharedStore, api_router};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `REPAIRDESK_*` environment variables. Every field is optional.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  /// Start the session with a couple of demo records.
  pub seed_sample_data: bool,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:             "127.0.0.1".to_string(),
      port:             8080,
      seed_sample_data: false,
    }
  }
}

impl ServerConfig {
  /// Layer `path` (if it exists) under the environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("REPAIRDESK").try_parsing(true))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The API mounted under `/api`, with request tracing.
pub fn app(store: SharedStore) -> Router {
  Router::new()
    .nest("/api", api_router(store))
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────
