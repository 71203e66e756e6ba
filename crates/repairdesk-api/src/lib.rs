//! JSON REST API for repairdesk.
//!
//! Exposes an axum [`Router`] over a [`SharedStore`]. TLS, auth and
//! persistence are out of scope; the store lives as long as the process.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", repairdesk_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod params;
pub mod persons;
pub mod reports;
pub mod requests;

use std::sync::Arc;

use axum::{Router, routing::get};
use repairdesk_core::Store;
use tokio::sync::RwLock;

pub use error::ApiError;

/// The one session store, shared between handlers. Writers are exclusive.
pub type SharedStore = Arc<RwLock<Store>>;

/// Wrap `store` for use with [`api_router`].
pub fn shared(store: Store) -> SharedStore { Arc::new(RwLock::new(store)) }

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router(store: SharedStore) -> Router<()> {
  Router::new()
    // Requests
    .route("/requests", get(requests::list).post(requests::create))
    .route("/requests/recent", get(requests::recent))
    .route(
      "/requests/{id}",
      get(requests::get_one)
        .patch(requests::update_one)
        .delete(requests::delete_one),
    )
    // Persons
    .route("/persons", get(persons::list).post(persons::create))
    .route(
      "/persons/{id}",
      get(persons::get_one)
        .patch(persons::update_one)
        .delete(persons::delete_one),
    )
    // Reports
    .route("/reports/summary", get(reports::summary))
    .route("/reports/export", get(reports::export))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────
