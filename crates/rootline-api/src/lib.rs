//! JSON REST API for rootline.
//!
//! Exposes an axum [`Router`] backed by any
//! [`rootline_core::store::GraphStore`]. Transport and TLS concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", rootline_api::router(state.clone()))
//! ```

pub mod error;
pub mod routes;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use rootline_core::store::GraphStore;
use rootline_gedcom::NormalizeOptions;
use serde::Deserialize;

pub use error::ApiError;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ROOTLINE_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 7070 }
fn default_store_path() -> PathBuf { PathBuf::from("rootline.db") }

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: GraphStore> {
  pub store:     Arc<S>,
  /// Normalization knobs applied to every import.
  pub normalize: Arc<NormalizeOptions>,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: GraphStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Ingestion
    .route("/import", post(routes::import::handler::<S>))
    // Sources
    .route("/sources", get(routes::sources::list::<S>))
    .route(
      "/sources/{id}",
      get(routes::sources::get_one::<S>)
        .delete(routes::sources::delete_one::<S>),
    )
    // Persons
    .route("/persons/search", get(routes::persons::search::<S>))
    .route("/persons/{id}", get(routes::persons::get_one::<S>))
    // Traversal
    .route(
      "/persons/{id}/neighborhood",
      get(routes::traverse::neighborhood::<S>),
    )
    .route(
      "/persons/{id}/ancestors",
      get(routes::traverse::ancestors::<S>),
    )
    .route(
      "/persons/{id}/descendants",
      get(routes::traverse::descendants::<S>),
    )
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────
