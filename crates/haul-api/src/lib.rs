//! JSON REST API for Haul.
//!
//! Exposes an axum [`Router`] backed by any [`haul_core::store::PickupStore`].
//! TLS and transport concerns are the caller's responsibility; admin routes
//! are gated by the [`auth::AdminAuth`] installed in [`AppState`].
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", haul_api::api_router(state))
//! ```

pub mod accounts;
pub mod auth;
pub mod error;
pub mod submissions;

use std::sync::Arc;

use axum::{
  Json, Router,
  extract::State,
  routing::{get, post},
};
use haul_core::store::PickupStore;
use serde::Serialize;

pub use error::ApiError;

use auth::AdminAuth;

// ─── Application state ────────────────────────────────────────────────────────

/// Settings handed to browser clients as-is.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
  /// Key for the map and address-autocomplete widgets.
  pub maps_api_key: Option<String>,
}

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: PickupStore> {
  pub store:  Arc<S>,
  pub admin:  Arc<dyn AdminAuth>,
  pub client: Arc<ClientConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: PickupStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Submissions
    .route(
      "/submissions",
      get(submissions::list::<S>)
        .post(submissions::create::<S>)
        .delete(submissions::delete_all::<S>),
    )
    .route("/submissions/stats", get(submissions::stats::<S>))
    .route(
      "/submissions/{id}",
      get(submissions::get_one::<S>)
        .patch(submissions::update::<S>)
        .delete(submissions::delete_one::<S>),
    )
    .route("/submissions/{id}/schedule", post(submissions::schedule::<S>))
    // Accounts
    .route("/accounts", get(accounts::list::<S>).post(accounts::upsert::<S>))
    .route("/accounts/{email}", get(accounts::get_one::<S>))
    // Client settings
    .route("/config", get(client_config::<S>))
    .with_state(state)
}

/// `GET /config`
async fn client_config<S>(State(state): State<AppState<S>>) -> Json<ClientConfig>
where
  S: PickupStore + Clone + Send + Sync + 'static,
{
  Json(ClientConfig::clone(&state.client))
}

// ─── Integration tests ────────────────────────────────────────────────────────
