//! HTTP server assembly for Haul.
//!
//! Mounts the JSON API from `haul-api` under `/api`, adds a health check and
//! request tracing, and defines the runtime configuration.

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use haul_api::{AppState, ClientConfig, auth::BasicAuth};
use haul_core::store::PickupStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `HAUL_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  /// SQLite database file. `DATABASE_URL` overrides it when set.
  pub store_path:          PathBuf,
  pub admin_username:      String,
  /// argon2 PHC string; generate with `server --hash-password`.
  pub admin_password_hash: String,
  /// Passed through to browser clients for map widgets.
  #[serde(default)]
  pub maps_api_key:        Option<String>,
}

impl ServerConfig {
  /// Layer defaults, the optional config file, `HAUL_*` variables and
  /// `DATABASE_URL`, in increasing precedence.
  pub fn load(
    file: impl Into<PathBuf>,
    database_url: Option<String>,
  ) -> Result<Self, config::ConfigError> {
    let database_path = database_url
      .as_deref()
      .map(sqlite_path)
      .transpose()?
      .map(|path| path.to_string_lossy().into_owned());

    config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8080)?
      .set_default("store_path", "haul.db")?
      .set_default("admin_username", "admin")?
      .add_source(config::File::from(file.into()).required(false))
      .add_source(config::Environment::with_prefix("HAUL"))
      .set_override_option("store_path", database_path)?
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// The database file named by a `DATABASE_URL`.
///
/// Accepts `sqlite://path`, `sqlite:path` or a bare path; a trailing
/// `?query` is dropped. Any other scheme is an error.
pub fn sqlite_path(database_url: &str) -> Result<PathBuf, config::ConfigError> {
  let rest = if let Some(rest) = database_url.strip_prefix("sqlite://") {
    rest
  } else if let Some(rest) = database_url.strip_prefix("sqlite:") {
    rest
  } else if let Some((scheme, _)) = database_url.split_once("://") {
    return Err(config::ConfigError::Message(format!(
      "DATABASE_URL uses unsupported scheme `{scheme}`; expected sqlite:"
    )));
  } else {
    database_url
  };

  let path = rest.split_once('?').map_or(rest, |(path, _)| path);
  if path.is_empty() {
    return Err(config::ConfigError::Message(
      "DATABASE_URL does not name a database file".into(),
    ));
  }
  Ok(PathBuf::from(path))
}

// ─── Application ──────────────────────────────────────────────────────────────

/// Build handler state from an opened store and the server configuration.
pub fn app_state<S>(store: S, config: &ServerConfig) -> AppState<S>
where
  S: PickupStore,
{
  AppState {
    store:  Arc::new(store),
    admin:  Arc::new(BasicAuth {
      username:      config.admin_username.clone(),
      password_hash: config.admin_password_hash.clone(),
    }),
    client: Arc::new(ClientConfig {
      maps_api_key: config.maps_api_key.clone(),
    }),
  }
}

/// Build the full axum [`Router`] for the server.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: PickupStore + Clone + Send + Sync + 'static,
{
  Router::new()
    .route("/health", get(|| async { "ok" }))
    .nest("/api", haul_api::api_router(state))
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────
