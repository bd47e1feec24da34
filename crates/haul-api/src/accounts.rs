//! Handlers for `/accounts` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/accounts` | Admin; newest first |
//! | `POST` | `/accounts` | Body: [`NewAccount`]; upsert keyed by lower-cased email; 201 |
//! | `GET`  | `/accounts/:email` | Case-insensitive; 404 if not found |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use haul_core::{
  account::{Account, NewAccount},
  store::PickupStore,
};

use crate::{AppState, auth::Admin, error::ApiError};

/// `GET /accounts`
pub async fn list<S>(
  _admin: Admin,
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Account>>, ApiError>
where
  S: PickupStore + Clone + Send + Sync + 'static,
{
  let accounts = state
    .store
    .list_accounts()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(accounts))
}

/// `POST /accounts` — creates or fully overwrites; `createdAt` is kept.
pub async fn upsert<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<NewAccount>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PickupStore + Clone + Send + Sync + 'static,
{
  if body.email.trim().is_empty() {
    return Err(ApiError::BadRequest("email is required".into()));
  }
  let account = state
    .store
    .upsert_account(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  tracing::info!(email = %account.email, "account saved");
  Ok((StatusCode::CREATED, Json(account)))
}

/// `GET /accounts/:email`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(email): Path<String>,
) -> Result<Json<Account>, ApiError>
where
  S: PickupStore + Clone + Send + Sync + 'static,
{
  let account = state
    .store
    .get_account(&email)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("account {email} not found")))?;
  Ok(Json(account))
}
