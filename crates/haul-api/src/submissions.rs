//! Handlers for `/submissions` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/submissions` | `?email=` (public) or admin; optional `status` |
//! | `POST`   | `/submissions` | Body: [`CreateBody`]; returns 201 + stored submission |
//! | `DELETE` | `/submissions` | Admin; removes every submission |
//! | `GET`    | `/submissions/stats` | Admin; counts per status |
//! | `GET`    | `/submissions/:id` | 404 if not found |
//! | `PATCH`  | `/submissions/:id` | Admin; body: [`SubmissionPatch`] |
//! | `DELETE` | `/submissions/:id` | Admin; 404 if not found |
//! | `POST`   | `/submissions/:id/schedule` | Admin; body: [`ScheduleRequest`] |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
};
use haul_core::{
  account::NewAccount,
  lifecycle::{StageCount, StatusCounts, SubmissionStatus},
  resolver::approximate_coordinates,
  store::{PickupStore, SubmissionQuery},
  submission::{NewSubmission, ScheduleRequest, Submission, SubmissionPatch},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{AppState, auth::Admin, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Exact, case-insensitive email match. A blank value counts as absent.
  pub email:  Option<String>,
  pub status: Option<SubmissionStatus>,
}

/// `GET /submissions[?email=...][&status=...]`
///
/// Customers track their own requests by email without credentials; listing
/// everything requires admin.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Submission>>, ApiError>
where
  S: PickupStore + Clone + Send + Sync + 'static,
{
  let email = params.email.filter(|e| !e.trim().is_empty());
  if email.is_none() {
    state.admin.verify(&headers)?;
  }

  let query = SubmissionQuery { email, status: params.status };
  let submissions = state
    .store
    .list_submissions(&query)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(submissions))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /submissions`.
///
/// Any `id`, `status` or timestamp in the body is ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
  pub customer_name:         String,
  pub email:                 String,
  pub phone:                 String,
  #[serde(alias = "zelleInfo")]
  pub payment_handle:        String,
  pub pickup_address:        String,
  #[serde(default)]
  pub clothing_description:  String,
  #[serde(default)]
  pub clothing_items:        Vec<String>,
  #[serde(default)]
  pub estimated_items:       i64,
  #[serde(default)]
  pub customer_availability: Vec<String>,
  /// Also save (or overwrite) the customer's account from these details.
  #[serde(default)]
  pub save_account:          bool,
}

impl CreateBody {
  fn account(&self) -> NewAccount {
    NewAccount {
      email:           self.email.clone(),
      customer_name:   self.customer_name.clone(),
      phone:           self.phone.clone(),
      payment_handle:  self.payment_handle.clone(),
      default_address: self.pickup_address.clone(),
    }
  }
}

/// `POST /submissions` — returns 201 + the stored [`Submission`].
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PickupStore + Clone + Send + Sync + 'static,
{
  let account = body.save_account.then(|| body.account());
  let coords = approximate_coordinates(&body.pickup_address);
  let input = NewSubmission {
    customer_name:         body.customer_name,
    email:                 body.email,
    phone:                 body.phone,
    payment_handle:        body.payment_handle,
    pickup_address:        body.pickup_address,
    pickup_lat:            Some(coords.lat),
    pickup_lng:            Some(coords.lng),
    clothing_description:  body.clothing_description,
    clothing_items:        body.clothing_items,
    estimated_items:       body.estimated_items,
    customer_availability: body.customer_availability,
  };

  let submission = state
    .store
    .create_submission(input)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  tracing::info!(id = %submission.id, "submission created");

  // Only saved once the submission itself is stored.
  if let Some(account) = account {
    state
      .store
      .upsert_account(account)
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?;
  }

  Ok((StatusCode::CREATED, Json(submission)))
}

// ─── Bulk delete ──────────────────────────────────────────────────────────────

/// `DELETE /submissions` — irreversible.
pub async fn delete_all<S>(
  _admin: Admin,
  State(state): State<AppState<S>>,
) -> Result<Json<Value>, ApiError>
where
  S: PickupStore + Clone + Send + Sync + 'static,
{
  let deleted = state
    .store
    .delete_all_submissions()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  tracing::warn!(deleted, "all submissions deleted");
  Ok(Json(json!({ "deleted": deleted })))
}

// ─── Stats ────────────────────────────────────────────────────────────────────

/// Body of `GET /submissions/stats`: flat counts plus a labelled breakdown.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
  #[serde(flatten)]
  pub counts: StatusCounts,
  pub stages: Vec<StageCount>,
}

/// `GET /submissions/stats`
pub async fn stats<S>(
  _admin: Admin,
  State(state): State<AppState<S>>,
) -> Result<Json<StatsResponse>, ApiError>
where
  S: PickupStore + Clone + Send + Sync + 'static,
{
  let counts = state
    .store
    .status_counts()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let stages = counts.stages();
  Ok(Json(StatsResponse { counts, stages }))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /submissions/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Submission>, ApiError>
where
  S: PickupStore + Clone + Send + Sync + 'static,
{
  let submission = state
    .store
    .get_submission(&id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("submission {id} not found")))?;
  Ok(Json(submission))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /submissions/:id` — `id` and `createdAt` in the body are ignored.
pub async fn update<S>(
  _admin: Admin,
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
  Json(patch): Json<SubmissionPatch>,
) -> Result<Json<Submission>, ApiError>
where
  S: PickupStore + Clone + Send + Sync + 'static,
{
  apply_patch(&state, &id, patch).await.map(Json)
}

/// `POST /submissions/:id/schedule` — body: `{"date":..,"time":..,"notes":..}`.
pub async fn schedule<S>(
  _admin: Admin,
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
  Json(body): Json<ScheduleRequest>,
) -> Result<Json<Submission>, ApiError>
where
  S: PickupStore + Clone + Send + Sync + 'static,
{
  apply_patch(&state, &id, SubmissionPatch::from(body)).await.map(Json)
}

async fn apply_patch<S>(
  state: &AppState<S>,
  id: &str,
  patch: SubmissionPatch,
) -> Result<Submission, ApiError>
where
  S: PickupStore + Clone + Send + Sync + 'static,
{
  let submission = state
    .store
    .update_submission(id, patch)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("submission {id} not found")))?;
  tracing::info!(id, status = %submission.status, "submission updated");
  Ok(submission)
}

// ─── Delete one ───────────────────────────────────────────────────────────────

/// `DELETE /submissions/:id`
pub async fn delete_one<S>(
  _admin: Admin,
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Value>, ApiError>
where
  S: PickupStore + Clone + Send + Sync + 'static,
{
  let existed = state
    .store
    .delete_submission(&id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if !existed {
    return Err(ApiError::NotFound(format!("submission {id} not found")));
  }
  tracing::info!(id, "submission deleted");
  Ok(Json(json!({ "deleted": id })))
}
