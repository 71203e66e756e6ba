//! Handlers for `/requests` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/requests` | Filtered by [`FilterParams`]; insertion order |
//! | `POST`   | `/requests` | Body: [`RequestForm`]; 201 + stored request |
//! | `GET`    | `/requests/recent` | `?n=` (default 5); newest first |
//! | `GET`    | `/requests/{id}` | 404 if not found |
//! | `PATCH`  | `/requests/{id}` | Body: [`RequestPatch`]; refreshes `updated_at` |
//! | `DELETE` | `/requests/{id}` | 204, or 404 if not found |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use repairdesk_core::{
  Store,
  filter::{filter_requests, recent_n},
  person::Person,
  request::{Request, RequestForm, RequestPatch, suggest_request_number},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  SharedStore,
  error::ApiError,
  params::{FilterParams, parse_id},
};

/// Requests may only be assigned to a person the store currently knows.
pub(crate) fn ensure_person(store: &Store, id: Uuid) -> Result<(), ApiError> {
  if store.get::<Person>(id).is_some() {
    Ok(())
  } else {
    Err(ApiError::UnknownPerson(id))
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /requests[?q=...][&status=...][&from=...&to=...][&responsible_person_id=...]`
pub async fn list(
  State(store): State<SharedStore>,
  Query(params): Query<FilterParams>,
) -> Result<Json<Vec<Request>>, ApiError> {
  let criteria = params.criteria()?;
  let store = store.read().await;
  let requests = filter_requests(store.requests(), &criteria)
    .into_iter()
    .cloned()
    .collect();
  Ok(Json(requests))
}

// ─── Recent ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RecentParams {
  #[serde(default = "default_recent")]
  pub n: usize,
}

fn default_recent() -> usize { 5 }

/// `GET /requests/recent[?n=5]`
pub async fn recent(
  State(store): State<SharedStore>,
  Query(params): Query<RecentParams>,
) -> Json<Vec<Request>> {
  let store = store.read().await;
  Json(recent_n(store.requests(), params.n).into_iter().cloned().collect())
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /requests`. A blank `request_number` is filled with a suggestion.
pub async fn create(
  State(store): State<SharedStore>,
  Json(mut form): Json<RequestForm>,
) -> Result<impl IntoResponse, ApiError> {
  if form.request_number.trim().is_empty() {
    form.request_number = suggest_request_number(Utc::now());
  }
  let draft = form.validate()?;

  let mut store = store.write().await;
  ensure_person(&store, draft.responsible_person_id)?;
  let request = store.add(draft);
  tracing::info!(id = %request.id, number = %request.request_number, "request created");
  Ok((StatusCode::CREATED, Json(request)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /requests/{id}`
pub async fn get_one(
  State(store): State<SharedStore>,
  Path(id): Path<String>,
) -> Result<Json<Request>, ApiError> {
  let uuid = parse_id("request", &id)?;
  let store = store.read().await;
  let request = store
    .get::<Request>(uuid)
    .cloned()
    .ok_or_else(|| ApiError::NotFound(format!("request {id} not found")))?;
  Ok(Json(request))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /requests/{id}`: merges the given fields; returns the result.
pub async fn update_one(
  State(store): State<SharedStore>,
  Path(id): Path<String>,
  Json(patch): Json<RequestPatch>,
) -> Result<Json<Request>, ApiError> {
  let uuid = parse_id("request", &id)?;
  let mut store = store.write().await;
  if store.get::<Request>(uuid).is_none() {
    return Err(ApiError::NotFound(format!("request {id} not found")));
  }

  let patch = patch.validate()?;
  if let Some(person_id) = patch.responsible_person_id {
    ensure_person(&store, person_id)?;
  }
  let request = store
    .update(uuid, patch)
    .ok_or_else(|| ApiError::NotFound(format!("request {id} not found")))?;
  tracing::info!(id = %request.id, status = %request.status, "request updated");
  Ok(Json(request))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /requests/{id}`
pub async fn delete_one(
  State(store): State<SharedStore>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  let uuid = parse_id("request", &id)?;
  store
    .write()
    .await
    .delete::<Request>(uuid)
    .ok_or_else(|| ApiError::NotFound(format!("request {id} not found")))?;
  tracing::info!(%uuid, "request deleted");
  Ok(StatusCode::NO_CONTENT)
}
