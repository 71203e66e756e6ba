//! Handlers for `/persons` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/persons` | Insertion order |
//! | `POST`   | `/persons` | Body: [`PersonForm`]; 201 + stored person |
//! | `GET`    | `/persons/{id}` | 404 if not found |
//! | `PATCH`  | `/persons/{id}` | Body: [`PersonPatch`] |
//! | `DELETE` | `/persons/{id}` | Requests keep their (now dangling) reference |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use repairdesk_core::person::{Person, PersonForm, PersonPatch};
use serde::Serialize;
use uuid::Uuid;

use crate::{SharedStore, error::ApiError, params::parse_id};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /persons`
pub async fn list(State(store): State<SharedStore>) -> Json<Vec<Person>> {
  Json(store.read().await.persons().to_vec())
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /persons`
pub async fn create(
  State(store): State<SharedStore>,
  Json(form): Json<PersonForm>,
) -> Result<impl IntoResponse, ApiError> {
  let draft = form.validate()?;
  let person = store.write().await.add(draft);
  tracing::info!(id = %person.id, name = %person.name, "person created");
  Ok((StatusCode::CREATED, Json(person)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /persons/{id}`
pub async fn get_one(
  State(store): State<SharedStore>,
  Path(id): Path<String>,
) -> Result<Json<Person>, ApiError> {
  let uuid = parse_id("person", &id)?;
  let person = store
    .read()
    .await
    .get::<Person>(uuid)
    .cloned()
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;
  Ok(Json(person))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /persons/{id}`
pub async fn update_one(
  State(store): State<SharedStore>,
  Path(id): Path<String>,
  Json(patch): Json<PersonPatch>,
) -> Result<Json<Person>, ApiError> {
  let uuid = parse_id("person", &id)?;
  let mut store = store.write().await;
  if store.get::<Person>(uuid).is_none() {
    return Err(ApiError::NotFound(format!("person {id} not found")));
  }

  let patch = patch.validate()?;
  let person = store
    .update(uuid, patch)
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;
  tracing::info!(id = %person.id, "person updated");
  Ok(Json(person))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct Deleted {
  pub deleted:           Uuid,
  /// Requests still pointing at the removed person.
  pub dangling_requests: usize,
}

/// `DELETE /persons/{id}`
pub async fn delete_one(
  State(store): State<SharedStore>,
  Path(id): Path<String>,
) -> Result<Json<Deleted>, ApiError> {
  let uuid = parse_id("person", &id)?;
  let mut store = store.write().await;
  store
    .delete::<Person>(uuid)
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;

  let dangling_requests = store.requests_assigned_to(uuid).count();
  if dangling_requests > 0 {
    tracing::warn!(%uuid, dangling_requests, "deleted person still has assigned requests");
  } else {
    tracing::info!(%uuid, "person deleted");
  }
  Ok(Json(Deleted { deleted: uuid, dangling_requests }))
}
