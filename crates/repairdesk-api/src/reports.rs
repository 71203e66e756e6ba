//! Handlers for `/reports` endpoints.
//!
//! Both accept the same filter parameters as `GET /requests` and operate on
//! the filtered subset.

use axum::{
  Json,
  extract::{Query, State},
  http::header,
  response::IntoResponse,
};
use chrono::Utc;
use repairdesk_core::{
  filter::{aggregate_status_counts, filter_requests},
  request::Status,
};
use repairdesk_report::{ExportFormat, Language};
use serde::{Deserialize, Serialize};

use crate::{SharedStore, error::ApiError, params::FilterParams};

// ─── Summary ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct StatusShare {
  pub status:     Status,
  pub count:      usize,
  pub percentage: f64,
}

#[derive(Debug, Serialize)]
pub struct Summary {
  pub total:     usize,
  /// One entry per status, in [`Status::ALL`] order.
  pub by_status: Vec<StatusShare>,
}

/// `GET /reports/summary`
pub async fn summary(
  State(store): State<SharedStore>,
  Query(params): Query<FilterParams>,
) -> Result<Json<Summary>, ApiError> {
  let criteria = params.criteria()?;
  let store = store.read().await;
  let counts = aggregate_status_counts(filter_requests(store.requests(), &criteria));

  let by_status = Status::ALL
    .into_iter()
    .map(|status| StatusShare {
      status,
      count: counts.count(status),
      percentage: counts.percentage(status),
    })
    .collect();
  Ok(Json(Summary { total: counts.total, by_status }))
}

// ─── Export ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ExportParams {
  pub format: Option<String>,
  pub lang:   Option<String>,
}

impl ExportParams {
  fn resolve(&self) -> Result<(ExportFormat, Language), ApiError> {
    let format = match self.format.as_deref() {
      Some(f) => f.parse().map_err(ApiError::bad_request)?,
      None => ExportFormat::default(),
    };
    let lang = match self.lang.as_deref() {
      Some(l) => l.parse().map_err(ApiError::bad_request)?,
      None => Language::default(),
    };
    Ok((format, lang))
  }
}

/// `GET /reports/export[?format=csv|markdown][&lang=en|th][&<filters>]`
pub async fn export(
  State(store): State<SharedStore>,
  Query(filter): Query<FilterParams>,
  Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, ApiError> {
  let criteria = filter.criteria()?;
  let (format, lang) = params.resolve()?;

  let store = store.read().await;
  let selected = filter_requests(store.requests(), &criteria);
  let rows = selected.len();
  let body = repairdesk_report::render(format, selected, store.persons(), lang);

  let file_name = format.file_name(Utc::now().date_naive());
  tracing::info!(%format, %lang, rows, %file_name, "report exported");

  Ok((
    [
      (header::CONTENT_TYPE, format.media_type().to_owned()),
      (
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{file_name}\""),
      ),
    ],
    body,
  ))
}
