//! Async HTTP client wrapping the repairdesk JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use repairdesk_core::{
  person::{Person, PersonForm, PersonPatch},
  request::{Request, RequestForm, RequestPatch, Status},
};
use repairdesk_report::{ExportFormat, Language};
use reqwest::{Client, Response};
use serde::Deserialize;
use uuid::Uuid;

/// Connection settings for the repairdesk API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
  pub base_url: String,
}

/// `GET /reports/summary` body.
#[derive(Debug, Deserialize)]
pub struct Summary {
  pub total:     usize,
  pub by_status: Vec<StatusShare>,
}

#[derive(Debug, Deserialize)]
pub struct StatusShare {
  pub status:     Status,
  pub count:      usize,
  pub percentage: f64,
}

/// `DELETE /persons/{id}` body.
#[derive(Debug, Deserialize)]
pub struct Deleted {
  pub dangling_requests: usize,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
  #[serde(default)]
  error:  String,
  #[serde(default)]
  fields: Vec<String>,
}

/// Async HTTP client for the repairdesk JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  /// Pass successful responses through; turn the rest into an error carrying
  /// the server's message.
  async fn check(resp: Response, what: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let body: ErrorBody = resp.json().await.unwrap_or_default();
    if body.fields.is_empty() {
      Err(anyhow!("{what} → {status}: {}", body.error))
    } else {
      Err(anyhow!(
        "{what} → {status}: {} [{}]",
        body.error,
        body.fields.join(", ")
      ))
    }
  }

  async fn get_json<T>(&self, path: &str, query: &[(&'static str, String)]) -> Result<T>
  where
    T: serde::de::DeserializeOwned,
  {
    tracing::debug!(path, ?query, "GET");
    let resp = self
      .client
      .get(self.url(path))
      .query(query)
      .send()
      .await
      .with_context(|| format!("GET {path} failed"))?;
    Self::check(resp, &format!("GET {path}"))
      .await?
      .json()
      .await
      .with_context(|| format!("deserialising GET {path}"))
  }

  // ── Requests ──────────────────────────────────────────────────────────────

  /// `GET /api/requests[?<filters>]`
  pub async fn list_requests(&self, filter: &[(&'static str, String)]) -> Result<Vec<Request>> {
    self.get_json("/requests", filter).await
  }

  /// `GET /api/requests/recent?n=<n>`
  pub async fn recent_requests(&self, n: usize) -> Result<Vec<Request>> {
    self.get_json("/requests/recent", &[("n", n.to_string())]).await
  }

  /// `GET /api/requests/{id}`
  pub async fn get_request(&self, id: Uuid) -> Result<Request> {
    self.get_json(&format!("/requests/{id}"), &[]).await
  }

  /// `POST /api/requests`
  pub async fn create_request(&self, form: &RequestForm) -> Result<Request> {
    let resp = self
      .client
      .post(self.url("/requests"))
      .json(form)
      .send()
      .await
      .context("POST /requests failed")?;
    Self::check(resp, "POST /requests")
      .await?
      .json()
      .await
      .context("deserialising created request")
  }

  /// `PATCH /api/requests/{id}`
  pub async fn update_request(&self, id: Uuid, patch: &RequestPatch) -> Result<Request> {
    let resp = self
      .client
      .patch(self.url(&format!("/requests/{id}")))
      .json(patch)
      .send()
      .await
      .context("PATCH /requests failed")?;
    Self::check(resp, "PATCH /requests")
      .await?
      .json()
      .await
      .context("deserialising updated request")
  }

  /// `DELETE /api/requests/{id}`
  pub async fn delete_request(&self, id: Uuid) -> Result<()> {
    let resp = self
      .client
      .delete(self.url(&format!("/requests/{id}")))
      .send()
      .await
      .context("DELETE /requests failed")?;
    Self::check(resp, "DELETE /requests").await?;
    Ok(())
  }

  // ── Persons ───────────────────────────────────────────────────────────────

  /// `GET /api/persons`
  pub async fn list_persons(&self) -> Result<Vec<Person>> {
    self.get_json("/persons", &[]).await
  }

  /// `POST /api/persons`
  pub async fn create_person(&self, form: &PersonForm) -> Result<Person> {
    let resp = self
      .client
      .post(self.url("/persons"))
      .json(form)
      .send()
      .await
      .context("POST /persons failed")?;
    Self::check(resp, "POST /persons")
      .await?
      .json()
      .await
      .context("deserialising created person")
  }

  /// `PATCH /api/persons/{id}`
  pub async fn update_person(&self, id: Uuid, patch: &PersonPatch) -> Result<Person> {
    let resp = self
      .client
      .patch(self.url(&format!("/persons/{id}")))
      .json(patch)
      .send()
      .await
      .context("PATCH /persons failed")?;
    Self::check(resp, "PATCH /persons")
      .await?
      .json()
      .await
      .context("deserialising updated person")
  }

  /// `DELETE /api/persons/{id}`
  pub async fn delete_person(&self, id: Uuid) -> Result<Deleted> {
    let resp = self
      .client
      .delete(self.url(&format!("/persons/{id}")))
      .send()
      .await
      .context("DELETE /persons failed")?;
    Self::check(resp, "DELETE /persons")
      .await?
      .json()
      .await
      .context("deserialising delete result")
  }

  // ── Reports ───────────────────────────────────────────────────────────────

  /// `GET /api/reports/summary[?<filters>]`
  pub async fn summary(&self, filter: &[(&'static str, String)]) -> Result<Summary> {
    self.get_json("/reports/summary", filter).await
  }

  /// `GET /api/reports/export?format=..&lang=..[&<filters>]`, returning the
  /// rendered file body.
  pub async fn export(
    &self,
    filter: &[(&'static str, String)],
    format: ExportFormat,
    lang: Language,
  ) -> Result<Vec<u8>> {
    let resp = self
      .client
      .get(self.url("/reports/export"))
      .query(filter)
      .query(&[("format", format.to_string()), ("lang", lang.to_string())])
      .send()
      .await
      .context("GET /reports/export failed")?;
    let bytes = Self::check(resp, "GET /reports/export")
      .await?
      .bytes()
      .await
      .context("reading export body")?;
    Ok(bytes.to_vec())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn url_joins_base_and_api_prefix() {
    let client = ApiClient::new(ApiConfig { base_url: "http://localhost:8080/".into() }).unwrap();
    assert_eq!(client.url("/requests"), "http://localhost:8080/api/requests");
  }
}
