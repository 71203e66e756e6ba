//! Repair requests, one ticket per device brought in for repair.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};
use uuid::Uuid;

use crate::{
  Error, Result, ValidationError,
  error::is_blank,
  store::{Draft, Entity, Patch},
};

// ─── Enums ───────────────────────────────────────────────────────────────────

/// Where a request is in its lifecycle.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  EnumIter,
  IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Status {
  #[default]
  InProgress,
  Completed,
  Cancelled,
  UnableToProceed,
}

/// Warranty or maintenance-agreement coverage of the device.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  EnumIter,
  IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Warranty {
  #[default]
  UnderWarranty,
  OutOfWarranty,
  UnderMaContract,
  OutOfMaContract,
}

impl Status {
  /// Every status, in display order.
  pub const ALL: [Status; 4] = [
    Status::InProgress,
    Status::Completed,
    Status::Cancelled,
    Status::UnableToProceed,
  ];

  /// Wire name, e.g. `"unable_to_proceed"`.
  pub fn as_str(self) -> &'static str { self.into() }
}

impl Warranty {
  /// Wire name, e.g. `"under_ma_contract"`.
  pub fn as_str(self) -> &'static str { self.into() }
}

impl fmt::Display for Status {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl fmt::Display for Warranty {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Status {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    Self::iter()
      .find(|v| v.as_str() == s)
      .ok_or_else(|| Error::UnknownValue { kind: "status", value: s.to_owned() })
  }
}

impl FromStr for Warranty {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    Self::iter()
      .find(|v| v.as_str() == s)
      .ok_or_else(|| Error::UnknownValue { kind: "warranty", value: s.to_owned() })
  }
}

// ─── Request ─────────────────────────────────────────────────────────────────

/// A repair ticket.
///
/// `id`, `created_at` and `updated_at` are assigned by the
/// [`Store`](crate::Store); `updated_at >= created_at` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
  pub id:                    Uuid,
  /// Caller-supplied, free text. Expected but not enforced to be unique.
  pub request_number:        String,
  pub request_date:          NaiveDate,
  pub requester:             String,
  pub phone_number:          String,
  pub company_name:          String,
  pub device_model:          String,
  pub device_number:         String,
  pub damage:                String,
  /// Empty when no note was given.
  pub note:                  String,
  pub warranty:              Warranty,
  /// May dangle if the person was deleted after assignment.
  pub responsible_person_id: Uuid,
  pub status:                Status,
  pub created_at:            DateTime<Utc>,
  pub updated_at:            DateTime<Utc>,
}

impl Request {
  /// Case-insensitive substring match against request number, requester
  /// and company name.
  pub fn matches_text(&self, needle_lower: &str) -> bool {
    [&self.request_number, &self.requester, &self.company_name]
      .into_iter()
      .any(|field| field.to_lowercase().contains(needle_lower))
  }
}

impl Entity for Request {
  type Draft = RequestDraft;
  type Patch = RequestPatch;

  const KIND: &'static str = "request";

  fn id(&self) -> Uuid { self.id }

  fn create(id: Uuid, now: DateTime<Utc>, draft: RequestDraft) -> Self {
    Self {
      id,
      request_number: draft.request_number,
      request_date: draft.request_date,
      requester: draft.requester,
      phone_number: draft.phone_number,
      company_name: draft.company_name,
      device_model: draft.device_model,
      device_number: draft.device_number,
      damage: draft.damage,
      note: draft.note,
      warranty: draft.warranty,
      responsible_person_id: draft.responsible_person_id,
      status: draft.status,
      created_at: now,
      updated_at: now,
    }
  }

  fn merge(&mut self, patch: RequestPatch, now: DateTime<Utc>) {
    let RequestPatch {
      request_number,
      request_date,
      requester,
      phone_number,
      company_name,
      device_model,
      device_number,
      damage,
      note,
      warranty,
      responsible_person_id,
      status,
    } = patch;

    if let Some(v) = request_number {
      self.request_number = v;
    }
    if let Some(v) = request_date {
      self.request_date = v;
    }
    if let Some(v) = requester {
      self.requester = v;
    }
    if let Some(v) = phone_number {
      self.phone_number = v;
    }
    if let Some(v) = company_name {
      self.company_name = v;
    }
    if let Some(v) = device_model {
      self.device_model = v;
    }
    if let Some(v) = device_number {
      self.device_number = v;
    }
    if let Some(v) = damage {
      self.damage = v;
    }
    if let Some(v) = note {
      self.note = v;
    }
    if let Some(v) = warranty {
      self.warranty = v;
    }
    if let Some(v) = responsible_person_id {
      self.responsible_person_id = v;
    }
    if let Some(v) = status {
      self.status = v;
    }

    // A clock stepping backwards must not break `updated_at >= created_at`.
    self.updated_at = now.max(self.created_at);
  }
}

// ─── RequestForm ─────────────────────────────────────────────────────────────

/// Raw intake input, exactly as a form or API client supplies it.
///
/// Turn it into a [`RequestDraft`] with [`RequestForm::validate`] before
/// handing it to the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestForm {
  pub request_number:        String,
  pub request_date:          Option<NaiveDate>,
  pub requester:             String,
  pub phone_number:          String,
  pub company_name:          String,
  pub device_model:          String,
  pub device_number:         String,
  pub damage:                String,
  pub note:                  String,
  /// Defaults to [`Warranty::UnderWarranty`].
  pub warranty:              Option<Warranty>,
  pub responsible_person_id: Option<Uuid>,
  /// Defaults to [`Status::InProgress`].
  pub status:                Option<Status>,
}

impl RequestForm {
  /// Check required fields and produce a draft the store accepts.
  ///
  /// Every field except `note`, `warranty` and `status` is required; all
  /// missing fields are reported at once.
  pub fn validate(self) -> Result<RequestDraft, ValidationError> {
    let mut missing = Vec::new();
    let mut require = |name: &'static str, present: bool| {
      if !present {
        missing.push(name);
      }
    };
    require("request_number", !is_blank(&self.request_number));
    require("request_date", self.request_date.is_some());
    require("requester", !is_blank(&self.requester));
    require("phone_number", !is_blank(&self.phone_number));
    require("company_name", !is_blank(&self.company_name));
    require("device_model", !is_blank(&self.device_model));
    require("device_number", !is_blank(&self.device_number));
    require("damage", !is_blank(&self.damage));
    require("responsible_person_id", self.responsible_person_id.is_some());

    match (self.request_date, self.responsible_person_id) {
      (Some(request_date), Some(responsible_person_id)) if missing.is_empty() => {
        Ok(RequestDraft {
          request_number: self.request_number,
          request_date,
          requester: self.requester,
          phone_number: self.phone_number,
          company_name: self.company_name,
          device_model: self.device_model,
          device_number: self.device_number,
          damage: self.damage,
          note: self.note,
          warranty: self.warranty.unwrap_or_default(),
          responsible_person_id,
          status: self.status.unwrap_or_default(),
        })
      }
      _ => Err(ValidationError::MissingFields(missing)),
    }
  }
}

/// The pre-filled request number intake forms offer:
/// `REQ-<year>-<last six digits of epoch milliseconds>`.
pub fn suggest_request_number(now: DateTime<Utc>) -> String {
  format!(
    "REQ-{}-{:06}",
    now.year(),
    now.timestamp_millis().rem_euclid(1_000_000)
  )
}

// ─── RequestDraft ────────────────────────────────────────────────────────────

/// A validated request, ready for [`Store::add`](crate::Store::add).
///
/// Only [`RequestForm::validate`] constructs one outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct RequestDraft {
  pub request_number:        String,
  pub request_date:          NaiveDate,
  pub requester:             String,
  pub phone_number:          String,
  pub company_name:          String,
  pub device_model:          String,
  pub device_number:         String,
  pub damage:                String,
  pub note:                  String,
  pub warranty:              Warranty,
  pub responsible_person_id: Uuid,
  pub status:                Status,
}

impl Draft for RequestDraft {
  type Entity = Request;
}

// ─── RequestPatch ────────────────────────────────────────────────────────────

/// A partial update; `None` fields are left untouched by the merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestPatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub request_number:        Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub request_date:          Option<NaiveDate>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub requester:             Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub phone_number:          Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub company_name:          Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub device_model:          Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub device_number:         Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub damage:                Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub note:                  Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub warranty:              Option<Warranty>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub responsible_person_id: Option<Uuid>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status:                Option<Status>,
}

impl RequestPatch {
  /// A patch that only moves the request to `status`.
  pub fn status(status: Status) -> Self {
    Self { status: Some(status), ..Self::default() }
  }

  /// Reject patches that would blank out a required text field. The store
  /// applies patches unchecked; call this at the edge.
  pub fn validate(self) -> Result<Self, ValidationError> {
    let blanked: Vec<&'static str> = [
      ("request_number", &self.request_number),
      ("requester", &self.requester),
      ("phone_number", &self.phone_number),
      ("company_name", &self.company_name),
      ("device_model", &self.device_model),
      ("device_number", &self.device_number),
      ("damage", &self.damage),
    ]
    .into_iter()
    .filter(|(_, v)| v.as_deref().is_some_and(is_blank))
    .map(|(name, _)| name)
    .collect();

    if blanked.is_empty() {
      Ok(self)
    } else {
      Err(ValidationError::MissingFields(blanked))
    }
  }
}

impl Patch for RequestPatch {
  type Entity = Request;
}

#[cfg(test)]
mod tests {
  use super::*;

  fn complete_form() -> RequestForm {
    RequestForm {
      request_number: "REQ-2024-001".into(),
      request_date: NaiveDate::from_ymd_opt(2024, 1, 15),
      requester: "Alice Brown".into(),
      phone_number: "+66-81-123-4567".into(),
      company_name: "Tech Solutions Ltd.".into(),
      device_model: "MacBook Pro 14\"".into(),
      device_number: "MB001234".into(),
      damage: "Screen cracked".into(),
      note: String::new(),
      warranty: None,
      responsible_person_id: Some(Uuid::new_v4()),
      status: None,
    }
  }

  #[test]
  fn complete_form_validates_with_defaults() {
    let draft = complete_form().validate().unwrap();
    assert_eq!(draft.status, Status::InProgress);
    assert_eq!(draft.warranty, Warranty::UnderWarranty);
    assert_eq!(draft.note, "");
  }

  #[test]
  fn explicit_status_overrides_default() {
    let mut form = complete_form();
    form.status = Some(Status::Completed);
    assert_eq!(form.validate().unwrap().status, Status::Completed);
  }

  #[test]
  fn missing_person_is_rejected() {
    let mut form = complete_form();
    form.responsible_person_id = None;
    assert_eq!(
      form.validate().unwrap_err(),
      ValidationError::MissingFields(vec!["responsible_person_id"])
    );
  }

  #[test]
  fn all_missing_fields_reported_in_order() {
    let err = RequestForm::default().validate().unwrap_err();
    assert_eq!(
      err.fields(),
      vec![
        "request_number",
        "request_date",
        "requester",
        "phone_number",
        "company_name",
        "device_model",
        "device_number",
        "damage",
        "responsible_person_id",
      ]
    );
  }

  #[test]
  fn whitespace_only_counts_as_blank() {
    let mut form = complete_form();
    form.requester = "   ".into();
    assert_eq!(form.validate().unwrap_err().fields(), vec!["requester"]);
  }

  #[test]
  fn patch_blanking_required_field_is_rejected() {
    let patch = RequestPatch {
      damage: Some(String::new()),
      note: Some(String::new()),
      ..RequestPatch::default()
    };
    assert_eq!(patch.validate().unwrap_err().fields(), vec!["damage"]);
  }

  #[test]
  fn status_round_trips_through_str() {
    for status in Status::iter() {
      assert_eq!(status.as_str().parse::<Status>().unwrap(), status);
    }
    assert!("done".parse::<Status>().is_err());
    assert_eq!(Warranty::UnderMaContract.to_string(), "under_ma_contract");
  }

  #[test]
  fn serde_uses_snake_case_names() {
    let json = serde_json::to_string(&Status::UnableToProceed).unwrap();
    assert_eq!(json, "\"unable_to_proceed\"");
    let w: Warranty = serde_json::from_str("\"out_of_ma_contract\"").unwrap();
    assert_eq!(w, Warranty::OutOfMaContract);
  }

  #[test]
  fn suggested_number_uses_year_and_millis() {
    let now = DateTime::from_timestamp_millis(1_705_300_123_456).unwrap();
    assert_eq!(suggest_request_number(now), "REQ-2024-123456");
  }
}
