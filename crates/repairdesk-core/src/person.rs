//! Responsible persons: the staff members requests are assigned to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  ValidationError,
  error::is_blank,
  store::{Draft, Entity, Patch},
};

/// A responsible-person record. Requests reference it by `id`.
///
/// Unlike [`Request`](crate::request::Request), a person carries no
/// `updated_at`; updates leave `created_at` as the only timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub id:         Uuid,
  pub name:       String,
  pub email:      String,
  pub phone:      String,
  pub department: String,
  pub created_at: DateTime<Utc>,
}

impl Entity for Person {
  type Draft = PersonDraft;
  type Patch = PersonPatch;

  const KIND: &'static str = "person";

  fn id(&self) -> Uuid { self.id }

  fn create(id: Uuid, now: DateTime<Utc>, draft: PersonDraft) -> Self {
    Self {
      id,
      name: draft.name,
      email: draft.email,
      phone: draft.phone,
      department: draft.department,
      created_at: now,
    }
  }

  fn merge(&mut self, patch: PersonPatch, _now: DateTime<Utc>) {
    let PersonPatch { name, email, phone, department } = patch;
    if let Some(v) = name {
      self.name = v;
    }
    if let Some(v) = email {
      self.email = v;
    }
    if let Some(v) = phone {
      self.phone = v;
    }
    if let Some(v) = department {
      self.department = v;
    }
  }
}

/// Loose shape check: one `@` with something on both sides.
fn plausible_email(address: &str) -> bool {
  match address.trim().split_once('@') {
    Some((local, domain)) => {
      !local.is_empty() && !domain.is_empty() && !domain.contains('@')
    }
    None => false,
  }
}

// ─── PersonForm ──────────────────────────────────────────────────────────────

/// Raw input for a new person; every field is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonForm {
  pub name:       String,
  pub email:      String,
  pub phone:      String,
  pub department: String,
}

impl PersonForm {
  pub fn validate(self) -> Result<PersonDraft, ValidationError> {
    let missing: Vec<&'static str> = [
      ("name", &self.name),
      ("email", &self.email),
      ("phone", &self.phone),
      ("department", &self.department),
    ]
    .into_iter()
    .filter(|(_, v)| is_blank(v))
    .map(|(name, _)| name)
    .collect();

    if !missing.is_empty() {
      return Err(ValidationError::MissingFields(missing));
    }
    if !plausible_email(&self.email) {
      return Err(ValidationError::InvalidEmail(self.email));
    }

    Ok(PersonDraft {
      name:       self.name,
      email:      self.email,
      phone:      self.phone,
      department: self.department,
    })
  }
}

/// A validated person, ready for [`Store::add`](crate::Store::add).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct PersonDraft {
  pub name:       String,
  pub email:      String,
  pub phone:      String,
  pub department: String,
}

impl Draft for PersonDraft {
  type Entity = Person;
}

// ─── PersonPatch ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonPatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name:       Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub email:      Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub phone:      Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub department: Option<String>,
}

impl PersonPatch {
  /// Same rules as [`PersonForm::validate`], applied to present fields only.
  pub fn validate(self) -> Result<Self, ValidationError> {
    let blanked: Vec<&'static str> = [
      ("name", &self.name),
      ("email", &self.email),
      ("phone", &self.phone),
      ("department", &self.department),
    ]
    .into_iter()
    .filter(|(_, v)| v.as_deref().is_some_and(is_blank))
    .map(|(name, _)| name)
    .collect();

    if !blanked.is_empty() {
      return Err(ValidationError::MissingFields(blanked));
    }
    if let Some(email) = &self.email
      && !plausible_email(email)
    {
      return Err(ValidationError::InvalidEmail(email.clone()));
    }
    Ok(self)
  }
}

impl Patch for PersonPatch {
  type Entity = Person;
}

#[cfg(test)]
mod tests {
  use super::*;

  fn form() -> PersonForm {
    PersonForm {
      name:       "John Smith".into(),
      email:      "john@company.com".into(),
      phone:      "+66-2-123-4567".into(),
      department: "IT Support".into(),
    }
  }

  #[test]
  fn complete_form_validates() {
    let draft = form().validate().unwrap();
    assert_eq!(draft.name, "John Smith");
  }

  #[test]
  fn blank_fields_are_listed() {
    let mut f = form();
    f.phone = String::new();
    f.department = " ".into();
    assert_eq!(
      f.validate().unwrap_err(),
      ValidationError::MissingFields(vec!["phone", "department"])
    );
  }

  #[test]
  fn malformed_email_is_rejected() {
    for bad in ["john", "@company.com", "john@", "a@b@c"] {
      let mut f = form();
      f.email = bad.into();
      assert_eq!(
        f.validate().unwrap_err(),
        ValidationError::InvalidEmail(bad.into()),
        "{bad}"
      );
    }
  }

  #[test]
  fn patch_checks_only_present_fields() {
    assert!(PersonPatch::default().validate().is_ok());

    let patch = PersonPatch { email: Some("nope".into()), ..PersonPatch::default() };
    assert_eq!(patch.validate().unwrap_err().fields(), vec!["email"]);
  }
}
