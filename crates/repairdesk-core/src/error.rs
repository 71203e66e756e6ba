//! Error types for `repairdesk-core`.
//!
//! The store and the engine never fail; these errors come from parsing
//! caller input and from the validation step that sits in front of
//! [`Store::add`](crate::Store::add).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown {kind}: {value:?}")]
  UnknownValue { kind: &'static str, value: String },

  #[error("invalid identity: {0}")]
  InvalidId(#[from] uuid::Error),

  #[error(transparent)]
  Validation(#[from] ValidationError),
}

/// Why a raw form could not become a draft.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  /// One or more required fields were absent or blank, listed in
  /// declaration order.
  #[error("missing required field(s): {}", .0.join(", "))]
  MissingFields(Vec<&'static str>),

  #[error("invalid email address: {0:?}")]
  InvalidEmail(String),
}

impl ValidationError {
  /// The offending field names, for rendering next to form inputs.
  pub fn fields(&self) -> Vec<&'static str> {
    match self {
      Self::MissingFields(fields) => fields.clone(),
      Self::InvalidEmail(_) => vec!["email"],
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Blank means empty after trimming whitespace.
pub(crate) fn is_blank(value: &str) -> bool { value.trim().is_empty() }
