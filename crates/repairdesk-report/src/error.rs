//! Error types for the repairdesk-report crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unsupported language: {0:?}")]
  UnknownLanguage(String),

  #[error("unsupported export format: {0:?}")]
  UnknownFormat(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
