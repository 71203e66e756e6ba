//! Query parameters shared by the list, summary and export endpoints.

use chrono::NaiveDate;
use repairdesk_core::{
  filter::{Criteria, DateRange, Selection},
  request::Status,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

/// `?q=&status=&from=&to=&responsible_person_id=`
///
/// `status` and `responsible_person_id` accept the `all` sentinel.
/// `from` and `to` must be given together.
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
  pub q:                     Option<String>,
  pub status:                Option<String>,
  pub from:                  Option<NaiveDate>,
  pub to:                    Option<NaiveDate>,
  pub responsible_person_id: Option<String>,
}

impl FilterParams {
  pub fn criteria(&self) -> Result<Criteria, ApiError> {
    let status = match self.status.as_deref() {
      Some(s) => s.parse::<Selection<Status>>().map_err(ApiError::bad_request)?,
      None => Selection::All,
    };

    let responsible_person = match self.responsible_person_id.as_deref() {
      Some(s) => s.parse::<Selection<Uuid>>().map_err(ApiError::bad_request)?,
      None => Selection::All,
    };

    let date_range = match (self.from, self.to) {
      (Some(start), Some(end)) => Some(DateRange::new(start, end)),
      (None, None) => None,
      _ => {
        return Err(ApiError::BadRequest(
          "`from` and `to` must be given together".into(),
        ));
      }
    };

    Ok(Criteria {
      text: self.q.clone().filter(|q| !q.is_empty()),
      status,
      date_range,
      responsible_person,
    })
  }
}

/// Identities arrive as path strings. One that does not parse cannot name a
/// live entity, so it is reported the same way as an absent one.
pub(crate) fn parse_id(kind: &str, raw: &str) -> Result<Uuid, ApiError> {
  Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(format!("{kind} {raw} not found")))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_params_select_everything() {
    assert_eq!(FilterParams::default().criteria().unwrap(), Criteria::default());
  }

  #[test]
  fn all_sentinels_and_blank_query() {
    let params = FilterParams {
      q: Some(String::new()),
      status: Some("all".into()),
      responsible_person_id: Some("all".into()),
      ..FilterParams::default()
    };
    assert_eq!(params.criteria().unwrap(), Criteria::default());
  }

  #[test]
  fn half_open_range_is_rejected() {
    let params = FilterParams {
      from: NaiveDate::from_ymd_opt(2024, 1, 1),
      ..FilterParams::default()
    };
    assert!(matches!(params.criteria(), Err(ApiError::BadRequest(_))));
  }

  #[test]
  fn unknown_status_is_rejected() {
    let params = FilterParams { status: Some("done".into()), ..FilterParams::default() };
    assert!(matches!(params.criteria(), Err(ApiError::BadRequest(_))));
  }
}
