//! The filter/aggregate engine.
//!
//! Pure functions over a store snapshot: same input, same output, no clock
//! and no hidden state. Nothing here mutates a request.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::{
  Error, Result,
  request::{Request, Status},
};

// ─── Criteria ────────────────────────────────────────────────────────────────

/// A filter that is either disabled (`"all"`) or requires an exact value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection<T> {
  #[default]
  All,
  Only(T),
}

impl<T: PartialEq> Selection<T> {
  pub fn admits(&self, value: &T) -> bool {
    match self {
      Self::All => true,
      Self::Only(wanted) => wanted == value,
    }
  }
}

impl<T> From<Option<T>> for Selection<T> {
  fn from(value: Option<T>) -> Self {
    value.map_or(Self::All, Self::Only)
  }
}

/// Parses the `"all"` sentinel, or else the inner value.
impl<T> FromStr for Selection<T>
where
  T: FromStr,
  Error: From<T::Err>,
{
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    if s == "all" {
      Ok(Self::All)
    } else {
      Ok(Self::Only(s.parse()?))
    }
  }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::All => f.write_str("all"),
      Self::Only(v) => v.fmt(f),
    }
  }
}

/// Inclusive calendar-date range: `start <= date <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
  pub start: NaiveDate,
  pub end:   NaiveDate,
}

impl DateRange {
  pub fn new(start: NaiveDate, end: NaiveDate) -> Self { Self { start, end } }

  /// A range with `start > end` contains nothing.
  pub fn contains(&self, date: NaiveDate) -> bool {
    self.start <= date && date <= self.end
  }
}

/// Independently optional predicates, combined with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
  /// Case-insensitive substring over request number, requester, company.
  pub text:               Option<String>,
  pub status:             Selection<Status>,
  pub date_range:         Option<DateRange>,
  pub responsible_person: Selection<Uuid>,
}

impl Criteria {
  pub fn with_text(mut self, text: impl Into<String>) -> Self {
    self.text = Some(text.into());
    self
  }

  pub fn with_status(mut self, status: Status) -> Self {
    self.status = Selection::Only(status);
    self
  }

  pub fn with_date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
    self.date_range = Some(DateRange::new(start, end));
    self
  }

  pub fn with_responsible_person(mut self, person_id: Uuid) -> Self {
    self.responsible_person = Selection::Only(person_id);
    self
  }

  /// Whether `request` satisfies every present predicate.
  pub fn matches(&self, request: &Request) -> bool {
    let needle = self.text.as_deref().map(str::to_lowercase);
    self.matches_with(request, needle.as_deref())
  }

  fn matches_with(&self, request: &Request, needle_lower: Option<&str>) -> bool {
    needle_lower.is_none_or(|n| request.matches_text(n))
      && self.status.admits(&request.status)
      && self
        .date_range
        .is_none_or(|range| range.contains(request.request_date))
      && self.responsible_person.admits(&request.responsible_person_id)
  }
}

// ─── Operations ──────────────────────────────────────────────────────────────

/// The requests matching `criteria`, in their original relative order.
pub fn filter_requests<'a>(
  requests: &'a [Request],
  criteria: &Criteria,
) -> Vec<&'a Request> {
  // Lowercase the query once rather than per request.
  let needle = criteria.text.as_deref().map(str::to_lowercase);
  requests
    .iter()
    .filter(|r| criteria.matches_with(r, needle.as_deref()))
    .collect()
}

/// Per-status counts plus total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
  pub in_progress:       usize,
  pub completed:         usize,
  pub cancelled:         usize,
  pub unable_to_proceed: usize,
  pub total:             usize,
}

impl StatusCounts {
  pub fn count(&self, status: Status) -> usize {
    match status {
      Status::InProgress => self.in_progress,
      Status::Completed => self.completed,
      Status::Cancelled => self.cancelled,
      Status::UnableToProceed => self.unable_to_proceed,
    }
  }

  /// Share of `status` in percent; `0.0` for an empty input.
  pub fn percentage(&self, status: Status) -> f64 {
    if self.total == 0 {
      return 0.0;
    }
    self.count(status) as f64 / self.total as f64 * 100.0
  }

  fn bump(&mut self, status: Status) {
    let slot = match status {
      Status::InProgress => &mut self.in_progress,
      Status::Completed => &mut self.completed,
      Status::Cancelled => &mut self.cancelled,
      Status::UnableToProceed => &mut self.unable_to_proceed,
    };
    *slot += 1;
    self.total += 1;
  }
}

/// Count requests per status. Accepts a full snapshot or a filtered subset.
pub fn aggregate_status_counts<'a>(
  requests: impl IntoIterator<Item = &'a Request>,
) -> StatusCounts {
  requests
    .into_iter()
    .fold(StatusCounts::default(), |mut counts, r| {
      counts.bump(r.status);
      counts
    })
}

/// The last `n` items by insertion order, most recent first.
///
/// Works on a snapshot slice (`&[Request]`) as well as on the output of
/// [`filter_requests`].
pub fn recent_n<I>(requests: I, n: usize) -> Vec<I::Item>
where
  I: IntoIterator,
  I::IntoIter: DoubleEndedIterator,
{
  requests.into_iter().rev().take(n).collect()
}
