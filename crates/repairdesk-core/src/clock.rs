//! Time and identity sources for the store's bookkeeping.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Supplies "now" to the [`Store`](crate::Store).
///
/// The filter engine never consults a clock; only the store stamps
/// `created_at`/`updated_at`.
pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time via [`Utc::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> { Utc::now() }
}

impl<F> Clock for F
where
  F: Fn() -> DateTime<Utc> + Send + Sync,
{
  fn now(&self) -> DateTime<Utc> { self() }
}

/// Supplies candidate identities to the [`Store`](crate::Store).
///
/// The store re-draws whenever a candidate is already held by a live entity
/// of the same kind, so a source may repeat itself.
pub trait IdSource: Send + Sync {
  fn next_id(&self) -> Uuid;
}

/// Random v4 UUIDs via [`Uuid::new_v4`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
  fn next_id(&self) -> Uuid { Uuid::new_v4() }
}

impl<F> IdSource for F
where
  F: Fn() -> Uuid + Send + Sync,
{
  fn next_id(&self) -> Uuid { self() }
}
