//! Store behaviour against an in-memory session.

use std::{
  collections::HashSet,
  sync::{
    Arc,
    atomic::{AtomicI64, AtomicUsize, Ordering},
  },
};

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
  Store,
  filter::{Criteria, aggregate_status_counts, filter_requests, recent_n},
  person::{Person, PersonForm, PersonPatch},
  request::{Request, RequestForm, RequestPatch, Status, Warranty},
};

/// A clock that advances one second every time it is read.
fn ticking_clock() -> (Arc<AtomicI64>, impl Fn() -> DateTime<Utc> + Send + Sync) {
  let seconds = Arc::new(AtomicI64::new(1_700_000_000));
  let handle = seconds.clone();
  let clock = move || {
    let s = handle.fetch_add(1, Ordering::SeqCst);
    DateTime::from_timestamp(s, 0).expect("valid timestamp")
  };
  (seconds, clock)
}

fn store() -> Store {
  let (_, clock) = ticking_clock();
  Store::with_clock(clock)
}

fn person_form(name: &str) -> PersonForm {
  PersonForm {
    name:       name.into(),
    email:      format!("{}@company.com", name.to_lowercase()),
    phone:      "+66-2-123-4567".into(),
    department: "IT Support".into(),
  }
}

fn request_form(number: &str, person_id: Uuid) -> RequestForm {
  RequestForm {
    request_number:        number.into(),
    request_date:          NaiveDate::from_ymd_opt(2024, 1, 15),
    requester:             "Alice Brown".into(),
    phone_number:          "+66-81-123-4567".into(),
    company_name:          "Tech Solutions Ltd.".into(),
    device_model:          "MacBook Pro 14\"".into(),
    device_number:         "MB001234".into(),
    damage:                "Screen cracked".into(),
    note:                  "Dropped from desk".into(),
    warranty:              Some(Warranty::UnderWarranty),
    responsible_person_id: Some(person_id),
    status:                None,
  }
}

fn add_person(s: &mut Store, name: &str) -> Person {
  s.add(person_form(name).validate().unwrap())
}

fn add_request(s: &mut Store, number: &str, person_id: Uuid) -> Request {
  s.add(request_form(number, person_id).validate().unwrap())
}

// ─── add ─────────────────────────────────────────────────────────────────────

#[test]
fn identities_are_pairwise_distinct() {
  let mut s = store();
  let owner = add_person(&mut s, "John").id;
  let ids: HashSet<Uuid> = (0..200)
    .map(|i| add_request(&mut s, &format!("R{i}"), owner).id)
    .collect();
  assert_eq!(ids.len(), 200);
  assert_eq!(s.requests().len(), 200);
}

#[test]
fn colliding_identity_is_drawn_again() {
  let first = Uuid::from_u128(1);
  let second = Uuid::from_u128(2);
  let draws = Arc::new(AtomicUsize::new(0));
  let counter = draws.clone();
  let ids = move || if counter.fetch_add(1, Ordering::SeqCst) < 2 { first } else { second };

  let (_, clock) = ticking_clock();
  let mut s = Store::with_clock(clock).with_id_source(ids);
  assert_eq!(add_person(&mut s, "John").id, first);
  assert_eq!(add_person(&mut s, "Sarah").id, second);
  assert_eq!(draws.load(Ordering::SeqCst), 3);

  // Uniqueness is per collection.
  assert_eq!(add_request(&mut s, "R1", first).id, second);
  assert_eq!(draws.load(Ordering::SeqCst), 4);
}

#[test]
fn add_request_round_trips_fields_and_stamps_times() {
  let mut s = store();
  let owner = add_person(&mut s, "John").id;
  let draft = request_form("REQ-1", owner).validate().unwrap();

  let added = s.add(draft.clone());
  let listed = s.list::<Request>();
  assert_eq!(listed.len(), 1);

  let r = &listed[0];
  assert_eq!(r, &added);
  assert_eq!(r.request_number, draft.request_number);
  assert_eq!(r.request_date, draft.request_date);
  assert_eq!(r.requester, draft.requester);
  assert_eq!(r.phone_number, draft.phone_number);
  assert_eq!(r.company_name, draft.company_name);
  assert_eq!(r.device_model, draft.device_model);
  assert_eq!(r.device_number, draft.device_number);
  assert_eq!(r.damage, draft.damage);
  assert_eq!(r.note, draft.note);
  assert_eq!(r.warranty, draft.warranty);
  assert_eq!(r.responsible_person_id, owner);
  assert_eq!(r.status, Status::InProgress);
  assert_eq!(r.updated_at, r.created_at);
}

#[test]
fn add_person_stamps_created_at() {
  let (seconds, clock) = ticking_clock();
  let mut s = Store::with_clock(clock);
  let before = seconds.load(Ordering::SeqCst);
  let p = add_person(&mut s, "Sarah");
  assert_eq!(p.created_at.timestamp(), before);
  assert_eq!(s.list::<Person>(), &[p]);
}

#[test]
fn list_preserves_insertion_order() {
  let mut s = store();
  let owner = add_person(&mut s, "John").id;
  for n in ["C", "A", "B"] {
    add_request(&mut s, n, owner);
  }
  let order: Vec<&str> = s
    .requests()
    .iter()
    .map(|r| r.request_number.as_str())
    .collect();
  assert_eq!(order, ["C", "A", "B"]);
}

#[test]
fn store_accepts_drafts_with_dangling_person() {
  let mut s = store();
  let r = add_request(&mut s, "R1", Uuid::new_v4());
  assert!(s.responsible_person(&r).is_none());
}

// ─── update ──────────────────────────────────────────────────────────────────

#[test]
fn update_merges_only_given_fields_and_refreshes_updated_at() {
  let mut s = store();
  let owner = add_person(&mut s, "John").id;
  let before = add_request(&mut s, "R1", owner);

  let after = s
    .update(before.id, RequestPatch::status(Status::Completed))
    .expect("request exists");

  assert_eq!(after.status, Status::Completed);
  assert!(after.updated_at > before.updated_at);
  assert_eq!(after.created_at, before.created_at);
  assert_eq!(after.id, before.id);

  // Everything else is untouched.
  let expected = Request {
    status: Status::Completed,
    updated_at: after.updated_at,
    ..before
  };
  assert_eq!(after, expected);
  assert_eq!(s.get::<Request>(after.id), Some(&expected));
}

#[test]
fn update_never_moves_updated_at_before_created_at() {
  let seconds = Arc::new(AtomicI64::new(1_700_000_000));
  let handle = seconds.clone();
  let mut s = Store::with_clock(move || {
    DateTime::from_timestamp(handle.load(Ordering::SeqCst), 0).expect("valid timestamp")
  });
  let owner = add_person(&mut s, "John").id;
  let r = add_request(&mut s, "R1", owner);

  seconds.store(1_600_000_000, Ordering::SeqCst);
  let after = s.update(r.id, RequestPatch::status(Status::Cancelled)).unwrap();
  assert_eq!(after.updated_at, after.created_at);
}

#[test]
fn person_update_does_not_touch_created_at() {
  let mut s = store();
  let p = add_person(&mut s, "John");
  let patch = PersonPatch { department: Some("Technical".into()), ..Default::default() };

  let after = s.update(p.id, patch).unwrap();
  assert_eq!(after.department, "Technical");
  assert_eq!(after.name, p.name);
  assert_eq!(after.email, p.email);
  assert_eq!(after.created_at, p.created_at);
}

#[test]
fn update_unknown_id_is_a_no_op() {
  let mut s = store();
  let owner = add_person(&mut s, "John").id;
  add_request(&mut s, "R1", owner);
  let snapshot = s.requests().to_vec();

  let result = s.update(Uuid::new_v4(), RequestPatch::status(Status::Cancelled));
  assert!(result.is_none());
  assert_eq!(s.requests(), snapshot.as_slice());
}

// ─── delete ──────────────────────────────────────────────────────────────────

#[test]
fn delete_is_terminal() {
  let mut s = store();
  let owner = add_person(&mut s, "John").id;
  let a = add_request(&mut s, "A", owner);
  let b = add_request(&mut s, "B", owner);

  let removed = s.delete::<Request>(a.id);
  assert_eq!(removed.as_ref().map(|r| r.id), Some(a.id));
  assert!(s.requests().iter().all(|r| r.id != a.id));
  assert_eq!(s.requests(), &[b]);

  assert!(s.update(a.id, RequestPatch::status(Status::Completed)).is_none());
  assert!(s.delete::<Request>(a.id).is_none());
  assert_eq!(s.requests().len(), 1);
}

#[test]
fn deleting_person_leaves_requests_dangling() {
  let mut s = store();
  let john = add_person(&mut s, "John");
  let sarah = add_person(&mut s, "Sarah");
  let r1 = add_request(&mut s, "R1", john.id);
  add_request(&mut s, "R2", sarah.id);
  add_request(&mut s, "R3", john.id);

  assert_eq!(s.requests_assigned_to(john.id).count(), 2);
  assert_eq!(s.responsible_person(&r1), Some(&john));

  s.delete::<Person>(john.id);

  assert_eq!(s.requests().len(), 3);
  assert_eq!(s.persons(), &[sarah]);
  assert!(s.responsible_person(&r1).is_none());
  assert_eq!(s.requests_assigned_to(john.id).count(), 2);
}

#[test]
fn collections_are_independent() {
  let mut s = store();
  let p = add_person(&mut s, "John");
  assert!(s.delete::<Request>(p.id).is_none());
  assert_eq!(s.persons().len(), 1);
}

// ─── engine over store snapshots ─────────────────────────────────────────────

#[test]
fn engine_reads_store_snapshot() {
  let mut s = store();
  let owner = add_person(&mut s, "John").id;
  for n in ["A", "B", "C"] {
    add_request(&mut s, n, owner);
  }
  let b = s.requests()[1].id;
  s.update(b, RequestPatch::status(Status::Completed));

  let done = filter_requests(s.requests(), &Criteria::default().with_status(Status::Completed));
  assert_eq!(done.len(), 1);
  assert_eq!(done[0].request_number, "B");

  let counts = aggregate_status_counts(s.requests());
  assert_eq!(counts.total, 3);
  assert_eq!(counts.in_progress, 2);

  let recent: Vec<&str> = recent_n(s.requests(), 2)
    .into_iter()
    .map(|r| r.request_number.as_str())
    .collect();
  assert_eq!(recent, ["C", "B"]);
}

#[test]
fn debug_reports_sizes_only() {
  let mut s = store();
  add_person(&mut s, "John");
  let dbg = format!("{s:?}");
  assert!(dbg.contains("persons: 1"), "{dbg}");
  assert!(dbg.contains("requests: 0"), "{dbg}");
}
