//! The [`Store`]: sole owner and writer of the request and person
//! collections.
//!
//! The store assigns identities and timestamps, preserves insertion order,
//! and performs no semantic validation: it only accepts drafts that already
//! went through [`RequestForm::validate`](crate::request::RequestForm::validate)
//! or [`PersonForm::validate`](crate::person::PersonForm::validate).
//!
//! Every operation is synchronous and total. Updating or deleting an
//! identity that is not present changes nothing and returns `None`.

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  clock::{Clock, IdSource, RandomIds, SystemClock},
  person::Person,
  request::Request,
};

// ─── Entity traits ───────────────────────────────────────────────────────────

/// A record kept in a [`Collection`].
pub trait Entity: Clone {
  /// Validated creation input; everything except identity and timestamps.
  type Draft;
  /// Optional-field patch merged onto an existing entity.
  type Patch;

  /// Short name used in log events.
  const KIND: &'static str;

  fn id(&self) -> Uuid;

  /// Build the entity from a draft. `now` becomes `created_at`.
  fn create(id: Uuid, now: DateTime<Utc>, draft: Self::Draft) -> Self;

  /// Shallow-merge `patch` onto `self`. Never touches identity or
  /// `created_at`.
  fn merge(&mut self, patch: Self::Patch, now: DateTime<Utc>);
}

/// Ties a draft type to the entity it creates, so [`Store::add`] can infer
/// the target collection from its argument.
pub trait Draft {
  type Entity: Entity<Draft = Self>;
}

/// Ties a patch type to the entity it applies to.
pub trait Patch {
  type Entity: Entity<Patch = Self>;
}

// ─── Collection ──────────────────────────────────────────────────────────────

/// An insertion-ordered set of entities keyed by identity.
#[derive(Debug, Clone)]
pub struct Collection<T> {
  items: Vec<T>,
}

impl<T> Default for Collection<T> {
  fn default() -> Self { Self { items: Vec::new() } }
}

impl<T: Entity> Collection<T> {
  pub fn as_slice(&self) -> &[T] { &self.items }

  pub fn len(&self) -> usize { self.items.len() }

  pub fn is_empty(&self) -> bool { self.items.is_empty() }

  pub fn get(&self, id: Uuid) -> Option<&T> {
    self.items.iter().find(|e| e.id() == id)
  }

  pub fn contains(&self, id: Uuid) -> bool { self.get(id).is_some() }

  /// The first candidate from `ids` not held by any live entity in this
  /// collection.
  fn fresh_id(&self, ids: &dyn IdSource) -> Uuid {
    loop {
      let id = ids.next_id();
      if !self.contains(id) {
        return id;
      }
      tracing::debug!(%id, "identity collision, drawing again");
    }
  }

  fn get_mut(&mut self, id: Uuid) -> Option<&mut T> {
    self.items.iter_mut().find(|e| e.id() == id)
  }

  fn remove(&mut self, id: Uuid) -> Option<T> {
    let pos = self.items.iter().position(|e| e.id() == id)?;
    Some(self.items.remove(pos))
  }
}

mod sealed {
  /// Only this module's parent can build one, so only the store can reach a
  /// collection mutably.
  #[derive(Debug, Clone, Copy)]
  pub struct Key(pub(super) ());
}

/// Implemented by [`Store`] once per entity type it owns.
///
/// The public surface is read-only: every write goes through [`Store::add`],
/// [`Store::update`] or [`Store::delete`].
///
/// ```
/// use repairdesk_core::{Store, person::Person, store::Holds};
///
/// let store = Store::new();
/// assert!(<Store as Holds<Person>>::collection(&store).is_empty());
/// ```
///
/// ```compile_fail
/// use repairdesk_core::{Store, person::Person, store::{Collection, Holds}};
///
/// fn wipe<S: Holds<Person>>(store: &mut S) {
///   *store.collection_mut() = Collection::default();
/// }
/// ```
pub trait Holds<T: Entity> {
  fn collection(&self) -> &Collection<T>;

  #[doc(hidden)]
  fn collection_mut(&mut self, key: sealed::Key) -> &mut Collection<T>;
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// In-memory state for one session.
///
/// Construct one at startup and hand it (or a shared handle to it) to every
/// consumer. Dropping it discards all data.
pub struct Store {
  requests: Collection<Request>,
  persons:  Collection<Person>,
  clock:    Arc<dyn Clock>,
  ids:      Arc<dyn IdSource>,
}

impl Store {
  /// An empty store stamped by the system clock.
  pub fn new() -> Self { Self::with_clock(SystemClock) }

  /// An empty store stamped by `clock`.
  pub fn with_clock(clock: impl Clock + 'static) -> Self {
    Self {
      requests: Collection::default(),
      persons:  Collection::default(),
      clock:    Arc::new(clock),
      ids:      Arc::new(RandomIds),
    }
  }

  /// Replace the source of new identities.
  pub fn with_id_source(mut self, ids: impl IdSource + 'static) -> Self {
    self.ids = Arc::new(ids);
    self
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  /// Append a new entity built from `draft` and return it.
  pub fn add<D>(&mut self, draft: D) -> D::Entity
  where
    D: Draft,
    Self: Holds<D::Entity>,
  {
    let kind = <D::Entity as Entity>::KIND;
    let now = self.clock.now();
    let id = <Self as Holds<D::Entity>>::collection(self).fresh_id(self.ids.as_ref());
    let entity = <D::Entity as Entity>::create(id, now, draft);
    <Self as Holds<D::Entity>>::collection_mut(self, sealed::Key(()))
      .items
      .push(entity.clone());
    tracing::debug!(kind, %id, "entity added");
    entity
  }

  /// Merge `patch` onto the entity with identity `id`.
  ///
  /// Returns the entity as it stands after the merge, or `None` (and changes
  /// nothing) if no such entity exists.
  pub fn update<P>(&mut self, id: Uuid, patch: P) -> Option<P::Entity>
  where
    P: Patch,
    Self: Holds<P::Entity>,
  {
    let kind = <P::Entity as Entity>::KIND;
    let now = self.clock.now();
    let collection = <Self as Holds<P::Entity>>::collection_mut(self, sealed::Key(()));
    let Some(entity) = collection.get_mut(id) else {
      tracing::warn!(kind, %id, "update of unknown entity ignored");
      return None;
    };
    entity.merge(patch, now);
    tracing::debug!(kind, %id, "entity updated");
    Some(entity.clone())
  }

  /// Remove the entity with identity `id`, returning it. No cascade.
  pub fn delete<T>(&mut self, id: Uuid) -> Option<T>
  where
    T: Entity,
    Self: Holds<T>,
  {
    let removed = <Self as Holds<T>>::collection_mut(self, sealed::Key(())).remove(id);
    match &removed {
      Some(_) => tracing::debug!(kind = T::KIND, %id, "entity deleted"),
      None => tracing::warn!(kind = T::KIND, %id, "delete of unknown entity ignored"),
    }
    removed
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// The full collection in insertion order.
  pub fn list<T>(&self) -> &[T]
  where
    T: Entity,
    Self: Holds<T>,
  {
    <Self as Holds<T>>::collection(self).as_slice()
  }

  pub fn get<T>(&self, id: Uuid) -> Option<&T>
  where
    T: Entity,
    Self: Holds<T>,
  {
    <Self as Holds<T>>::collection(self).get(id)
  }

  pub fn requests(&self) -> &[Request] { self.requests.as_slice() }

  pub fn persons(&self) -> &[Person] { self.persons.as_slice() }

  /// Resolve a request's responsible person. `None` when the person has been
  /// deleted; views render that as "N/A".
  pub fn responsible_person(&self, request: &Request) -> Option<&Person> {
    self.persons.get(request.responsible_person_id)
  }

  /// Requests whose responsible person is `person_id`, in insertion order.
  pub fn requests_assigned_to(
    &self,
    person_id: Uuid,
  ) -> impl Iterator<Item = &Request> + '_ {
    self
      .requests
      .as_slice()
      .iter()
      .filter(move |r| r.responsible_person_id == person_id)
  }
}

impl Default for Store {
  fn default() -> Self { Self::new() }
}

impl fmt::Debug for Store {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Store")
      .field("requests", &self.requests.len())
      .field("persons", &self.persons.len())
      .finish_non_exhaustive()
  }
}

impl Holds<Request> for Store {
  fn collection(&self) -> &Collection<Request> { &self.requests }

  fn collection_mut(&mut self, _: sealed::Key) -> &mut Collection<Request> {
    &mut self.requests
  }
}

impl Holds<Person> for Store {
  fn collection(&self) -> &Collection<Person> { &self.persons }

  fn collection_mut(&mut self, _: sealed::Key) -> &mut Collection<Person> {
    &mut self.persons
  }
}
