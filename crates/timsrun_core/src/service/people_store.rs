//! Authoritative people collection with save-on-every-mutation persistence.
//!
//! # Responsibility
//! - Own the ordered in-memory list of `Person` records.
//! - Persist the whole list under `PEOPLE_KEY` after each successful mutation.
//! - Load the list once at construction, degrading to empty on any failure.
//!
//! # Invariants
//! - Insertion order is preserved; nothing sorts the collection.
//! - Person IDs are unique and never rewritten by a mutation.
//! - Usual-order IDs are unique across the collection.
//! - Usual-order counters are clamped into bounds before they are committed.
//! - Persistence failures are logged and never undo the in-memory change.
//!
//! Log events carry counts and error codes only, never names or notes.

use crate::model::order::{Order, OrderId};
use crate::model::person::{Person, PersonId};
use crate::repo::blob_repo::BlobStore;
use crate::service::people_codec::{decode_people, encode_people, PEOPLE_KEY};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Rejected mutation; the collection is unchanged and nothing was saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound(PersonId),
    IndexOutOfRange { index: usize, len: usize },
    DuplicateId(PersonId),
    DuplicateOrderId(OrderId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "person not found: {id}"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "person index {index} out of range for {len} people")
            }
            Self::DuplicateId(id) => write!(f, "person id already present: {id}"),
            Self::DuplicateOrderId(id) => {
                write!(f, "order id already used by another person: {id}")
            }
        }
    }
}

impl Error for StoreError {}

/// The people collection and the blob store it persists to.
///
/// Construct one at startup with [`PeopleStore::load`] and hand it to every
/// consumer. There is no explicit shutdown: each mutation has already been
/// saved by the time it returns.
pub struct PeopleStore<S: BlobStore> {
    blobs: S,
    people: Vec<Person>,
    last_save_failed: bool,
}

impl<S: BlobStore> PeopleStore<S> {
    /// Loads the collection stored under `PEOPLE_KEY`.
    ///
    /// A missing blob yields an empty collection. An unreadable or invalid
    /// blob also yields an empty collection; the old data is not recovered.
    pub fn load(blobs: S) -> Self {
        let people = match blobs.get_blob(PEOPLE_KEY) {
            Ok(Some(bytes)) => match decode_people(&bytes) {
                Ok(people) => {
                    info!(
                        "event=store_load module=store status=ok key={PEOPLE_KEY} count={}",
                        people.len()
                    );
                    people
                }
                Err(err) => {
                    error!(
                        "event=store_load module=store status=error key={PEOPLE_KEY} error_code=decode_failed bytes={} error={err}",
                        bytes.len()
                    );
                    Vec::new()
                }
            },
            Ok(None) => {
                info!("event=store_load module=store status=ok key={PEOPLE_KEY} count=0 blob=missing");
                Vec::new()
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=error key={PEOPLE_KEY} error_code=read_failed error={err}"
                );
                Vec::new()
            }
        };

        Self {
            blobs,
            people,
            last_save_failed: false,
        }
    }

    /// Full collection in insertion order.
    pub fn all(&self) -> &[Person] {
        &self.people
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn get(&self, id: PersonId) -> Option<&Person> {
        self.people.iter().find(|person| person.id == id)
    }

    pub fn position(&self, id: PersonId) -> Option<usize> {
        self.people.iter().position(|person| person.id == id)
    }

    /// Whether the most recent save attempt failed. Diagnostic only.
    pub fn last_save_failed(&self) -> bool {
        self.last_save_failed
    }

    /// Appends `person` at the end of the collection.
    ///
    /// # Errors
    /// - `StoreError::DuplicateId` when the ID is already present.
    /// - `StoreError::DuplicateOrderId` when the usual order's ID is taken.
    pub fn append(&mut self, mut person: Person) -> StoreResult<&Person> {
        if self.position(person.id).is_some() {
            return Err(StoreError::DuplicateId(person.id));
        }
        self.check_usual_id(&person)?;
        clamp_usual(&mut person);
        self.people.push(person);
        self.save("append");
        let index = self.people.len() - 1;
        Ok(&self.people[index])
    }

    /// Creates a person with no usual order and appends it.
    ///
    /// The caller is responsible for rejecting blank names.
    pub fn create_person(&mut self, name: impl Into<String>) -> PersonId {
        let person = Person::new(name);
        let id = person.id;
        self.people.push(person);
        self.save("create");
        id
    }

    /// Removes and returns the person at `index`.
    pub fn remove_at(&mut self, index: usize) -> StoreResult<Person> {
        if index >= self.people.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: self.people.len(),
            });
        }
        let removed = self.people.remove(index);
        self.save("remove");
        Ok(removed)
    }

    /// Removes and returns the person with `id`; other records are untouched.
    pub fn remove_by_id(&mut self, id: PersonId) -> StoreResult<Person> {
        let index = self.position(id).ok_or(StoreError::NotFound(id))?;
        self.remove_at(index)
    }

    /// Applies `mutator` to the person with `id`, saves, and returns the
    /// committed record.
    ///
    /// The person's ID is restored if the mutator changed it, and usual-order
    /// counters are clamped into bounds.
    ///
    /// # Errors
    /// - `StoreError::NotFound` for an unknown `id`.
    /// - `StoreError::DuplicateOrderId` when the resulting usual order shares
    ///   its ID with another person's usual; the person is left as it was.
    pub fn update<F>(&mut self, id: PersonId, mutator: F) -> StoreResult<&Person>
    where
        F: FnOnce(&mut Person),
    {
        let index = self.position(id).ok_or(StoreError::NotFound(id))?;
        let mut person = self.people[index].clone();
        mutator(&mut person);
        if person.id != id {
            warn!("event=store_update module=store status=warn error_code=id_rewrite_ignored");
            person.id = id;
        }
        self.check_usual_id(&person)?;
        clamp_usual(&mut person);
        self.people[index] = person;
        self.save("update");
        Ok(&self.people[index])
    }

    pub fn rename(&mut self, id: PersonId, name: impl Into<String>) -> StoreResult<&Person> {
        let name = name.into();
        self.update(id, move |person| person.name = name)
    }

    /// Replaces the usual order wholesale (edit-session commit).
    pub fn set_usual(&mut self, id: PersonId, order: Order) -> StoreResult<&Person> {
        self.update(id, move |person| person.usual = Some(order))
    }

    pub fn clear_usual(&mut self, id: PersonId) -> StoreResult<&Person> {
        self.update(id, |person| person.usual = None)
    }

    fn check_usual_id(&self, person: &Person) -> StoreResult<()> {
        let Some(order_id) = person.usual.as_ref().map(|order| order.id) else {
            return Ok(());
        };
        let taken = self.people.iter().any(|other| {
            other.id != person.id && other.usual.as_ref().map(|usual| usual.id) == Some(order_id)
        });
        if taken {
            warn!("event=store_update module=store status=warn error_code=duplicate_order_id");
            return Err(StoreError::DuplicateOrderId(order_id));
        }
        Ok(())
    }

    fn save(&mut self, operation: &'static str) {
        let result = encode_people(&self.people)
            .map_err(|err| ("encode_failed", err.to_string()))
            .and_then(|bytes| {
                self.blobs
                    .put_blob(PEOPLE_KEY, &bytes)
                    .map_err(|err| ("write_failed", err.to_string()))
            });

        match result {
            Ok(()) => {
                self.last_save_failed = false;
                info!(
                    "event=store_save module=store status=ok op={operation} key={PEOPLE_KEY} count={}",
                    self.people.len()
                );
            }
            Err((code, err)) => {
                self.last_save_failed = true;
                error!(
                    "event=store_save module=store status=error op={operation} key={PEOPLE_KEY} error_code={code} error={err}"
                );
            }
        }
    }
}

fn clamp_usual(person: &mut Person) {
    if let Some(order) = person.usual.as_mut() {
        if let Err(err) = order.validate() {
            warn!("event=usual_clamped module=store status=warn error={err}");
            *order = order.clamped();
        }
    }
}
