use std::cell::Cell;
use timsrun_core::{
    apply_preset, encode_people, render_order, BlobError, BlobResult, BlobStore, CoffeePreset,
    MemoryBlobStore, Order, PeopleStore, Person, SqliteBlobStore, StoreError, PEOPLE_KEY,
};
use uuid::Uuid;

/// Blob store whose writes can be switched off.
#[derive(Default)]
struct FlakyBlobStore {
    inner: MemoryBlobStore,
    fail_writes: Cell<bool>,
}

impl BlobStore for FlakyBlobStore {
    fn get_blob(&self, key: &str) -> BlobResult<Option<Vec<u8>>> {
        self.inner.get_blob(key)
    }

    fn put_blob(&self, key: &str, value: &[u8]) -> BlobResult<()> {
        if self.fail_writes.get() {
            return Err(BlobError::Unavailable("disk full".to_string()));
        }
        self.inner.put_blob(key, value)
    }
}

/// Blob store whose reads always fail.
struct UnreadableBlobStore;

impl BlobStore for UnreadableBlobStore {
    fn get_blob(&self, _key: &str) -> BlobResult<Option<Vec<u8>>> {
        Err(BlobError::Unavailable("permission denied".to_string()))
    }

    fn put_blob(&self, _key: &str, _value: &[u8]) -> BlobResult<()> {
        Ok(())
    }
}

#[test]
fn missing_blob_starts_empty() {
    let store = PeopleStore::load(MemoryBlobStore::new());
    assert!(store.is_empty());
    assert!(!store.last_save_failed());
}

#[test]
fn corrupted_blob_falls_back_to_empty() {
    let store = PeopleStore::load(MemoryBlobStore::with_blob(PEOPLE_KEY, "{not json"));
    assert!(store.is_empty());
}

#[test]
fn schema_mismatched_blob_falls_back_to_empty() {
    let blob = r#"{"version": 2, "people": [{"id": 7, "fullName": "Old Shape"}]}"#;
    let store = PeopleStore::load(MemoryBlobStore::with_blob(PEOPLE_KEY, blob));
    assert!(store.is_empty());
}

#[test]
fn read_failure_falls_back_to_empty() {
    let store = PeopleStore::load(UnreadableBlobStore);
    assert!(store.is_empty());
}

#[test]
fn blobs_under_other_keys_are_ignored() {
    let people = vec![Person::new("Legacy")];
    let blobs = MemoryBlobStore::with_blob("people.v0", encode_people(&people).unwrap());

    let store = PeopleStore::load(blobs);
    assert!(store.is_empty());
}

#[test]
fn every_mutation_persists_the_whole_collection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timsrun.sqlite3");

    let (ana_id, ben_id, usual) = {
        let mut store = PeopleStore::load(SqliteBlobStore::open(&path).unwrap());
        let ana_id = store.create_person("Ana");
        let ben_id = store.create_person("Ben");

        let mut usual = Order::new();
        apply_preset(&mut usual, CoffeePreset::DoubleDouble);
        usual.espresso_shots = 1;
        store.set_usual(ana_id, usual.clone()).unwrap();
        store.rename(ben_id, "Benjamin").unwrap();
        (ana_id, ben_id, usual)
    };

    let reloaded = PeopleStore::load(SqliteBlobStore::open(&path).unwrap());
    let people = reloaded.all();
    assert_eq!(people.len(), 2);
    assert_eq!(people[0].id, ana_id);
    assert_eq!(people[0].usual.as_ref(), Some(&usual));
    assert_eq!(people[1].id, ben_id);
    assert_eq!(people[1].name, "Benjamin");
    assert_eq!(
        render_order(people[0].usual.as_ref().unwrap()),
        "medium regular blend coffee, — double double, 1 shot"
    );
}

#[test]
fn clear_usual_is_persisted() {
    let blobs = MemoryBlobStore::new();
    let id = {
        let mut store = PeopleStore::load(&blobs);
        let id = store.create_person("Dee");
        store.set_usual(id, Order::new()).unwrap();
        store.clear_usual(id).unwrap();
        id
    };

    let reloaded = PeopleStore::load(&blobs);
    assert_eq!(reloaded.get(id).unwrap().usual, None);
}

#[test]
fn removing_by_id_leaves_other_people_untouched() {
    let blobs = MemoryBlobStore::new();
    let mut store = PeopleStore::load(&blobs);
    let first = store.create_person("First");
    let middle = store.create_person("Middle");
    let last = store.create_person("Last");
    let mut order = Order::new();
    order.drink_name = "Latte".to_string();
    store.set_usual(last, order).unwrap();
    let before: Vec<Person> = store
        .all()
        .iter()
        .filter(|person| person.id != middle)
        .cloned()
        .collect();

    let removed = store.remove_by_id(middle).unwrap();
    assert_eq!(removed.name, "Middle");
    assert_eq!(store.all(), before.as_slice());
    assert_eq!(store.position(first), Some(0));
    assert_eq!(store.position(last), Some(1));

    let reloaded = PeopleStore::load(&blobs);
    assert_eq!(reloaded.all(), before.as_slice());
}

#[test]
fn remove_at_keeps_insertion_order() {
    let mut store = PeopleStore::load(MemoryBlobStore::new());
    store.create_person("A");
    store.create_person("B");
    store.create_person("C");

    store.remove_at(0).unwrap();
    let names: Vec<&str> = store.all().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["B", "C"]);
}

#[test]
fn unknown_id_is_rejected_without_saving() {
    let blobs = MemoryBlobStore::new();
    let mut store = PeopleStore::load(&blobs);
    store.create_person("Known");
    let saved = blobs.get_blob(PEOPLE_KEY).unwrap();
    let stranger = Uuid::new_v4();

    assert_eq!(
        store.rename(stranger, "Nobody").unwrap_err(),
        StoreError::NotFound(stranger)
    );
    assert_eq!(
        store.remove_by_id(stranger).unwrap_err(),
        StoreError::NotFound(stranger)
    );
    assert_eq!(blobs.get_blob(PEOPLE_KEY).unwrap(), saved);
}

#[test]
fn save_failure_keeps_in_memory_change() {
    let blobs = FlakyBlobStore::default();
    let mut store = PeopleStore::load(&blobs);
    let kept = store.create_person("Persisted");
    assert!(!store.last_save_failed());

    blobs.fail_writes.set(true);
    let transient = store.create_person("Memory only");
    assert!(store.last_save_failed());
    assert_eq!(store.len(), 2);
    assert_eq!(store.get(transient).unwrap().name, "Memory only");

    let reloaded = PeopleStore::load(&blobs);
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.all()[0].id, kept);

    blobs.fail_writes.set(false);
    store.rename(kept, "Persisted again").unwrap();
    assert!(!store.last_save_failed());
    assert_eq!(PeopleStore::load(&blobs).len(), 2);
}

#[test]
fn usual_order_cannot_be_shared_between_people() {
    let blobs = MemoryBlobStore::new();
    let mut store = PeopleStore::load(&blobs);
    let ana = store.create_person("Ana");
    let ben = store.create_person("Ben");
    let order = Order::new();
    store.set_usual(ana, order.clone()).unwrap();

    assert_eq!(
        store.set_usual(ben, order.clone()).unwrap_err(),
        StoreError::DuplicateOrderId(order.id)
    );
    assert_eq!(store.get(ben).unwrap().usual, None);

    let mut copy = Person::new("Cy");
    copy.usual = Some(order.clone());
    assert_eq!(
        store.append(copy).unwrap_err(),
        StoreError::DuplicateOrderId(order.id)
    );

    let mut edited = order.clone();
    edited.cream = 3;
    store.set_usual(ana, edited).unwrap();

    let reloaded = PeopleStore::load(&blobs);
    assert_eq!(reloaded.len(), 2);
    let ids: Vec<_> = reloaded
        .all()
        .iter()
        .filter_map(|person| person.usual.as_ref().map(|usual| usual.id))
        .collect();
    assert_eq!(ids, vec![order.id]);
}

#[test]
fn append_keeps_caller_identity() {
    let mut store = PeopleStore::load(MemoryBlobStore::new());
    let person = Person::with_id(Uuid::new_v4(), "Imported");

    let appended = store.append(person.clone()).unwrap();
    assert_eq!(appended, &person);
}
