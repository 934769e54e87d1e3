//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the people/order operations to Dart via FRB.
//! - Own the single process-wide `PeopleStore` the UI talks to.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Enumerated values cross the boundary as their persisted string tags.
//! - Every store mutation is persisted before the call returns.

use log::warn;
use std::sync::{Mutex, MutexGuard, OnceLock};
use timsrun_core::{
    apply_preset as apply_preset_inner, core_version as core_version_inner,
    init_logging as init_logging_inner, ping as ping_inner, render_order, run_lines, usual_line,
    CoffeeBlend, CoffeePreset, CoreConfig, MilkType, Order, PeopleStore, Person, PersonId,
    RunSelection, Size, SqliteBlobStore, BASE_DRINKS, MAX_ADDITION_COUNT, MAX_ESPRESSO_SHOTS,
};
use uuid::Uuid;

type SharedStore = Mutex<PeopleStore<SqliteBlobStore>>;

static STORE: OnceLock<SharedStore> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Opens the people database under `data_dir` and loads the roster.
///
/// # FFI contract
/// - Must be called before any `person_*` or `people_*` call.
/// - Calling again after success is a no-op, even with another directory.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_store(data_dir: String) -> String {
    if STORE.get().is_some() {
        return String::new();
    }
    let opened = CoreConfig::new(data_dir.trim())
        .map_err(|err| err.to_string())
        .and_then(|config| {
            std::fs::create_dir_all(config.data_dir()).map_err(|err| {
                format!(
                    "failed to create data directory `{}`: {err}",
                    config.data_dir().display()
                )
            })?;
            SqliteBlobStore::open(config.db_path()).map_err(|err| err.to_string())
        });

    match opened {
        Ok(blobs) => {
            // A concurrent winner already loaded the same roster; drop ours.
            let _ = STORE.set(Mutex::new(PeopleStore::load(blobs)));
            String::new()
        }
        Err(err) => format!("init_store failed: {err}"),
    }
}

/// Order fields as the editor sees them; enums are persisted tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub order_id: String,
    pub drink_name: String,
    pub size: String,
    pub blend: Option<String>,
    pub preset: String,
    pub cream: u8,
    pub milk: u8,
    pub milk_type: String,
    pub sugar: u8,
    pub sweetener: u8,
    pub espresso_shots: u8,
    pub notes: String,
}

/// One row of the people list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonItem {
    pub person_id: String,
    pub name: String,
    pub usual: Option<OrderItem>,
    /// Rendered usual order or the "No usual saved" placeholder.
    pub subtitle: String,
}

/// Generic action response envelope for store mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonActionResponse {
    pub ok: bool,
    pub person_id: Option<String>,
    pub message: String,
}

impl PersonActionResponse {
    fn success(message: impl Into<String>, person_id: PersonId) -> Self {
        Self {
            ok: true,
            person_id: Some(person_id.to_string()),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            person_id: None,
            message: message.into(),
        }
    }
}

/// Picker entry: persisted tag plus display title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionItem {
    pub tag: String,
    pub title: String,
}

/// Every picker list and stepper bound the order editor needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderOptions {
    pub drinks: Vec<String>,
    pub sizes: Vec<OptionItem>,
    pub blends: Vec<OptionItem>,
    pub presets: Vec<OptionItem>,
    pub milk_types: Vec<OptionItem>,
    pub max_addition_count: u8,
    pub max_espresso_shots: u8,
}

/// Returns the full roster in insertion order.
///
/// # FFI contract
/// - Returns an empty list when the store is not initialized.
#[flutter_rust_bridge::frb(sync)]
pub fn people_list() -> Vec<PersonItem> {
    match lock_store() {
        Ok(store) => store.all().iter().map(to_person_item).collect(),
        Err(err) => {
            warn!("event=ffi_people_list module=ffi status=error error={err}");
            Vec::new()
        }
    }
}

/// Adds a person with no usual order.
///
/// Blank names are rejected here; the core does not check them.
#[flutter_rust_bridge::frb(sync)]
pub fn person_create(name: String) -> PersonActionResponse {
    let name = name.trim().to_string();
    if name.is_empty() {
        return PersonActionResponse::failure("person_create failed: name cannot be empty");
    }
    match lock_store() {
        Ok(mut store) => PersonActionResponse::success("Person added.", store.create_person(name)),
        Err(err) => PersonActionResponse::failure(format!("person_create failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn person_rename(person_id: String, name: String) -> PersonActionResponse {
    let name = name.trim().to_string();
    if name.is_empty() {
        return PersonActionResponse::failure("person_rename failed: name cannot be empty");
    }
    with_person(&person_id, "person_rename", "Person renamed.", |store, id| {
        store.rename(id, name).map(|_| ())
    })
}

/// Commits an edit session: replaces the usual order wholesale.
#[flutter_rust_bridge::frb(sync)]
pub fn person_set_usual(person_id: String, order: OrderItem) -> PersonActionResponse {
    let order = match from_order_item(&order) {
        Ok(order) => order,
        Err(err) => {
            return PersonActionResponse::failure(format!("person_set_usual failed: {err}"));
        }
    };
    with_person(&person_id, "person_set_usual", "Usual saved.", |store, id| {
        store.set_usual(id, order).map(|_| ())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn person_clear_usual(person_id: String) -> PersonActionResponse {
    with_person(&person_id, "person_clear_usual", "Usual removed.", |store, id| {
        store.clear_usual(id).map(|_| ())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn person_delete(person_id: String) -> PersonActionResponse {
    with_person(&person_id, "person_delete", "Person deleted.", |store, id| {
        store.remove_by_id(id).map(|_| ())
    })
}

/// Fresh order for a new edit session, or a copy of the person's usual.
#[flutter_rust_bridge::frb(sync)]
pub fn order_new(person_id: Option<String>) -> OrderItem {
    let mut order = Order::new();
    if let Some(id) = person_id.and_then(|raw| parse_person_id(&raw).ok()) {
        if let Ok(store) = lock_store() {
            if let Some(usual) = store.get(id).and_then(|person| person.usual.as_ref()) {
                order = usual.clone();
            }
        }
    }
    to_order_item(&order)
}

/// Selects a preset on an in-progress order and returns the updated order.
///
/// An unknown preset tag returns the order unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn order_apply_preset(order: OrderItem, preset: String) -> OrderItem {
    let (Ok(mut parsed), Some(preset)) = (from_order_item(&order), CoffeePreset::from_tag(&preset))
    else {
        return order;
    };
    apply_preset_inner(&mut parsed, preset);
    to_order_item(&parsed)
}

/// Readable one-line summary; invalid input yields an empty string.
#[flutter_rust_bridge::frb(sync)]
pub fn order_summary(order: OrderItem) -> String {
    from_order_item(&order)
        .map(|order| render_order(&order))
        .unwrap_or_default()
}

/// Bullet lines for the selected people, in roster order.
#[flutter_rust_bridge::frb(sync)]
pub fn run_summary(selected_ids: Vec<String>) -> Vec<String> {
    let selection: RunSelection = selected_ids
        .iter()
        .filter_map(|raw| parse_person_id(raw).ok())
        .collect();
    match lock_store() {
        Ok(store) => run_lines(store.all(), &selection),
        Err(_) => Vec::new(),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn order_options() -> OrderOptions {
    OrderOptions {
        drinks: BASE_DRINKS.iter().map(|drink| drink.to_string()).collect(),
        sizes: Size::ALL
            .iter()
            .map(|size| option_item(size.as_tag(), size.title()))
            .collect(),
        blends: CoffeeBlend::ALL
            .iter()
            .map(|blend| option_item(blend.as_tag(), blend.title()))
            .collect(),
        presets: CoffeePreset::ALL
            .iter()
            .map(|preset| option_item(preset.as_tag(), preset.title()))
            .collect(),
        milk_types: MilkType::ALL
            .iter()
            .map(|milk| option_item(milk.as_tag(), milk.title()))
            .collect(),
        max_addition_count: MAX_ADDITION_COUNT,
        max_espresso_shots: MAX_ESPRESSO_SHOTS,
    }
}

fn lock_store() -> Result<MutexGuard<'static, PeopleStore<SqliteBlobStore>>, String> {
    let store = STORE
        .get()
        .ok_or_else(|| "store not initialized; call init_store first".to_string())?;
    // Mutations never leave a partial roster behind, so poisoning is ignored.
    Ok(store.lock().unwrap_or_else(|poisoned| poisoned.into_inner()))
}

fn with_person(
    raw_id: &str,
    operation: &str,
    success_message: &str,
    f: impl FnOnce(&mut PeopleStore<SqliteBlobStore>, PersonId) -> timsrun_core::StoreResult<()>,
) -> PersonActionResponse {
    let result = parse_person_id(raw_id).and_then(|id| {
        let mut store = lock_store()?;
        f(&mut *store, id).map_err(|err| err.to_string())?;
        Ok(id)
    });
    match result {
        Ok(id) => PersonActionResponse::success(success_message, id),
        Err(err) => PersonActionResponse::failure(format!("{operation} failed: {err}")),
    }
}

fn parse_person_id(raw: &str) -> Result<PersonId, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid person id `{raw}`"))
}

fn option_item(tag: &str, title: &str) -> OptionItem {
    OptionItem {
        tag: tag.to_string(),
        title: title.to_string(),
    }
}

fn to_person_item(person: &Person) -> PersonItem {
    PersonItem {
        person_id: person.id.to_string(),
        name: person.name.clone(),
        usual: person.usual.as_ref().map(to_order_item),
        subtitle: usual_line(person),
    }
}

fn to_order_item(order: &Order) -> OrderItem {
    OrderItem {
        order_id: order.id.to_string(),
        drink_name: order.drink_name.clone(),
        size: order.size.as_tag().to_string(),
        blend: order.blend.map(|blend| blend.as_tag().to_string()),
        preset: order.preset.as_tag().to_string(),
        cream: order.cream,
        milk: order.milk,
        milk_type: order.milk_type.as_tag().to_string(),
        sugar: order.sugar,
        sweetener: order.sweetener,
        espresso_shots: order.espresso_shots,
        notes: order.notes.clone(),
    }
}

fn from_order_item(item: &OrderItem) -> Result<Order, String> {
    let id = Uuid::parse_str(item.order_id.trim())
        .map_err(|_| format!("invalid order id `{}`", item.order_id))?;
    let size = Size::from_tag(&item.size).ok_or_else(|| format!("unknown size `{}`", item.size))?;
    let blend = match item.blend.as_deref() {
        Some(tag) => {
            Some(CoffeeBlend::from_tag(tag).ok_or_else(|| format!("unknown blend `{tag}`"))?)
        }
        None => None,
    };
    let preset = CoffeePreset::from_tag(&item.preset)
        .ok_or_else(|| format!("unknown preset `{}`", item.preset))?;
    let milk_type = MilkType::from_tag(&item.milk_type)
        .ok_or_else(|| format!("unknown milk type `{}`", item.milk_type))?;

    Ok(Order {
        id,
        drink_name: item.drink_name.clone(),
        size,
        blend,
        preset,
        cream: item.cream,
        milk: item.milk,
        milk_type,
        sugar: item.sugar,
        sweetener: item.sweetener,
        espresso_shots: item.espresso_shots,
        notes: item.notes.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, init_store, order_apply_preset, order_new, order_options,
        order_summary, people_list, person_clear_usual, person_create, person_delete,
        person_rename, person_set_usual, ping, run_summary,
    };
    use std::sync::Once;

    static STORE_INIT: Once = Once::new();

    // The store is process-wide, so every test shares one data directory.
    fn ensure_store() {
        STORE_INIT.call_once(|| {
            let dir = tempfile::tempdir().expect("temp dir").keep();
            let error = init_store(dir.to_string_lossy().into_owned());
            assert!(error.is_empty(), "{error}");
        });
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        assert!(!init_logging("verbose".to_string(), "tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn person_create_rejects_blank_name() {
        let response = person_create("   ".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("empty"));
    }

    #[test]
    fn created_person_round_trips_through_usual_edits() {
        ensure_store();
        let created = person_create("  Riley ".to_string());
        assert!(created.ok, "{}", created.message);
        let id = created.person_id.expect("created person should return id");

        let mut order = order_new(Some(id.clone()));
        order = order_apply_preset(order, "doubleDouble".to_string());
        assert_eq!((order.cream, order.sugar), (2, 2));
        order.size = "large".to_string();
        let saved = person_set_usual(id.clone(), order.clone());
        assert!(saved.ok, "{}", saved.message);

        let row = people_list()
            .into_iter()
            .find(|person| person.person_id == id)
            .expect("person should be listed");
        assert_eq!(row.name, "Riley");
        assert_eq!(row.usual, Some(order));
        assert_eq!(row.subtitle, "large regular blend coffee, — double double");

        assert!(person_rename(id.clone(), "Riles".to_string()).ok);
        assert!(person_clear_usual(id.clone()).ok);
        let row = people_list()
            .into_iter()
            .find(|person| person.person_id == id)
            .expect("person should be listed");
        assert_eq!(row.name, "Riles");
        assert_eq!(row.subtitle, "No usual saved");

        assert_eq!(run_summary(vec![id.clone()]), vec!["• Riles: (no usual saved)"]);

        assert!(person_delete(id.clone()).ok);
        assert!(!person_delete(id.clone()).ok);
        assert!(people_list().iter().all(|person| person.person_id != id));
    }

    #[test]
    fn copied_usual_cannot_be_committed_to_another_person() {
        ensure_store();
        let first = person_create("Owner".to_string()).person_id.expect("id");
        let second = person_create("Borrower".to_string()).person_id.expect("id");
        let order = order_new(None);
        assert!(person_set_usual(first.clone(), order).ok);

        let copied = order_new(Some(first));
        let response = person_set_usual(second.clone(), copied);
        assert!(!response.ok);
        assert!(response.message.contains("order id"), "{}", response.message);
        let row = people_list()
            .into_iter()
            .find(|person| person.person_id == second)
            .expect("person should be listed");
        assert_eq!(row.usual, None);
    }

    #[test]
    fn set_usual_rejects_unknown_tags() {
        ensure_store();
        let id = person_create("Tag Tester".to_string())
            .person_id
            .expect("created person should return id");
        let mut order = order_new(None);
        order.milk_type = "goat".to_string();

        let response = person_set_usual(id, order);
        assert!(!response.ok);
        assert!(response.message.contains("goat"));
    }

    #[test]
    fn malformed_person_id_fails_cleanly() {
        ensure_store();
        let response = person_rename("not-a-uuid".to_string(), "Name".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("invalid person id"));
    }

    #[test]
    fn order_summary_renders_non_coffee() {
        let mut order = order_new(None);
        order.drink_name = "Tea".to_string();
        order.size = "large".to_string();
        order.milk = 1;
        order.milk_type = "oat".to_string();

        assert_eq!(order_summary(order), "large Tea, 1x oat");
    }

    #[test]
    fn unknown_preset_leaves_order_unchanged() {
        let order = order_new(None);
        assert_eq!(order_apply_preset(order.clone(), "quad".to_string()), order);
    }

    #[test]
    fn order_options_expose_static_lists() {
        let options = order_options();
        assert_eq!(options.drinks.first().map(String::as_str), Some("Coffee"));
        let sizes: Vec<&str> = options.sizes.iter().map(|s| s.tag.as_str()).collect();
        assert_eq!(sizes, vec!["small", "medium", "large", "extraLarge"]);
        assert_eq!(options.presets.last().map(|p| p.title.as_str()), Some("custom"));
        assert_eq!(options.max_addition_count, 4);
        assert_eq!(options.max_espresso_shots, 3);
    }
}
