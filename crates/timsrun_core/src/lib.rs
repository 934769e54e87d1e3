//! Core domain logic for TimsRun.
//! This crate is the single source of truth for orders, people and the
//! persisted team roster; UI layers only call into it.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod preset;
pub mod repo;
pub mod service;
pub mod summary;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, init_logging_with, logging_status};
pub use model::order::{
    CoffeeBlend, CoffeePreset, CountField, MilkType, Order, OrderId, OrderValidationError, Size,
    BASE_DRINKS, COFFEE, MAX_ADDITION_COUNT, MAX_ESPRESSO_SHOTS,
};
pub use model::person::{Person, PersonId};
pub use preset::{apply_preset, preset_counts, PresetCounts};
pub use repo::blob_repo::{BlobError, BlobResult, BlobStore, MemoryBlobStore, SqliteBlobStore};
pub use service::people_codec::{decode_people, encode_people, CodecError, PEOPLE_KEY};
pub use service::people_store::{PeopleStore, StoreError, StoreResult};
pub use summary::{render_order, run_lines, usual_line, RunSelection};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
