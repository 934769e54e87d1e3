//! Persistence contracts and implementations.
//!
//! # Responsibility
//! - Define the key-value blob storage contract used by the people store.
//! - Isolate SQLite details from the service layer.

pub mod blob_repo;
