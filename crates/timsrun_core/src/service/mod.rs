//! Core use-case services.
//!
//! # Responsibility
//! - Own the people collection and its persisted snapshot.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod people_codec;
pub mod people_store;
