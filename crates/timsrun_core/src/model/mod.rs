//! Domain model for team members and their standing drink orders.
//!
//! # Responsibility
//! - Define the `Person` and `Order` value types shared by every core layer.
//! - Own the static option lists the editor offers for each enumerated field.
//!
//! # Invariants
//! - Every record is identified by a stable UUID that survives encode/decode.
//! - Enumerated fields persist as stable string tags, never as ordinals.

pub mod order;
pub mod person;
