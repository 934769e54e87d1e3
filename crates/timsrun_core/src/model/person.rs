//! Team member record.

use crate::model::order::Order;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a person.
pub type PersonId = Uuid;

/// One team member and their optional standing order.
///
/// `name` is expected to be non-empty; callers check that before creating or
/// renaming. `usual` is replaced wholesale, never merged field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usual: Option<Order>,
}

impl Person {
    /// Creates a person with a fresh ID and no usual order.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name)
    }

    /// Creates a person with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists.
    pub fn with_id(id: PersonId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            usual: None,
        }
    }

    pub fn has_usual(&self) -> bool {
        self.usual.is_some()
    }
}
