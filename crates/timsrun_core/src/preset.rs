//! Preset-to-customization resolution.
//!
//! # Responsibility
//! - Map a coffee preset to the cream/sugar counts it stands for.
//! - Apply that mapping once, when the preset is explicitly changed.
//!
//! # Invariants
//! - Only `preset`, `cream` and `sugar` are ever written.
//! - `CoffeePreset::Custom` leaves the counts untouched.
//! - Re-selecting the current preset is not a change and writes nothing.
//! - There is no reverse rule: editing counts never changes the preset.

use crate::model::order::{CoffeePreset, Order};

/// Cream/sugar pair a preset resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetCounts {
    pub cream: u8,
    pub sugar: u8,
}

/// Returns the counts for a preset, or `None` for `Custom`.
pub fn preset_counts(preset: CoffeePreset) -> Option<PresetCounts> {
    let level = match preset {
        CoffeePreset::Black => 0,
        CoffeePreset::Regular => 1,
        CoffeePreset::DoubleDouble => 2,
        CoffeePreset::TripleTriple => 3,
        CoffeePreset::Custom => return None,
    };
    Some(PresetCounts {
        cream: level,
        sugar: level,
    })
}

/// Selects `preset` on `order` and fills in its cream/sugar counts.
///
/// Does nothing when `preset` is already selected, so counts edited by hand
/// under that preset are kept.
pub fn apply_preset(order: &mut Order, preset: CoffeePreset) {
    if order.preset == preset {
        return;
    }
    order.preset = preset;
    if let Some(counts) = preset_counts(preset) {
        order.cream = counts.cream;
        order.sugar = counts.sugar;
    }
}
