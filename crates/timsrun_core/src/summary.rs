//! Readable order summaries for lists and take-out runs.
//!
//! # Responsibility
//! - Render one `Order` as a single comma-separated line.
//! - Build the per-person lines shown for a run selection.
//!
//! # Invariants
//! - Rendering is total and deterministic; nothing here is persisted.
//! - Coffee orders with a named preset never list cream/milk/sugar/sweetener,
//!   whatever counts are stored.

use crate::model::order::{CoffeePreset, MilkType, Order};
use crate::model::person::{Person, PersonId};
use std::collections::HashSet;

const PART_SEPARATOR: &str = ", ";
const NO_USUAL_LINE: &str = "No usual saved";
const NO_USUAL_RUN_LINE: &str = "(no usual saved)";

/// Renders `order` as a single readable line.
///
/// ```
/// use timsrun_core::{render_order, CoffeePreset, Order, Size};
///
/// let mut order = Order::new();
/// order.size = Size::Large;
/// order.preset = CoffeePreset::Regular;
/// assert_eq!(render_order(&order), "large regular blend coffee, — regular");
/// ```
pub fn render_order(order: &Order) -> String {
    let mut parts: Vec<String> = Vec::new();
    let preset_active = order.is_coffee() && order.preset != CoffeePreset::Custom;

    if order.is_coffee() {
        match order.blend {
            Some(blend) => parts.push(format!("{} {} coffee", order.size.title(), blend.title())),
            None => parts.push(format!("{} coffee", order.size.title())),
        }
        if preset_active {
            parts.push(format!("— {}", order.preset.title()));
        }
    } else {
        parts.push(format!("{} {}", order.size.title(), order.drink_name));
    }

    if !preset_active {
        if order.cream > 0 {
            parts.push(format!("{}x cream", order.cream));
        }
        if order.milk > 0 {
            let label = match order.milk_type {
                MilkType::Regular => "milk",
                other => other.title(),
            };
            parts.push(format!("{}x {label}", order.milk));
        }
        if order.sugar > 0 {
            parts.push(format!("{}x sugar", order.sugar));
        }
        if order.sweetener > 0 {
            parts.push(format!("{}x sweetener", order.sweetener));
        }
    }

    if order.espresso_shots > 0 {
        let unit = if order.espresso_shots > 1 { "shots" } else { "shot" };
        parts.push(format!("{} {unit}", order.espresso_shots));
    }

    let notes = order.notes.trim();
    if !notes.is_empty() {
        parts.push(format!("({notes})"));
    }

    parts.join(PART_SEPARATOR)
}

/// Subtitle for a person in the people list.
pub fn usual_line(person: &Person) -> String {
    person
        .usual
        .as_ref()
        .map_or_else(|| NO_USUAL_LINE.to_string(), render_order)
}

/// People picked for one take-out run.
///
/// Selection is by identity, so it survives reordering of the collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSelection {
    selected: HashSet<PersonId>,
}

impl RunSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the selection state of `id`; returns whether it is now selected.
    pub fn toggle(&mut self, id: PersonId) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    pub fn is_selected(&self, id: PersonId) -> bool {
        self.selected.contains(&id)
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected people in collection order; stale IDs are ignored.
    pub fn selected_people<'a>(&self, people: &'a [Person]) -> Vec<&'a Person> {
        people
            .iter()
            .filter(|person| self.selected.contains(&person.id))
            .collect()
    }
}

impl FromIterator<PersonId> for RunSelection {
    fn from_iter<I: IntoIterator<Item = PersonId>>(iter: I) -> Self {
        Self {
            selected: iter.into_iter().collect(),
        }
    }
}

/// Bullet lines read out when placing the run's order.
pub fn run_lines(people: &[Person], selection: &RunSelection) -> Vec<String> {
    selection
        .selected_people(people)
        .into_iter()
        .map(|person| match &person.usual {
            Some(order) => format!("• {}: {}", person.name, render_order(order)),
            None => format!("• {}: {NO_USUAL_RUN_LINE}", person.name),
        })
        .collect()
}
