//! Drink order value type.
//!
//! # Responsibility
//! - Define one drink order and its enumerated options.
//! - Provide bound-aware helpers for customization counts.
//!
//! # Invariants
//! - `id` is assigned once at creation and never changes.
//! - `cream`, `milk`, `sugar` and `sweetener` stay within `0..=4`.
//! - `espresso_shots` stays within `0..=3`.
//! - Coffee-only fields (`blend`, `preset`) matter only when
//!   `drink_name == COFFEE`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for an order.
pub type OrderId = Uuid;

/// Drink name that enables the coffee-only fields.
pub const COFFEE: &str = "Coffee";

/// Drinks offered by the order editor, in display order.
pub const BASE_DRINKS: [&str; 7] = [
    "Coffee",
    "Latte",
    "Cappuccino",
    "Iced Coffee",
    "Iced Capp",
    "Tea",
    "Other",
];

/// Upper bound for cream, milk, sugar and sweetener.
pub const MAX_ADDITION_COUNT: u8 = 4;
/// Upper bound for espresso shots.
pub const MAX_ESPRESSO_SHOTS: u8 = 3;

/// Cup size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Size {
    Small,
    Medium,
    Large,
    ExtraLarge,
}

impl Size {
    pub const ALL: [Size; 4] = [Size::Small, Size::Medium, Size::Large, Size::ExtraLarge];

    /// Human-readable label used in summaries and pickers.
    pub fn title(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::ExtraLarge => "extra large",
        }
    }

    /// Persisted tag.
    pub fn as_tag(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::ExtraLarge => "extraLarge",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.as_tag() == tag)
    }
}

/// Coffee blend, only meaningful for coffee orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CoffeeBlend {
    RegularBlend,
    DarkRoast,
    Decaf,
}

impl CoffeeBlend {
    pub const ALL: [CoffeeBlend; 3] = [
        CoffeeBlend::RegularBlend,
        CoffeeBlend::DarkRoast,
        CoffeeBlend::Decaf,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::RegularBlend => "regular blend",
            Self::DarkRoast => "dark roast",
            Self::Decaf => "decaf",
        }
    }

    pub fn as_tag(self) -> &'static str {
        match self {
            Self::RegularBlend => "regularBlend",
            Self::DarkRoast => "darkRoast",
            Self::Decaf => "decaf",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|blend| blend.as_tag() == tag)
    }
}

/// Named shortcut for common cream/sugar combinations.
///
/// `Custom` means the counts are controlled manually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CoffeePreset {
    Black,
    Regular,
    DoubleDouble,
    TripleTriple,
    #[default]
    Custom,
}

impl CoffeePreset {
    pub const ALL: [CoffeePreset; 5] = [
        CoffeePreset::Black,
        CoffeePreset::Regular,
        CoffeePreset::DoubleDouble,
        CoffeePreset::TripleTriple,
        CoffeePreset::Custom,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::Regular => "regular",
            Self::DoubleDouble => "double double",
            Self::TripleTriple => "triple triple",
            Self::Custom => "custom",
        }
    }

    pub fn as_tag(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::Regular => "regular",
            Self::DoubleDouble => "doubleDouble",
            Self::TripleTriple => "tripleTriple",
            Self::Custom => "custom",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.as_tag() == tag)
    }
}

/// Milk variant, relevant only when `milk > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MilkType {
    #[default]
    Regular,
    Oat,
    Almond,
    Soy,
}

impl MilkType {
    pub const ALL: [MilkType; 4] = [
        MilkType::Regular,
        MilkType::Oat,
        MilkType::Almond,
        MilkType::Soy,
    ];

    /// The label is the raw tag; summaries print `2x oat`, not a prettier form.
    pub fn title(self) -> &'static str {
        self.as_tag()
    }

    pub fn as_tag(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Oat => "oat",
            Self::Almond => "almond",
            Self::Soy => "soy",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|milk| milk.as_tag() == tag)
    }
}

/// Customization counters the editor exposes as steppers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountField {
    Cream,
    Milk,
    Sugar,
    Sweetener,
    EspressoShots,
}

impl CountField {
    pub const ALL: [CountField; 5] = [
        CountField::Cream,
        CountField::Milk,
        CountField::Sugar,
        CountField::Sweetener,
        CountField::EspressoShots,
    ];

    /// Inclusive upper bound for this counter.
    pub fn max(self) -> u8 {
        match self {
            Self::EspressoShots => MAX_ESPRESSO_SHOTS,
            _ => MAX_ADDITION_COUNT,
        }
    }

    /// Wire name of the counter, also used in validation messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Cream => "cream",
            Self::Milk => "milk",
            Self::Sugar => "sugar",
            Self::Sweetener => "sweetener",
            Self::EspressoShots => "espressoShots",
        }
    }
}

/// Order validation error for out-of-range counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderValidationError {
    CountOutOfRange {
        field: CountField,
        value: u8,
        max: u8,
    },
}

impl Display for OrderValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CountOutOfRange { field, value, max } => write!(
                f,
                "{} ({value}) must be within 0..={max}",
                field.name()
            ),
        }
    }
}

impl Error for OrderValidationError {}

/// One drink order.
///
/// Wire names follow the records the original app wrote to disk, so
/// `blend`/`preset` persist as `coffeeBlend`/`coffeePreset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub drink_name: String,
    pub size: Size,
    #[serde(
        rename = "coffeeBlend",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub blend: Option<CoffeeBlend>,
    #[serde(rename = "coffeePreset")]
    pub preset: CoffeePreset,
    pub cream: u8,
    pub milk: u8,
    pub milk_type: MilkType,
    pub sugar: u8,
    pub sweetener: u8,
    pub espresso_shots: u8,
    pub notes: String,
}

impl Default for Order {
    fn default() -> Self {
        Self::new()
    }
}

impl Order {
    /// Creates a medium regular-blend coffee with a fresh ID and no additions.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    /// Creates a default order with a caller-provided stable ID.
    pub fn with_id(id: OrderId) -> Self {
        Self {
            id,
            drink_name: COFFEE.to_string(),
            size: Size::Medium,
            blend: Some(CoffeeBlend::RegularBlend),
            preset: CoffeePreset::Custom,
            cream: 0,
            milk: 0,
            milk_type: MilkType::Regular,
            sugar: 0,
            sweetener: 0,
            espresso_shots: 0,
            notes: String::new(),
        }
    }

    /// Returns whether the coffee-only fields apply.
    pub fn is_coffee(&self) -> bool {
        self.drink_name == COFFEE
    }

    pub fn count(&self, field: CountField) -> u8 {
        match field {
            CountField::Cream => self.cream,
            CountField::Milk => self.milk,
            CountField::Sugar => self.sugar,
            CountField::Sweetener => self.sweetener,
            CountField::EspressoShots => self.espresso_shots,
        }
    }

    fn count_mut(&mut self, field: CountField) -> &mut u8 {
        match field {
            CountField::Cream => &mut self.cream,
            CountField::Milk => &mut self.milk,
            CountField::Sugar => &mut self.sugar,
            CountField::Sweetener => &mut self.sweetener,
            CountField::EspressoShots => &mut self.espresso_shots,
        }
    }

    /// Increments a counter, saturating at the field maximum.
    ///
    /// Returns the resulting value. Never touches `preset`.
    pub fn step_up(&mut self, field: CountField) -> u8 {
        let slot = self.count_mut(field);
        if *slot < field.max() {
            *slot += 1;
        }
        *slot
    }

    /// Decrements a counter, saturating at zero.
    pub fn step_down(&mut self, field: CountField) -> u8 {
        let slot = self.count_mut(field);
        *slot = slot.saturating_sub(1);
        *slot
    }

    /// Checks every counter against its bound.
    ///
    /// # Errors
    /// - Returns the first counter found above its maximum.
    pub fn validate(&self) -> Result<(), OrderValidationError> {
        for field in CountField::ALL {
            let value = self.count(field);
            if value > field.max() {
                return Err(OrderValidationError::CountOutOfRange {
                    field,
                    value,
                    max: field.max(),
                });
            }
        }
        Ok(())
    }

    /// Returns a copy with every counter clamped into its bound.
    pub fn clamped(&self) -> Self {
        let mut order = self.clone();
        for field in CountField::ALL {
            let slot = order.count_mut(field);
            *slot = (*slot).min(field.max());
        }
        order
    }
}
