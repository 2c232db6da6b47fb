//! Product category.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::shared::ValidationError;

/// The fixed set of product categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    /// Clothing and accessories.
    Fashion,
    /// Cosmetics.
    Beauty,
    /// Sporting goods.
    Sports,
    /// Consumer electronics.
    Electronics,
    /// Furniture and decoration.
    HomeInterior,
    /// Everyday household consumables.
    HouseholdSupplies,
    /// Cookware and utensils.
    Kitchenware,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Fashion,
        Self::Beauty,
        Self::Sports,
        Self::Electronics,
        Self::HomeInterior,
        Self::HouseholdSupplies,
        Self::Kitchenware,
    ];

    /// Wire/storage name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fashion => "FASHION",
            Self::Beauty => "BEAUTY",
            Self::Sports => "SPORTS",
            Self::Electronics => "ELECTRONICS",
            Self::HomeInterior => "HOME_INTERIOR",
            Self::HouseholdSupplies => "HOUSEHOLD_SUPPLIES",
            Self::Kitchenware => "KITCHENWARE",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                ValidationError::new("category", format!("unknown category '{s}'"))
            })
    }
}
