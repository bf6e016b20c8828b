use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumIter, EnumString};
use validator::Validate;

/// Product category a supplier trades in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
pub enum Category {
    Food,
    Beverage,
    Household,
    #[strum(serialize = "Personal Care")]
    #[serde(rename = "Personal Care")]
    PersonalCare,
}

/// Sourcing region a supplier ships from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
pub enum Region {
    Asia,
    Europe,
    Americas,
}

/// Supplier master record.
///
/// `reliability` is a latent trait sampled once at generation time: it
/// parameterises the lead-time noise of every purchase order the supplier
/// receives, but is never exposed to the predictive models. Two POs from
/// the same supplier draw independent noise with the same bias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Supplier {
    pub id: String,

    /// Cosmetic display name, no semantic effect.
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    pub category: Category,
    pub region: Region,

    /// Unit price band midpoint for the supplier's category.
    #[validate(range(min = 0.01))]
    pub base_price: f64,

    /// Latent delivery reliability in [0, 1]. Immutable for the supplier's
    /// lifetime.
    #[validate(range(min = 0.0, max = 1.0))]
    pub reliability: f64,
}

impl fmt::Display for Supplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}/{})",
            self.id, self.name, self.category, self.region
        )
    }
}
