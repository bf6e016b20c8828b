use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::errors::ServiceError;
use crate::models::{Category, Region};

/// Quoted lead time and noise scale for one (category, region) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub category: Category,
    pub region: Region,
    /// Business-quoted SLA in days.
    pub baseline_days: i64,
    /// Standard deviation of the lead-time residual before reliability
    /// widening is applied.
    pub noise_scale: f64,
}

/// Explicit lookup table mapping (category, region) to quoted lead time and
/// noise parameters. New categories or regions extend the table without
/// touching generation logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineTable {
    entries: Vec<Baseline>,
}

impl BaselineTable {
    pub fn new(entries: Vec<Baseline>) -> Self {
        Self { entries }
    }

    pub fn lookup(&self, category: Category, region: Region) -> Result<Baseline, ServiceError> {
        self.entries
            .iter()
            .copied()
            .find(|b| b.category == category && b.region == region)
            .ok_or_else(|| {
                ServiceError::NotFound(format!("no baseline for ({category}, {region})"))
            })
    }

    /// Every (category, region) pair must have exactly one entry.
    pub fn validate_complete(&self) -> Result<(), ServiceError> {
        for category in Category::iter() {
            for region in Region::iter() {
                let hits = self
                    .entries
                    .iter()
                    .filter(|b| b.category == category && b.region == region)
                    .count();
                if hits != 1 {
                    return Err(ServiceError::InvalidConfiguration(format!(
                        "baseline table has {hits} entries for ({category}, {region}), expected 1"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for BaselineTable {
    fn default() -> Self {
        let mut entries = Vec::new();
        for category in Category::iter() {
            for region in Region::iter() {
                // Asia quotes longer and noisier lead times; slower-moving
                // categories add a few days on top of the regional base.
                let (region_days, noise_scale) = match region {
                    Region::Asia => (12, 2.5),
                    Region::Europe => (7, 1.2),
                    Region::Americas => (9, 1.8),
                };
                let category_days = match category {
                    Category::Food => 1,
                    Category::Beverage => 0,
                    Category::Household => 2,
                    Category::PersonalCare => 3,
                };
                entries.push(Baseline {
                    category,
                    region,
                    baseline_days: region_days + category_days,
                    noise_scale,
                });
            }
        }
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_is_complete() {
        BaselineTable::default().validate_complete().unwrap();
    }

    #[test]
    fn asia_quotes_longer_than_europe_per_category() {
        let table = BaselineTable::default();
        for category in Category::iter() {
            let asia = table.lookup(category, Region::Asia).unwrap();
            let europe = table.lookup(category, Region::Europe).unwrap();
            assert!(asia.baseline_days > europe.baseline_days);
            assert!(asia.noise_scale > europe.noise_scale);
        }
    }

    #[test]
    fn missing_pair_is_reported() {
        let table = BaselineTable::new(vec![]);
        let err = table.lookup(Category::Food, Region::Asia).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert!(table.validate_complete().is_err());
    }
}
