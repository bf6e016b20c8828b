//! Business-metric aggregation and risk advice on top of model outputs.

pub mod otif;
pub mod risk;

pub use otif::{DateWindow, OtifCalculator};
pub use risk::{assess, RiskAssessment, RiskInputs, RiskThresholds, RiskTier};
