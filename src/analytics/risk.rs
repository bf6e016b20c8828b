use serde::{Deserialize, Serialize};
use strum::Display;
use validator::Validate;

/// Ordered delivery-risk tier for a purchase order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display)]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Critical,
}

/// Configurable probability cut-offs between tiers.
///
/// A PO lands in the first tier whose cut-off its late probability stays
/// under; `critical_late_rate` additionally escalates High to Critical when
/// the supplier's own history confirms the model's pessimism.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct RiskThresholds {
    #[validate(range(min = 0.0, max = 1.0))]
    pub medium: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub high: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub critical: f64,
    /// Historical late rate above which a critical-probability PO escalates.
    #[validate(range(min = 0.0, max = 1.0))]
    pub critical_late_rate: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            medium: 0.4,
            high: 0.7,
            critical: 0.85,
            critical_late_rate: 0.5,
        }
    }
}

impl RiskThresholds {
    pub fn ordered(&self) -> bool {
        self.medium < self.high && self.high < self.critical
    }
}

/// Inputs the recommender consumes; all are observable at decision time.
#[derive(Debug, Clone, Copy)]
pub struct RiskInputs {
    pub late_probability: f64,
    pub predicted_lead_time_days: f64,
    pub quoted_lead_time_days: i64,
    pub supplier_late_rate: f64,
}

/// Tier plus the action text the dashboard surfaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub tier: RiskTier,
    pub recommendation: String,
}

/// Maps model outputs and supplier history onto a risk tier. Pure function.
pub fn assess(inputs: RiskInputs, thresholds: &RiskThresholds) -> RiskAssessment {
    let p = inputs.late_probability.clamp(0.0, 1.0);
    let tier = if p >= thresholds.critical && inputs.supplier_late_rate >= thresholds.critical_late_rate
    {
        RiskTier::Critical
    } else if p >= thresholds.high {
        RiskTier::High
    } else if p >= thresholds.medium {
        RiskTier::Medium
    } else {
        RiskTier::Low
    };

    let overrun_days = inputs.predicted_lead_time_days - inputs.quoted_lead_time_days as f64;
    let recommendation = match tier {
        RiskTier::Low => "Low risk. Proceed with the PO as planned.".to_string(),
        RiskTier::Medium => {
            "Moderate risk. Schedule proactive follow-up with the supplier.".to_string()
        }
        RiskTier::High => format!(
            "High risk of late delivery (predicted overrun {overrun_days:+.1} days). \
             Consider an alternative supplier or additional safety stock."
        ),
        RiskTier::Critical => format!(
            "Critical: supplier is late on {:.0}% of orders and this PO is likely late too. \
             Escalate to procurement and dual-source immediately.",
            inputs.supplier_late_rate * 100.0
        ),
    };

    RiskAssessment {
        tier,
        recommendation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn inputs(p: f64, late_rate: f64) -> RiskInputs {
        RiskInputs {
            late_probability: p,
            predicted_lead_time_days: 12.0,
            quoted_lead_time_days: 10,
            supplier_late_rate: late_rate,
        }
    }

    #[test_case(0.1, 0.1, RiskTier::Low; "well under the medium cut-off")]
    #[test_case(0.4, 0.1, RiskTier::Medium; "exactly at the medium cut-off")]
    #[test_case(0.7, 0.1, RiskTier::High; "exactly at the high cut-off")]
    // High probability alone is not critical without history backing it.
    #[test_case(0.9, 0.1, RiskTier::High; "critical probability but clean history")]
    #[test_case(0.9, 0.6, RiskTier::Critical; "critical probability and bad history")]
    fn tiers_follow_threshold_boundaries(p: f64, late_rate: f64, expected: RiskTier) {
        let t = RiskThresholds::default();
        assert_eq!(assess(inputs(p, late_rate), &t).tier, expected);
    }

    #[test]
    fn tiers_are_ordered() {
        assert!(RiskTier::Low < RiskTier::Medium);
        assert!(RiskTier::Medium < RiskTier::High);
        assert!(RiskTier::High < RiskTier::Critical);
    }

    #[test]
    fn custom_thresholds_shift_boundaries() {
        let t = RiskThresholds {
            medium: 0.2,
            high: 0.5,
            critical: 0.8,
            critical_late_rate: 0.3,
        };
        assert!(t.ordered());
        assert_eq!(assess(inputs(0.25, 0.0), &t).tier, RiskTier::Medium);
        assert_eq!(assess(inputs(0.55, 0.0), &t).tier, RiskTier::High);
    }

    #[test]
    fn recommendation_text_mentions_overrun_for_high_risk() {
        let t = RiskThresholds::default();
        let assessment = assess(inputs(0.75, 0.2), &t);
        assert!(assessment.recommendation.contains("safety stock"));
    }
}
