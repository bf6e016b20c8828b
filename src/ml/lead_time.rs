use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ModelConfig;
use crate::errors::ServiceError;
use crate::features::FeatureSet;
use crate::ml::linear::RidgeRegression;
use crate::ml::{metrics, Split};

/// Held-out evaluation of the winning regressor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionReport {
    pub rmse: f64,
    pub mae: f64,
    pub lambda: f64,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// Predicts continuous lead time in days. The ridge strength is chosen from
/// the configured grid by held-out RMSE; the best-performing configuration
/// is the one kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadTimeRegressor {
    model: RidgeRegression,
    pub report: RegressionReport,
}

impl LeadTimeRegressor {
    pub fn train(
        features: &FeatureSet,
        split: &Split,
        cfg: &ModelConfig,
    ) -> Result<Self, ServiceError> {
        let train_rows: Vec<&Vec<f64>> =
            split.train.iter().map(|&i| &features.rows[i].values).collect();
        let train_targets: Vec<f64> = split
            .train
            .iter()
            .map(|&i| features.rows[i].lead_time_label)
            .collect();
        let test_rows: Vec<&Vec<f64>> =
            split.test.iter().map(|&i| &features.rows[i].values).collect();
        let test_targets: Vec<f64> = split
            .test
            .iter()
            .map(|&i| features.rows[i].lead_time_label)
            .collect();

        let mut best: Option<(RidgeRegression, RegressionReport)> = None;
        for &lambda in &cfg.ridge_grid {
            let model = RidgeRegression::fit(
                &train_rows,
                &train_targets,
                cfg.learning_rate,
                cfg.epochs,
                lambda,
            )?;
            let predictions: Vec<f64> = test_rows.iter().map(|r| model.predict(r)).collect();
            let report = RegressionReport {
                rmse: metrics::rmse(&predictions, &test_targets),
                mae: metrics::mae(&predictions, &test_targets),
                lambda,
                train_rows: train_rows.len(),
                test_rows: test_rows.len(),
            };
            let better = match &best {
                Some((_, current)) => report.rmse < current.rmse,
                None => true,
            };
            if better {
                best = Some((model, report));
            }
        }

        let (model, report) =
            best.ok_or_else(|| ServiceError::Model("empty ridge grid".to_string()))?;
        info!(
            rmse = report.rmse,
            mae = report.mae,
            lambda = report.lambda,
            "lead-time regressor selected"
        );
        Ok(Self { model, report })
    }

    /// Predicted lead time in days, never negative.
    pub fn predict(&self, row: &[f64]) -> f64 {
        self.model.predict(row).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColdStartDefaults, GenerationConfig};
    use crate::features::FeatureBuilder;
    use crate::ml::holdout_split;
    use crate::synth::generate_dataset;

    fn trained() -> (FeatureSet, LeadTimeRegressor) {
        let gen_cfg = GenerationConfig {
            supplier_count: 60,
            po_count: 1_500,
            ..GenerationConfig::default()
        };
        let model_cfg = ModelConfig::default();
        let dataset = generate_dataset(&gen_cfg).unwrap();
        let split = holdout_split(
            dataset.purchase_orders.len(),
            model_cfg.test_fraction,
            gen_cfg.seed,
        )
        .unwrap();
        let features =
            FeatureBuilder::build(&dataset, &split, &ColdStartDefaults::default(), &model_cfg)
                .unwrap();
        let model = LeadTimeRegressor::train(&features, &split, &model_cfg).unwrap();
        (features, model)
    }

    #[test]
    fn beats_a_constant_mean_baseline() {
        let (features, model) = trained();
        let targets: Vec<f64> = features.rows.iter().map(|r| r.lead_time_label).collect();
        let mean = targets.iter().sum::<f64>() / targets.len() as f64;
        let baseline_rmse =
            metrics::rmse(&vec![mean; targets.len()], &targets);
        assert!(
            model.report.rmse < baseline_rmse,
            "model rmse {} should beat constant baseline {}",
            model.report.rmse,
            baseline_rmse
        );
    }

    #[test]
    fn predictions_are_non_negative() {
        let (features, model) = trained();
        for row in features.rows.iter().take(100) {
            assert!(model.predict(&row.values) >= 0.0);
        }
    }
}
