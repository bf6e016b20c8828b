use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ModelConfig;
use crate::errors::ServiceError;
use crate::features::FeatureSet;
use crate::ml::logistic::LogisticRegression;
use crate::ml::{metrics, Split};

/// Held-out evaluation of the winning classifier configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub auc: f64,
    pub accuracy: f64,
    pub lambda: f64,
    pub threshold: f64,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// Predicts the probability that a PO arrives late. Regularisation strength
/// is chosen from the configured grid by held-out AUC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatenessClassifier {
    model: LogisticRegression,
    threshold: f64,
    pub report: ClassificationReport,
}

impl LatenessClassifier {
    pub fn train(
        features: &FeatureSet,
        split: &Split,
        cfg: &ModelConfig,
    ) -> Result<Self, ServiceError> {
        let train_rows: Vec<&Vec<f64>> =
            split.train.iter().map(|&i| &features.rows[i].values).collect();
        let train_labels: Vec<bool> = split
            .train
            .iter()
            .map(|&i| features.rows[i].late_label)
            .collect();
        let test_rows: Vec<&Vec<f64>> =
            split.test.iter().map(|&i| &features.rows[i].values).collect();
        let test_labels: Vec<bool> = split
            .test
            .iter()
            .map(|&i| features.rows[i].late_label)
            .collect();

        let mut best: Option<(LogisticRegression, ClassificationReport)> = None;
        for &lambda in &cfg.ridge_grid {
            let model = LogisticRegression::fit(
                &train_rows,
                &train_labels,
                cfg.learning_rate,
                cfg.epochs,
                lambda,
            )?;
            let probabilities: Vec<f64> =
                test_rows.iter().map(|r| model.predict_proba(r)).collect();
            let report = ClassificationReport {
                auc: metrics::auc(&probabilities, &test_labels)?,
                accuracy: metrics::accuracy(&probabilities, &test_labels, cfg.late_threshold),
                lambda,
                threshold: cfg.late_threshold,
                train_rows: train_rows.len(),
                test_rows: test_rows.len(),
            };
            let better = match &best {
                Some((_, current)) => report.auc > current.auc,
                None => true,
            };
            if better {
                best = Some((model, report));
            }
        }

        let (model, report) =
            best.ok_or_else(|| ServiceError::Model("empty ridge grid".to_string()))?;
        info!(
            auc = report.auc,
            accuracy = report.accuracy,
            lambda = report.lambda,
            "lateness classifier selected"
        );
        Ok(Self {
            model,
            threshold: cfg.late_threshold,
            report,
        })
    }

    /// Probability of late arrival, in [0, 1].
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        self.model.predict_proba(row)
    }

    /// Thresholded boolean verdict.
    pub fn predict(&self, row: &[f64]) -> bool {
        self.predict_proba(row) >= self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColdStartDefaults, GenerationConfig};
    use crate::features::FeatureBuilder;
    use crate::ml::holdout_split;
    use crate::synth::generate_dataset;

    #[test]
    fn ranks_late_orders_above_chance() {
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
        let model = LatenessClassifier::train(&features, &split, &model_cfg).unwrap();

        assert!(
            model.report.auc > 0.65,
            "held-out AUC {} should clearly beat chance",
            model.report.auc
        );
        for row in features.rows.iter().take(50) {
            let p = model.predict_proba(&row.values);
            assert!((0.0..=1.0).contains(&p));
            assert_eq!(model.predict(&row.values), p >= model.threshold);
        }
    }
}
