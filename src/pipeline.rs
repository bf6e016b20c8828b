//! End-to-end orchestration: generation → features → training → serving.
//!
//! Each stage consumes the previous stage's output as an immutable value;
//! there is no shared mutable state between training and inference paths.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analytics::{assess, OtifCalculator, RiskInputs, RiskTier};
use crate::config::PipelineConfig;
use crate::errors::ServiceError;
use crate::features::{FeatureBuilder, FeatureSet, PoRequest};
use crate::ml::{
    holdout_split, ClassificationReport, LatenessClassifier, LeadTimeRegressor, RegressionReport,
};
use crate::models::{Category, Region};
use crate::synth::{generate_dataset, Dataset};

/// The prediction contract the dashboard layer consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub predicted_lead_time_days: f64,
    pub predicted_late_probability: f64,
    pub predicted_late: bool,
    pub risk_tier: RiskTier,
    pub recommendation: String,
}

/// Evaluation summary of one training run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub suppliers: usize,
    pub purchase_orders: usize,
    pub regression: RegressionReport,
    pub classification: ClassificationReport,
}

/// A fully trained pipeline ready to serve per-PO predictions.
pub struct TrainedPipeline {
    config: PipelineConfig,
    dataset: Dataset,
    features: FeatureSet,
    regressor: LeadTimeRegressor,
    classifier: LatenessClassifier,
}

impl TrainedPipeline {
    /// Runs every batch stage: validate config, generate the dataset, build
    /// the feature table, train and evaluate both models.
    pub fn train(config: PipelineConfig) -> Result<Self, ServiceError> {
        config.validate_all()?;

        let dataset = generate_dataset(&config.generation)?;
        let split = holdout_split(
            dataset.purchase_orders.len(),
            config.model.test_fraction,
            config.generation.seed,
        )?;
        let features = FeatureBuilder::build(&dataset, &split, &config.cold_start, &config.model)?;
        let regressor = LeadTimeRegressor::train(&features, &split, &config.model)?;
        let classifier = LatenessClassifier::train(&features, &split, &config.model)?;

        info!(
            suppliers = dataset.suppliers.len(),
            purchase_orders = dataset.purchase_orders.len(),
            "pipeline trained"
        );
        Ok(Self {
            config,
            dataset,
            features,
            regressor,
            classifier,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn otif(&self) -> OtifCalculator<'_> {
        OtifCalculator::new(&self.dataset)
    }

    pub fn summary(&self) -> TrainingSummary {
        TrainingSummary {
            suppliers: self.dataset.suppliers.len(),
            purchase_orders: self.dataset.purchase_orders.len(),
            regression: self.regressor.report,
            classification: self.classifier.report,
        }
    }

    /// Predicts lead time, lateness probability, and risk for a PO placed
    /// with a supplier from the training population.
    pub fn predict(&self, request: &PoRequest) -> Result<Prediction, ServiceError> {
        let supplier = self.dataset.supplier(&request.supplier_id)?;
        self.predict_inner(request, supplier.category, supplier.region, supplier.base_price)
    }

    /// Predicts for a PO with a supplier outside the training population.
    /// `category`/`region` arrive as raw strings; values the model never saw
    /// are rejected rather than silently zero-encoded.
    pub fn predict_new_supplier(
        &self,
        request: &PoRequest,
        category: &str,
        region: &str,
        base_price: f64,
    ) -> Result<Prediction, ServiceError> {
        let category = Category::from_str(category)
            .map_err(|_| ServiceError::UnknownCategory(category.to_string()))?;
        let region = Region::from_str(region)
            .map_err(|_| ServiceError::UnknownRegion(region.to_string()))?;
        self.predict_inner(request, category, region, base_price)
    }

    fn predict_inner(
        &self,
        request: &PoRequest,
        category: Category,
        region: Region,
        base_price: f64,
    ) -> Result<Prediction, ServiceError> {
        let row = self
            .features
            .featurize_request(request, category, region, base_price)?;

        let predicted_lead_time_days = self.regressor.predict(&row);
        let predicted_late_probability = self.classifier.predict_proba(&row);
        let predicted_late = self.classifier.predict(&row);

        let snapshot = self
            .features
            .history
            .stats_full(&request.supplier_id, &self.features.cold_start);
        let quoted = (request.expected_delivery_date - request.order_date).num_days();
        let assessment = assess(
            RiskInputs {
                late_probability: predicted_late_probability,
                predicted_lead_time_days,
                quoted_lead_time_days: quoted,
                supplier_late_rate: snapshot.late_rate,
            },
            &self.config.risk,
        );

        Ok(Prediction {
            predicted_lead_time_days,
            predicted_late_probability,
            predicted_late,
            risk_tier: assessment.tier,
            recommendation: assessment.recommendation,
        })
    }
}
