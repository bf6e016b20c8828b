//! Model layer: hand-rolled linear models behind the shared feature
//! contract.
//!
//! Training is batch gradient descent on z-score-standardised features.
//! Standardisation is fitted on the training split only and applied
//! identically at inference, which keeps the train/serve preprocessing
//! consistent by construction.

pub mod lateness;
pub mod lead_time;
pub mod linear;
pub mod logistic;
pub mod metrics;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

pub use lateness::{ClassificationReport, LatenessClassifier};
pub use lead_time::{LeadTimeRegressor, RegressionReport};

/// Per-column z-score standardisation fitted on training rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(rows: &[&Vec<f64>]) -> Result<Self, ServiceError> {
        let n = rows.len();
        if n == 0 {
            return Err(ServiceError::Model(
                "cannot fit a scaler on zero rows".to_string(),
            ));
        }
        let width = rows[0].len();
        let mut means = vec![0.0; width];
        for row in rows {
            for (m, v) in means.iter_mut().zip(row.iter()) {
                *m += v;
            }
        }
        for m in &mut means {
            *m /= n as f64;
        }

        let mut stds = vec![0.0; width];
        for row in rows {
            for ((s, v), m) in stds.iter_mut().zip(row.iter()).zip(means.iter()) {
                *s += (v - m).powi(2);
            }
        }
        for s in &mut stds {
            *s = (*s / n as f64).sqrt();
            // Constant columns pass through unscaled.
            if *s < 1e-12 {
                *s = 1.0;
            }
        }
        Ok(Self { means, stds })
    }

    pub fn transform_row(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.means.iter().zip(self.stds.iter()))
            .map(|(v, (m, s))| (v - m) / s)
            .collect()
    }
}

/// Deterministic held-out split of row indices.
#[derive(Debug, Clone)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

pub fn holdout_split(n: usize, test_fraction: f64, seed: u64) -> Result<Split, ServiceError> {
    if n < 2 {
        return Err(ServiceError::Model(format!(
            "need at least 2 rows to split, got {n}"
        )));
    }
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test_len = ((n as f64 * test_fraction).round() as usize).clamp(1, n - 1);
    let (test, train) = indices.split_at(test_len);
    Ok(Split {
        train: train.to_vec(),
        test: test.to_vec(),
    })
}
