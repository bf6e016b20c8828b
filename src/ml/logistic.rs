use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;
use crate::ml::StandardScaler;

/// L2-regularised logistic regression trained by batch gradient descent on
/// standardised features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    scaler: StandardScaler,
    weights: Vec<f64>,
    bias: f64,
    pub lambda: f64,
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl LogisticRegression {
    pub fn fit(
        rows: &[&Vec<f64>],
        labels: &[bool],
        learning_rate: f64,
        epochs: u32,
        lambda: f64,
    ) -> Result<Self, ServiceError> {
        if rows.len() != labels.len() {
            return Err(ServiceError::Model(format!(
                "feature/label length mismatch: {} vs {}",
                rows.len(),
                labels.len()
            )));
        }
        let scaler = StandardScaler::fit(rows)?;
        let x: Vec<Vec<f64>> = rows.iter().map(|r| scaler.transform_row(r)).collect();
        let y: Vec<f64> = labels.iter().map(|l| if *l { 1.0 } else { 0.0 }).collect();
        let n = x.len() as f64;
        let width = x[0].len();

        let mut weights = vec![0.0; width];
        let mut bias = 0.0;

        for _ in 0..epochs {
            let mut grad_w = vec![0.0; width];
            let mut grad_b = 0.0;
            for (row, target) in x.iter().zip(&y) {
                let p = sigmoid(score(row, &weights, bias));
                let residual = p - target;
                for (g, v) in grad_w.iter_mut().zip(row.iter()) {
                    *g += residual * v;
                }
                grad_b += residual;
            }
            for (w, g) in weights.iter_mut().zip(grad_w.iter()) {
                *w -= learning_rate * (g / n + lambda * *w / n);
            }
            bias -= learning_rate * grad_b / n;
        }

        if weights.iter().any(|w| !w.is_finite()) || !bias.is_finite() {
            return Err(ServiceError::Model(
                "classifier diverged; lower the learning rate".to_string(),
            ));
        }
        Ok(Self {
            scaler,
            weights,
            bias,
            lambda,
        })
    }

    /// Probability of the positive (late) class, in [0, 1].
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        sigmoid(score(
            &self.scaler.transform_row(row),
            &self.weights,
            self.bias,
        ))
    }
}

fn score(row: &[f64], weights: &[f64], bias: f64) -> f64 {
    bias + row.iter().zip(weights).map(|(v, w)| v * w).sum::<f64>()
}
