use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;
use crate::ml::StandardScaler;

/// Linear model with an L2 penalty, trained by batch gradient descent on
/// standardised features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RidgeRegression {
    scaler: StandardScaler,
    weights: Vec<f64>,
    bias: f64,
    pub lambda: f64,
}

impl RidgeRegression {
    pub fn fit(
        rows: &[&Vec<f64>],
        targets: &[f64],
        learning_rate: f64,
        epochs: u32,
        lambda: f64,
    ) -> Result<Self, ServiceError> {
        if rows.len() != targets.len() {
            return Err(ServiceError::Model(format!(
                "feature/target length mismatch: {} vs {}",
                rows.len(),
                targets.len()
            )));
        }
        let scaler = StandardScaler::fit(rows)?;
        let x: Vec<Vec<f64>> = rows.iter().map(|r| scaler.transform_row(r)).collect();
        let n = x.len() as f64;
        let width = x[0].len();

        let mut weights = vec![0.0; width];
        let mut bias = targets.iter().sum::<f64>() / n;

        for _ in 0..epochs {
            let mut grad_w = vec![0.0; width];
            let mut grad_b = 0.0;
            for (row, target) in x.iter().zip(targets) {
                let residual = predict_scaled(row, &weights, bias) - target;
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
                "regression diverged; lower the learning rate".to_string(),
            ));
        }
        Ok(Self {
            scaler,
            weights,
            bias,
            lambda,
        })
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        predict_scaled(&self.scaler.transform_row(row), &self.weights, self.bias)
    }
}

fn predict_scaled(row: &[f64], weights: &[f64], bias: f64) -> f64 {
    bias + row.iter().zip(weights).map(|(v, w)| v * w).sum::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_a_noiseless_linear_relationship() {
        // y = 2x + 1 over x in 0..20
        let rows_data: Vec<Vec<f64>> = (0..20).map(|i| vec![f64::from(i)]).collect();
        let rows: Vec<&Vec<f64>> = rows_data.iter().collect();
        let targets: Vec<f64> = (0..20).map(|i| 2.0 * f64::from(i) + 1.0).collect();

        let model = RidgeRegression::fit(&rows, &targets, 0.1, 2_000, 0.0).unwrap();
        for (row, target) in rows_data.iter().zip(&targets) {
            assert!((model.predict(row) - target).abs() < 0.1);
        }
    }

    #[test]
    fn ridge_penalty_shrinks_weights() {
        let rows_data: Vec<Vec<f64>> = (0..30).map(|i| vec![f64::from(i)]).collect();
        let rows: Vec<&Vec<f64>> = rows_data.iter().collect();
        let targets: Vec<f64> = (0..30).map(|i| 3.0 * f64::from(i)).collect();

        let free = RidgeRegression::fit(&rows, &targets, 0.1, 1_000, 0.0).unwrap();
        let shrunk = RidgeRegression::fit(&rows, &targets, 0.1, 1_000, 50.0).unwrap();
        let spread =
            |m: &RidgeRegression| m.predict(&[29.0]) - m.predict(&[0.0]);
        assert!(spread(&shrunk).abs() < spread(&free).abs());
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let rows_data = vec![vec![1.0], vec![2.0]];
        let rows: Vec<&Vec<f64>> = rows_data.iter().collect();
        assert!(RidgeRegression::fit(&rows, &[1.0], 0.1, 10, 0.0).is_err());
    }
}
