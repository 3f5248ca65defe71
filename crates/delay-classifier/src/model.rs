//! Logistic Regression Training and Inference

use crate::ClassifierError;
use feature_builder::{FeatureVector, FEATURE_DIMENSION};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Training hyperparameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Gradient descent step size
    pub learning_rate: f64,
    /// Maximum gradient descent iterations
    pub max_iterations: usize,
    /// Log-loss convergence tolerance
    pub tolerance: f64,
    /// Seed recorded with the trained model. Training is fully deterministic
    /// (zero initialization, fixed iteration order), so the seed pins the
    /// configuration rather than any sampling.
    pub random_state: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            max_iterations: 1000,
            tolerance: 1e-6,
            random_state: 42,
        }
    }
}

/// Per-class loss weights, inversely proportional to class frequency
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClassWeights {
    /// Weight applied to on-time samples (label 0)
    pub on_time: f64,
    /// Weight applied to delayed samples (label 1)
    pub delayed: f64,
}

impl ClassWeights {
    /// Balance the loss against class frequency
    ///
    /// weight(1) = count(0)/total and weight(0) = count(1)/total, so the
    /// rarer delayed class is not ignored by the optimizer.
    pub fn balanced(labels: &[u8]) -> Self {
        let total = labels.len() as f64;
        let delayed_count = labels.iter().filter(|&&y| y == 1).count() as f64;
        let on_time_count = total - delayed_count;

        Self {
            on_time: delayed_count / total,
            delayed: on_time_count / total,
        }
    }
}

/// Binary delay classifier
///
/// State machine: `Unfitted --fit--> Fitted`. `Fitted` is terminal for the
/// process lifetime; `predict` is only valid once fitted.
#[derive(Debug, Clone)]
pub struct DelayClassifier {
    config: TrainingConfig,
    coefficients: Option<Array1<f64>>,
    intercept: Option<f64>,
    class_weights: Option<ClassWeights>,
}

impl DelayClassifier {
    /// Create an unfitted classifier
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            coefficients: None,
            intercept: None,
            class_weights: None,
        }
    }

    /// Whether `fit` has completed successfully
    pub fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }

    /// Training configuration this classifier was created with
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Class weights computed during `fit`
    pub fn class_weights(&self) -> Option<ClassWeights> {
        self.class_weights
    }

    /// Fit on preprocessed features and labels
    ///
    /// Valid exactly once; the fitted state is immutable afterwards and safe
    /// to share across concurrent `predict` callers.
    pub fn fit(&mut self, features: &[FeatureVector], labels: &[u8]) -> Result<(), ClassifierError> {
        if self.is_fitted() {
            return Err(ClassifierError::AlreadyFitted);
        }
        if features.len() != labels.len() {
            return Err(ClassifierError::LengthMismatch {
                features: features.len(),
                labels: labels.len(),
            });
        }
        if features.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }
        for (index, &value) in labels.iter().enumerate() {
            if value > 1 {
                return Err(ClassifierError::LabelDomain { index, value });
            }
        }

        let weights = ClassWeights::balanced(labels);
        info!(
            "Fitting delay classifier on {} samples ({} delayed), class weights {{0: {:.4}, 1: {:.4}}}, seed {}",
            labels.len(),
            labels.iter().filter(|&&y| y == 1).count(),
            weights.on_time,
            weights.delayed,
            self.config.random_state
        );

        let x = design_matrix(features);
        let y: Array1<f64> = labels.iter().map(|&v| f64::from(v)).collect();
        let sample_weights: Array1<f64> = labels
            .iter()
            .map(|&v| {
                if v == 1 {
                    weights.delayed
                } else {
                    weights.on_time
                }
            })
            .collect();

        let n_samples = features.len() as f64;
        let mut coefficients = Array1::<f64>::zeros(FEATURE_DIMENSION);
        let mut intercept = 0.0;
        let mut previous_loss = f64::INFINITY;

        for iteration in 0..self.config.max_iterations {
            let linear = x.dot(&coefficients) + intercept;
            let predictions = linear.mapv(sigmoid);

            let weighted_errors = (&predictions - &y) * &sample_weights;
            let gradient = x.t().dot(&weighted_errors) / n_samples;
            let intercept_gradient = weighted_errors.sum() / n_samples;

            coefficients = &coefficients - &(gradient * self.config.learning_rate);
            intercept -= self.config.learning_rate * intercept_gradient;

            let loss = weighted_log_loss(&y, &predictions, &sample_weights);
            if (previous_loss - loss).abs() < self.config.tolerance {
                debug!("Converged after {} iterations (loss {:.6})", iteration + 1, loss);
                break;
            }
            previous_loss = loss;
        }

        self.class_weights = Some(weights);
        self.coefficients = Some(coefficients);
        self.intercept = Some(intercept);
        Ok(())
    }

    /// Predicted probability of delay for each input vector
    pub fn predict_proba(&self, features: &[FeatureVector]) -> Result<Vec<f64>, ClassifierError> {
        let coefficients = self.coefficients.as_ref().ok_or(ClassifierError::Unfitted)?;
        let intercept = self.intercept.ok_or(ClassifierError::Unfitted)?;

        let x = design_matrix(features);
        let linear = x.dot(coefficients) + intercept;
        Ok(linear.mapv(sigmoid).to_vec())
    }

    /// Predicted 0/1 labels, one per input vector in input order
    pub fn predict(&self, features: &[FeatureVector]) -> Result<Vec<u8>, ClassifierError> {
        Ok(self
            .predict_proba(features)?
            .into_iter()
            .map(|p| u8::from(p >= 0.5))
            .collect())
    }
}

fn design_matrix(features: &[FeatureVector]) -> Array2<f64> {
    let mut x = Array2::<f64>::zeros((features.len(), FEATURE_DIMENSION));
    for (i, vector) in features.iter().enumerate() {
        for (j, &value) in vector.values.iter().enumerate() {
            x[[i, j]] = value;
        }
    }
    x
}

/// Numerically stable sigmoid
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let exp_z = z.exp();
        exp_z / (1.0 + exp_z)
    }
}

/// Weighted binary cross-entropy
fn weighted_log_loss(y: &Array1<f64>, p: &Array1<f64>, w: &Array1<f64>) -> f64 {
    let eps = 1e-15;
    let n = y.len() as f64;

    -y.iter()
        .zip(p.iter())
        .zip(w.iter())
        .map(|((&y, &p), &w)| {
            let p = p.clamp(eps, 1.0 - eps);
            w * (y * p.ln() + (1.0 - y) * (1.0 - p).ln())
        })
        .sum::<f64>()
        / n
}
