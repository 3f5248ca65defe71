//! Delay Classifier
//!
//! Binary logistic regression over the fixed flight feature space, trained
//! once at process startup and queried read-only afterwards.

mod model;

pub use model::{ClassWeights, DelayClassifier, TrainingConfig};

use thiserror::Error;

/// Errors during classifier training and inference
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Model has not been fitted yet")]
    Unfitted,

    #[error("Model is already fitted; refitting is not supported")]
    AlreadyFitted,

    #[error("Label at index {index} is {value}; labels must be 0 or 1")]
    LabelDomain { index: usize, value: u8 },

    #[error("Feature/label length mismatch: {features} features, {labels} labels")]
    LengthMismatch { features: usize, labels: usize },

    #[error("Training set is empty")]
    EmptyTrainingSet,
}
