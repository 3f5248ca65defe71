//! Runtime Configuration

use config::{Config, ConfigError, Environment, File};
use delay_classifier::TrainingConfig;
use serde::Deserialize;

/// Runtime settings for the prediction service
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Listener address, e.g. `0.0.0.0:8080`
    pub bind_addr: String,
    /// Path to the historical flight dataset (CSV)
    pub dataset_path: String,
    /// Training hyperparameters
    pub training: TrainingSettings,
}

/// Training section of the settings
#[derive(Debug, Clone, Deserialize)]
pub struct TrainingSettings {
    pub learning_rate: f64,
    pub max_iterations: usize,
    pub tolerance: f64,
    pub random_state: u64,
}

impl TrainingSettings {
    /// Convert into the classifier's training configuration
    pub fn to_config(&self) -> TrainingConfig {
        TrainingConfig {
            learning_rate: self.learning_rate,
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
            random_state: self.random_state,
        }
    }
}

impl Settings {
    /// Load settings from defaults, an optional `config/delay-pipeline` file
    /// and `DELAY_PIPELINE_*` environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("bind_addr", "0.0.0.0:8080")?
            .set_default("dataset_path", "data/data.csv")?
            .set_default("training.learning_rate", 0.01)?
            .set_default("training.max_iterations", 1000i64)?
            .set_default("training.tolerance", 1e-6)?
            .set_default("training.random_state", 42i64)?
            .add_source(File::with_name("config/delay-pipeline").required(false))
            .add_source(Environment::with_prefix("DELAY_PIPELINE").separator("__"))
            .build()?
            .try_deserialize()
    }
}
