//! Training settings read from a JSON file.
//!
//! Every field is optional in the file and falls back to its default:
//!
//! ```json
//! {
//!   "epochs": 30,
//!   "batch_size": 10,
//!   "eta": 0.5,
//!   "alpha": 5.0,
//!   "images": 60000,
//!   "skip": 0,
//!   "seed": 42
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::train::TrainConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainSettings {
    /// Full passes over the training set.
    pub epochs: usize,
    /// Examples per mini-batch.
    pub batch_size: usize,
    /// Learning rate.
    pub eta: f64,
    /// L2 weight-decay strength.
    pub alpha: f64,
    /// Number of training images to read.
    pub images: usize,
    /// Number of leading images to skip.
    pub skip: usize,
    /// Seed for the per-epoch shuffle.
    pub seed: Option<u64>,
}

impl Default for TrainSettings {
    fn default() -> Self {
        TrainSettings {
            epochs: 30,
            batch_size: 10,
            eta: 0.5,
            alpha: 5.0,
            images: 60_000,
            skip: 0,
            seed: None,
        }
    }
}

impl TrainSettings {
    /// Loads and validates settings from a JSON file.
    pub fn from_file(path: &Path) -> Result<TrainSettings, DataError> {
        let contents = std::fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
        TrainSettings::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<TrainSettings, DataError> {
        let settings: TrainSettings = serde_json::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), DataError> {
        if self.batch_size == 0 {
            return Err(DataError::Format("batch_size must be at least 1".into()));
        }
        if !(self.eta.is_finite() && self.eta > 0.0) {
            return Err(DataError::Format(format!("eta must be positive, got {}", self.eta)));
        }
        if !(self.alpha.is_finite() && self.alpha >= 0.0) {
            return Err(DataError::Format(format!("alpha must be non-negative, got {}", self.alpha)));
        }
        Ok(())
    }

    pub fn train_config(&self) -> TrainConfig {
        let config = TrainConfig::new(self.epochs, self.batch_size, self.eta, self.alpha);
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let settings = TrainSettings::from_json(r#"{ "epochs": 3, "seed": 7 }"#).unwrap();
        assert_eq!(settings.epochs, 3);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.batch_size, 10);
        assert_eq!(settings.images, 60_000);
    }

    #[test]
    fn rejects_zero_batch() {
        assert!(TrainSettings::from_json(r#"{ "batch_size": 0 }"#).is_err());
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(matches!(
            TrainSettings::from_json(r#"{ "learning_rate": 0.1 }"#),
            Err(DataError::Json(_))
        ));
    }

    #[test]
    fn seed_reaches_train_config() {
        let settings = TrainSettings { seed: Some(3), ..TrainSettings::default() };
        let config = settings.train_config();
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.batch_size, 10);
    }
}
