use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::error::{NetError, Result};

/// Hyperparameters for a `train_loop` run.
///
/// Loadable from JSON; any field left out takes its default:
///
/// ```json
/// { "epochs": 30, "batch_size": 10, "learning_rate": 0.1 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Full passes over the training data.
    pub epochs: usize,
    /// Samples per gradient step; `1` gives online SGD.
    pub batch_size: usize,
    /// Applied to the unnormalised batch gradient, so larger batches take
    /// proportionally larger steps.
    pub learning_rate: f64,
    /// Seeds the per-epoch shuffle.
    pub seed: u64,
    pub shuffle: bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            epochs: 10,
            batch_size: 32,
            learning_rate: 0.1,
            seed: 0,
            shuffle: true,
        }
    }
}

impl TrainConfig {
    pub fn new(epochs: usize, batch_size: usize, learning_rate: f64) -> Self {
        TrainConfig {
            epochs,
            batch_size,
            learning_rate,
            ..TrainConfig::default()
        }
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<TrainConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(NetError::InvalidConfig("batch_size must be at least 1".into()));
        }
        if !self.learning_rate.is_finite() || self.learning_rate < 0.0 {
            return Err(NetError::InvalidConfig(format!(
                "learning_rate must be a non-negative number, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_json_fields_use_defaults() {
        let cfg: TrainConfig = serde_json::from_str(r#"{ "epochs": 3, "learning_rate": 0.5 }"#).unwrap();
        assert_eq!(cfg.epochs, 3);
        assert_eq!(cfg.learning_rate, 0.5);
        assert_eq!(cfg.batch_size, 32);
        assert!(cfg.shuffle);
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(TrainConfig::new(1, 0, 0.1).validate().is_err());
        assert!(TrainConfig::new(1, 4, f64::NAN).validate().is_err());
        assert!(TrainConfig::new(1, 4, -1.0).validate().is_err());
        assert!(TrainConfig::new(1, 4, 0.1).validate().is_ok());
    }
}
