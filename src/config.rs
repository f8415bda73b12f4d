//! Training step configuration.
//!
//! A configuration is a small JSON document:
//!
//! ```json
//! {
//!   "learning_rate": 0.01,
//!   "direction": "descent"
//! }
//! ```
//!
//! `direction` is optional and defaults to `"descent"`.

use std::{fs, path::Path};

use serde::Deserialize;

use crate::{
    error::{Error, Result},
    optimizer::UpdateDirection,
};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TrainingConfig {
    /// Step size multiplying each weight gradient.
    pub learning_rate: f64,

    #[serde(default)]
    pub direction: UpdateDirection,
}

impl TrainingConfig {
    pub fn new(learning_rate: f64) -> Self {
        Self {
            learning_rate,
            direction: UpdateDirection::default(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate < 0.0 {
            return Err(Error::Config(format!(
                "learning_rate must be finite and non-negative, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}

/// Loads and validates a configuration from a JSON file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<TrainingConfig> {
    let contents = fs::read_to_string(path)?;
    TrainingConfig::from_json(&contents)
}
