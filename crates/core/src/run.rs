//! Reproducible description of a simulation run.
//!
//! A [`RunSpec`] captures the parameter overrides, the spawn seed, and the
//! number of ticks. Feeding the same spec to the same binary reproduces the
//! particle field bit-for-bit.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Parameter overrides, spawn seed, and tick count for one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSpec {
    #[serde(default = "empty_params")]
    pub params: serde_json::Value,
    pub seed: u64,
    #[serde(default)]
    pub ticks: u64,
}

fn empty_params() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl RunSpec {
    /// A spec with no overrides and zero ticks.
    pub fn new(seed: u64) -> Self {
        Self {
            params: empty_params(),
            seed,
            ticks: 0,
        }
    }

    /// Parses a spec from JSON text, requiring `params` to be an object.
    pub fn from_json_str(text: &str) -> Result<Self, EngineError> {
        let spec: RunSpec = serde_json::from_str(text)
            .map_err(|e| EngineError::invalid_param("spec", e.to_string()))?;
        spec.validate()?;
        Ok(spec)
    }

    /// Checks that `params` is a JSON object.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.params.is_object() {
            Ok(())
        } else {
            Err(EngineError::invalid_param(
                "params",
                "expected a JSON object of parameter overrides",
            ))
        }
    }
}
