//! Scenario files describing a producer session.
//!
//! A scenario is the broker-independent part of a producer configuration
//! (template, cadence, stop policy, parameters), loaded from YAML. The CLI
//! combines a scenario with a [`Destination`] to form a full
//! [`ProducerConfig`].

use crate::parameter::Parameter;
use crate::session::{Destination, ProducerConfig, StopAfter};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Error type for scenario loading.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// Error reading the scenario file
    #[error("Failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse scenario YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A producer scenario loaded from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamScenario {
    /// Message template with `{{name}}` placeholders.
    pub template: String,

    /// Milliseconds between ticks (0 = as fast as possible).
    #[serde(default)]
    pub interval_ms: u64,

    /// Bounded-count auto-stop policy.
    #[serde(default)]
    pub stop_after: StopAfter,

    /// Generation rules for the template's placeholders.
    #[serde(default)]
    pub parameters: Vec<Parameter>,

    /// Optional RNG seed for reproducible runs.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl StreamScenario {
    /// Parse a scenario from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ScenarioError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a scenario from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Combine this scenario with a destination into a producer config.
    pub fn into_producer_config(self, destination: Destination) -> ProducerConfig {
        ProducerConfig {
            destination,
            template: self.template,
            interval_ms: self.interval_ms,
            stop_after: self.stop_after,
            parameters: self.parameters,
            seed: self.seed,
        }
    }
}
