//! Session-level configuration types.

use crate::parameter::Parameter;
use serde::{Deserialize, Serialize};

/// A topic on a specific broker, the target of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    /// Topic name.
    pub topic: String,
    /// Broker addresses (comma-separated list, e.g. "localhost:9092").
    pub brokers: String,
}

impl Destination {
    /// Create a new destination.
    pub fn new(topic: impl Into<String>, brokers: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            brokers: brokers.into(),
        }
    }
}

/// The kind of work a session performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Producer,
    Consumer,
}

/// Lifecycle state of a session.
///
/// Producers move `Idle -> Running <-> Paused -> Idle`; consumers move
/// `Idle -> Connected -> Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Running,
    Paused,
    Connected,
}

/// Bounded-count auto-stop policy for a producer loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopAfter {
    /// Whether the producer self-stops after `count` successful sends.
    pub enabled: bool,
    /// Number of successful sends before stopping. Must be >= 1 to matter.
    pub count: u64,
}

impl Default for StopAfter {
    fn default() -> Self {
        Self {
            enabled: false,
            count: 1,
        }
    }
}

impl StopAfter {
    /// Stop after `count` successful sends.
    pub fn after(count: u64) -> Self {
        Self {
            enabled: true,
            count,
        }
    }
}

/// Configuration for one producer session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProducerConfig {
    /// Target topic and broker.
    pub destination: Destination,

    /// Message template with `{{name}}` placeholders. Treated as an opaque
    /// string; it is not required to be valid JSON.
    pub template: String,

    /// Milliseconds between ticks. Zero means "as fast as the scheduler
    /// allows", not "disabled".
    #[serde(default)]
    pub interval_ms: u64,

    /// Bounded-count auto-stop policy.
    #[serde(default)]
    pub stop_after: StopAfter,

    /// Generation rules for the template's placeholders.
    #[serde(default)]
    pub parameters: Vec<Parameter>,

    /// Optional RNG seed for reproducible message streams.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Configuration for one consumer session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumerConfig {
    /// Topic and broker to subscribe to.
    pub destination: Destination,

    /// Consumer group id. A default is chosen by the broker client when
    /// absent.
    #[serde(default)]
    pub group_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_after_default_is_disabled() {
        let stop = StopAfter::default();
        assert!(!stop.enabled);
        assert_eq!(stop.count, 1);
    }

    #[test]
    fn test_producer_config_yaml_defaults() {
        let yaml = r#"
destination:
  topic: events
  brokers: "localhost:9092"
template: '{"n":{{num}}}'
"#;
        let config: ProducerConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.interval_ms, 0);
        assert!(!config.stop_after.enabled);
        assert!(config.parameters.is_empty());
        assert_eq!(config.seed, None);
    }
}
