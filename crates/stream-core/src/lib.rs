//! Core types for the stream-tester load generation tool.
//!
//! This crate defines the data model shared by the generator, session engine,
//! and CLI:
//!
//! - [`Parameter`] - a named generation rule bound to a `{{name}}` placeholder
//! - [`GeneratedValue`] - the raw value produced for a placeholder, with its
//!   JSON-literal encoding
//! - [`Destination`], [`ProducerConfig`], [`ConsumerConfig`] - per-session
//!   configuration
//! - [`StreamScenario`] - YAML scenario files describing a producer session
//!
//! Scenario files look like:
//!
//! ```yaml
//! template: '{"id":"{{uid}}","n":{{num}}}'
//! intervalMs: 500
//! stopAfter:
//!   enabled: true
//!   count: 100
//! parameters:
//!   - name: uid
//!     isRandomized: true
//!     type: uuid
//!   - name: num
//!     isRandomized: true
//!     type: number
//!     constraints: ["min:1", "max:100"]
//! ```

pub mod parameter;
pub mod scenario;
pub mod session;
pub mod value;

// Re-exports for convenience
pub use parameter::Parameter;
pub use scenario::{ScenarioError, StreamScenario};
pub use session::{
    ConsumerConfig, Destination, ProducerConfig, SessionKind, SessionState, StopAfter,
};
pub use value::GeneratedValue;
