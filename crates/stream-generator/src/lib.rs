//! Value generation and template rendering for stream-tester.
//!
//! This crate turns a message template with named `{{placeholder}}` tokens
//! into concrete messages. Each placeholder is bound to a `Parameter` which
//! either picks from a manual value list or generates a fresh value from a
//! typed, constraint-driven generator.
//!
//! # Architecture
//!
//! ```text
//! template + [Parameter]
//!        │
//!        ▼
//! ┌──────────────────┐     ┌───────────────┐
//! │ MessageRenderer  │────▶│ generators::  │
//! │                  │     │ generate      │
//! │  - catalog       │     └───────┬───────┘
//! │  - rng (StdRng)  │             │ dotted paths
//! └────────┬─────────┘             ▼
//!          │               ┌───────────────┐
//!          ▼               │ ValueCatalog  │
//!    Rendered { message,   └───────────────┘
//!               issues }
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use stream_core::Parameter;
//! use stream_generator::{BuiltinCatalog, MessageRenderer};
//!
//! let params = vec![
//!     Parameter::randomized("uid", "uuid"),
//!     Parameter::randomized("n", "number")
//!         .with_constraint("min", "1")
//!         .with_constraint("max", "100"),
//! ];
//!
//! let mut renderer = MessageRenderer::new(Arc::new(BuiltinCatalog), Some(42));
//! let rendered = renderer.render(r#"{"id":"{{uid}}","n":{{n}}}"#, &params);
//! assert!(rendered.issues.is_empty());
//! ```
//!
//! # Generator types
//!
//! - `uuid` - random UUID v4
//! - `string` - random word, or alphanumeric string with `length:N`
//! - `number` - integer or float with `min:`, `max:`, `precision:`
//! - `date` - RFC 3339 timestamp with `from:`, `to:`
//! - `boolean` - random boolean
//! - `array` - array with `length:` and `itemType:`, elements generated
//!   recursively
//! - `namespace.method` - dotted path resolved through the [`ValueCatalog`]
//! - anything else falls back to a generic word token

pub mod catalog;
pub mod error;
pub mod generators;
pub mod renderer;

// Re-exports for convenience
pub use catalog::{BuiltinCatalog, ValueCatalog};
pub use error::GenerateError;
pub use generators::generate;
pub use renderer::{render, MessageRenderer, RenderIssue, Rendered};
