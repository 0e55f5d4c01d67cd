//! Error types for value generation.

use thiserror::Error;

/// Error produced while generating the value for a single placeholder.
///
/// Generation errors are always scoped to one placeholder; rendering a
/// template recovers from them and continues with the remaining parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// A non-randomized parameter has no manual values to choose from.
    #[error("Parameter '{0}' has no manual values to choose from")]
    EmptyValueSet(String),

    /// A dotted catalog path could not be resolved.
    #[error("Unknown catalog path '{path}' for parameter '{parameter}'")]
    UnknownPath { parameter: String, path: String },
}
