//! Error types for session operations

use stream_generator::GenerateError;
use thiserror::Error;

use crate::broker::BrokerError;

/// Errors surfaced by session operations and running session tasks.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Generation failed for parameter '{parameter}': {source}")]
    Generation {
        parameter: String,
        #[source]
        source: GenerateError,
    },

    #[error("Publish to topic '{topic}' failed: {reason}")]
    Publish { topic: String, reason: String },

    #[error("Subscription to topic '{topic}' failed: {reason}")]
    Subscription { topic: String, reason: String },

    #[error("Broker error: {0}")]
    Broker(#[from] BrokerError),

    #[error("Unknown session: {0}")]
    UnknownSession(String),
}
