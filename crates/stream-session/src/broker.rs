//! Broker abstraction used by session tasks
//!
//! The session engine talks to the message broker exclusively through the
//! traits defined here. The real implementation lives in the `stream-kafka`
//! crate; tests substitute in-memory fakes.

use async_trait::async_trait;
use stream_core::Destination;
use thiserror::Error;

/// Errors raised by broker implementations.
#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("Failed to connect to broker at {brokers}: {reason}")]
    Connect { brokers: String, reason: String },

    #[error("Publish failed: {0}")]
    Publish(String),

    #[error("Receive failed: {0}")]
    Receive(String),

    #[error("Admin operation failed: {0}")]
    Admin(String),
}

/// A single record delivered to a consumer session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumedRecord {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    pub key: Option<String>,
    pub payload: String,
    /// Broker-assigned timestamp in milliseconds, when available.
    pub timestamp: Option<i64>,
}

/// Sink for rendered messages bound to a single topic.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, payload: &[u8]) -> Result<(), BrokerError>;
}

/// Source of records for a single subscription.
///
/// `next_record` waits until a record arrives or the subscription fails.
#[async_trait]
pub trait RecordStream: Send {
    async fn next_record(&mut self) -> Result<ConsumedRecord, BrokerError>;
}

/// Factory for publishers and subscriptions against one broker cluster.
#[async_trait]
pub trait BrokerClient: Send + Sync {
    async fn publisher(&self, destination: &Destination) -> Result<Box<dyn Publisher>, BrokerError>;

    async fn subscribe(
        &self,
        destination: &Destination,
        group_id: Option<&str>,
    ) -> Result<Box<dyn RecordStream>, BrokerError>;
}
