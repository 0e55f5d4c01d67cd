//! Observation hooks for session activity
//!
//! Session tasks report sent messages, received records, and errors through
//! a [`StreamObserver`]. The default [`LogObserver`] forwards everything to
//! `tracing`; tests install collecting observers instead.

use tracing::{error, info};

use crate::broker::ConsumedRecord;
use crate::error::SessionError;

/// Receives notifications from running session tasks.
///
/// Implementations must be cheap and non-blocking; they are invoked from
/// inside producer and consumer loops.
pub trait StreamObserver: Send + Sync {
    fn message_sent(&self, session_id: &str, payload: &str);

    fn record_received(&self, session_id: &str, record: &ConsumedRecord);

    fn session_error(&self, session_id: &str, error: &SessionError);
}

/// Observer that logs every event via `tracing`.
pub struct LogObserver;

impl StreamObserver for LogObserver {
    fn message_sent(&self, session_id: &str, payload: &str) {
        info!(session = %session_id, %payload, "message sent");
    }

    fn record_received(&self, session_id: &str, record: &ConsumedRecord) {
        info!(
            session = %session_id,
            topic = %record.topic,
            partition = record.partition,
            offset = record.offset,
            payload = %record.payload,
            "record received"
        );
    }

    fn session_error(&self, session_id: &str, error: &SessionError) {
        error!(session = %session_id, %error, "session error");
    }
}
