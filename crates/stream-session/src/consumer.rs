//! Consumer subscription task
//!
//! Each consumer session runs one tokio task that pulls records from its
//! subscription and forwards them, in arrival order, to the observer. A
//! receive error is reported once and ends the subscription.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::debug;

use stream_core::SessionState;

use crate::broker::RecordStream;
use crate::error::SessionError;
use crate::observer::StreamObserver;
use crate::producer::Control;

pub(crate) struct ConsumerHandle {
    pub control: watch::Sender<Control>,
    pub task: JoinHandle<()>,
}

pub(crate) fn spawn_consumer(
    session_id: String,
    topic: String,
    mut records: Box<dyn RecordStream>,
    state: Arc<Mutex<SessionState>>,
    observer: Arc<dyn StreamObserver>,
) -> ConsumerHandle {
    let (control, mut rx) = watch::channel(Control::Running);

    let task = tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                changed = rx.changed() => {
                    if changed.is_err() || *rx.borrow() == Control::Stopped {
                        break;
                    }
                }
                record = records.next_record() => match record {
                    Ok(record) => observer.record_received(&session_id, &record),
                    Err(e) => {
                        observer.session_error(
                            &session_id,
                            &SessionError::Subscription {
                                topic: topic.clone(),
                                reason: e.to_string(),
                            },
                        );
                        break;
                    }
                },
            }
        }

        *state.lock().await = SessionState::Idle;
        debug!(session = %session_id, topic = %topic, "consumer subscription ended");
    });

    ConsumerHandle { control, task }
}
