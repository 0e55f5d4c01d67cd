//! Producer loop task
//!
//! Each producer session runs one tokio task that renders a message from the
//! session template and publishes it, once per interval, until stopped or
//! until the configured message count is reached. Pause and resume are
//! delivered through a watch channel so the loop reacts mid-sleep instead of
//! waiting out the current interval.

use std::sync::Arc;
use std::time::Duration;

use stream_generator::{MessageRenderer, ValueCatalog};
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::debug;

use stream_core::{ProducerConfig, SessionState};

use crate::broker::Publisher;
use crate::error::SessionError;
use crate::observer::StreamObserver;

/// Commands delivered to a running session task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Control {
    Running,
    Paused,
    Stopped,
}

pub(crate) struct ProducerHandle {
    pub control: watch::Sender<Control>,
    pub task: JoinHandle<()>,
}

/// Spawns the producer loop for one session.
///
/// The config lives behind a `RwLock` so template and parameter edits from
/// the registry take effect on the next tick without restarting the task.
/// The sent-message counter lives inside the task, which is what makes the
/// stop-after limit survive pause/resume but reset on a fresh start.
pub(crate) fn spawn_producer(
    session_id: String,
    config: Arc<RwLock<ProducerConfig>>,
    state: Arc<Mutex<SessionState>>,
    publisher: Box<dyn Publisher>,
    catalog: Arc<dyn ValueCatalog>,
    observer: Arc<dyn StreamObserver>,
) -> ProducerHandle {
    let (control, mut rx) = watch::channel(Control::Running);

    let task = tokio::spawn(async move {
        let (seed, topic) = {
            let cfg = config.read().await;
            (cfg.seed, cfg.destination.topic.clone())
        };
        let mut renderer = MessageRenderer::new(catalog, seed);
        let mut sent: u64 = 0;

        'run: loop {
            // Hold here while paused; leave on stop. The watch value is
            // copied out before matching so no borrow guard is alive when
            // the paused arm awaits the next change.
            loop {
                let control = *rx.borrow();
                match control {
                    Control::Stopped => break 'run,
                    Control::Running => break,
                    Control::Paused => {
                        if rx.changed().await.is_err() {
                            break 'run;
                        }
                    }
                }
            }

            let interval = config.read().await.interval_ms;
            tokio::select! {
                biased;
                changed = rx.changed() => {
                    if changed.is_err() {
                        break 'run;
                    }
                    // Re-check pause/stop before the next tick.
                    continue 'run;
                }
                _ = tokio::time::sleep(Duration::from_millis(interval)) => {}
            }

            // Re-read template and parameters every tick so live edits apply.
            let (template, parameters, stop_after) = {
                let cfg = config.read().await;
                (cfg.template.clone(), cfg.parameters.clone(), cfg.stop_after)
            };
            let rendered = renderer.render(&template, &parameters);
            for issue in &rendered.issues {
                observer.session_error(
                    &session_id,
                    &SessionError::Generation {
                        parameter: issue.parameter.clone(),
                        source: issue.error.clone(),
                    },
                );
            }

            match publisher.publish(rendered.message.as_bytes()).await {
                Ok(()) => {
                    sent += 1;
                    observer.message_sent(&session_id, &rendered.message);
                    if stop_after.enabled && sent >= stop_after.count {
                        debug!(
                            session = %session_id,
                            sent,
                            "message limit reached, ending producer loop"
                        );
                        break 'run;
                    }
                }
                Err(e) => {
                    observer.session_error(
                        &session_id,
                        &SessionError::Publish {
                            topic: topic.clone(),
                            reason: e.to_string(),
                        },
                    );
                }
            }
        }

        *state.lock().await = SessionState::Idle;
        debug!(session = %session_id, sent, "producer loop ended");
    });

    ProducerHandle { control, task }
}
