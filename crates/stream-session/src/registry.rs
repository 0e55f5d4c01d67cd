//! Session registry
//!
//! Owns every session keyed by caller-chosen id and exposes the lifecycle
//! operations: start/pause/resume/stop for producers, connect/disconnect for
//! consumers, plus live template and parameter edits. Operations on the same
//! session are serialized by a per-session lock; operations on different
//! sessions never block each other.
//!
//! Mutating operations are idempotent: starting an already-running session,
//! pausing a non-running one, or stopping an unknown id are quiet no-ops.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use stream_generator::ValueCatalog;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use stream_core::{ConsumerConfig, Parameter, ProducerConfig, SessionKind, SessionState};

use crate::broker::BrokerClient;
use crate::consumer;
use crate::error::SessionError;
use crate::observer::StreamObserver;
use crate::producer::{self, Control};

/// How long a stop waits for the task to wind down before aborting it.
const TEARDOWN_TIMEOUT: Duration = Duration::from_secs(5);

struct LiveProducer {
    control: tokio::sync::watch::Sender<Control>,
    task: JoinHandle<()>,
    config: Arc<RwLock<ProducerConfig>>,
}

struct LiveConsumer {
    control: tokio::sync::watch::Sender<Control>,
    task: JoinHandle<()>,
}

enum LiveTask {
    Producer(LiveProducer),
    Consumer(LiveConsumer),
}

impl LiveTask {
    fn is_finished(&self) -> bool {
        match self {
            LiveTask::Producer(p) => p.task.is_finished(),
            LiveTask::Consumer(c) => c.task.is_finished(),
        }
    }
}

struct SessionEntry {
    /// Serializes mutating operations for this session id.
    op_lock: Mutex<()>,
    /// Shared with the session task, which resets it to `Idle` on exit.
    state: Arc<Mutex<SessionState>>,
    live: Mutex<Option<LiveTask>>,
}

impl SessionEntry {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            op_lock: Mutex::new(()),
            state: Arc::new(Mutex::new(SessionState::Idle)),
            live: Mutex::new(None),
        })
    }

    /// Locks `live`, dropping a task that has already run to completion so
    /// callers never observe or edit a finished one.
    async fn live_pruned(&self) -> tokio::sync::MutexGuard<'_, Option<LiveTask>> {
        let mut live = self.live.lock().await;
        if live.as_ref().is_some_and(LiveTask::is_finished) {
            *live = None;
        }
        live
    }
}

/// Registry of all sessions sharing one broker client.
pub struct SessionRegistry {
    broker: Arc<dyn BrokerClient>,
    catalog: Arc<dyn ValueCatalog>,
    observer: Arc<dyn StreamObserver>,
    sessions: Mutex<HashMap<String, Arc<SessionEntry>>>,
}

impl SessionRegistry {
    pub fn new(
        broker: Arc<dyn BrokerClient>,
        catalog: Arc<dyn ValueCatalog>,
        observer: Arc<dyn StreamObserver>,
    ) -> Self {
        Self {
            broker,
            catalog,
            observer,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Registry with the built-in value catalog and the logging observer.
    pub fn with_defaults(broker: Arc<dyn BrokerClient>) -> Self {
        Self::new(
            broker,
            Arc::new(stream_generator::BuiltinCatalog),
            Arc::new(crate::observer::LogObserver),
        )
    }

    /// Returns the entry for `id`, creating it if absent.
    async fn entry(&self, id: &str) -> Arc<SessionEntry> {
        let mut sessions = self.sessions.lock().await;
        sessions
            .entry(id.to_string())
            .or_insert_with(SessionEntry::new)
            .clone()
    }

    /// Returns the entry for `id` without creating one.
    async fn lookup(&self, id: &str) -> Option<Arc<SessionEntry>> {
        self.sessions.lock().await.get(id).cloned()
    }

    /// Starts a producer loop for `id`.
    ///
    /// No-op while the session is active in any role, producer or consumer.
    /// A fresh start begins a new message count; a previous stop-after limit
    /// does not carry over.
    pub async fn start_producer(
        &self,
        id: &str,
        config: ProducerConfig,
    ) -> Result<(), SessionError> {
        let entry = self.entry(id).await;
        let _op = entry.op_lock.lock().await;

        {
            // Any non-idle state means a live task still owns this id, of
            // either kind. Replacing it here would orphan that task and let
            // its exit write clobber the new session's state.
            let state = *entry.state.lock().await;
            if state != SessionState::Idle {
                debug!(session = %id, ?state, "start ignored, session already active");
                return Ok(());
            }
        }

        let publisher = self.broker.publisher(&config.destination).await?;
        let topic = config.destination.topic.clone();
        let shared = Arc::new(RwLock::new(config));

        *entry.state.lock().await = SessionState::Running;
        let handle = producer::spawn_producer(
            id.to_string(),
            shared.clone(),
            entry.state.clone(),
            publisher,
            self.catalog.clone(),
            self.observer.clone(),
        );
        *entry.live.lock().await = Some(LiveTask::Producer(LiveProducer {
            control: handle.control,
            task: handle.task,
            config: shared,
        }));
        info!(session = %id, topic = %topic, "producer started");
        Ok(())
    }

    /// Pauses a running producer. No-op for any other state or unknown id.
    pub async fn pause_producer(&self, id: &str) {
        let Some(entry) = self.lookup(id).await else {
            return;
        };
        let _op = entry.op_lock.lock().await;
        let live = entry.live.lock().await;
        if let Some(LiveTask::Producer(p)) = live.as_ref() {
            let mut state = entry.state.lock().await;
            if *state == SessionState::Running {
                let _ = p.control.send(Control::Paused);
                *state = SessionState::Paused;
                info!(session = %id, "producer paused");
            }
        }
    }

    /// Resumes a paused producer. No-op for any other state or unknown id.
    pub async fn resume_producer(&self, id: &str) {
        let Some(entry) = self.lookup(id).await else {
            return;
        };
        let _op = entry.op_lock.lock().await;
        let live = entry.live.lock().await;
        if let Some(LiveTask::Producer(p)) = live.as_ref() {
            let mut state = entry.state.lock().await;
            if *state == SessionState::Paused {
                let _ = p.control.send(Control::Running);
                *state = SessionState::Running;
                info!(session = %id, "producer resumed");
            }
        }
    }

    /// Stops the producer for `id` and waits for the task to finish.
    ///
    /// No-op for unknown ids or sessions without a producer.
    pub async fn stop_producer(&self, id: &str) {
        let Some(entry) = self.lookup(id).await else {
            debug!(session = %id, "stop ignored, unknown session");
            return;
        };
        let _op = entry.op_lock.lock().await;
        let taken = {
            let mut live = entry.live.lock().await;
            match live.as_ref() {
                Some(LiveTask::Producer(_)) => live.take(),
                _ => None,
            }
        };
        if let Some(LiveTask::Producer(p)) = taken {
            let _ = p.control.send(Control::Stopped);
            await_teardown(p.task, id).await;
            *entry.state.lock().await = SessionState::Idle;
            info!(session = %id, "producer stopped");
        }
    }

    /// Connects a consumer subscription for `id`.
    ///
    /// No-op while the session is active in any role, consumer or producer.
    pub async fn connect_consumer(
        &self,
        id: &str,
        config: ConsumerConfig,
    ) -> Result<(), SessionError> {
        let entry = self.entry(id).await;
        let _op = entry.op_lock.lock().await;

        {
            // Same ownership rule as start_producer: never displace a live
            // task, producer or consumer, that has not gone idle yet.
            let state = *entry.state.lock().await;
            if state != SessionState::Idle {
                debug!(session = %id, ?state, "connect ignored, session already active");
                return Ok(());
            }
        }

        let records = self
            .broker
            .subscribe(&config.destination, config.group_id.as_deref())
            .await?;
        let topic = config.destination.topic.clone();

        *entry.state.lock().await = SessionState::Connected;
        let handle = consumer::spawn_consumer(
            id.to_string(),
            topic.clone(),
            records,
            entry.state.clone(),
            self.observer.clone(),
        );
        *entry.live.lock().await = Some(LiveTask::Consumer(LiveConsumer {
            control: handle.control,
            task: handle.task,
        }));
        info!(session = %id, topic = %topic, "consumer connected");
        Ok(())
    }

    /// Disconnects the consumer for `id` and waits for the task to finish.
    ///
    /// No-op for unknown ids or sessions without a consumer.
    pub async fn disconnect_consumer(&self, id: &str) {
        let Some(entry) = self.lookup(id).await else {
            debug!(session = %id, "disconnect ignored, unknown session");
            return;
        };
        let _op = entry.op_lock.lock().await;
        let taken = {
            let mut live = entry.live.lock().await;
            match live.as_ref() {
                Some(LiveTask::Consumer(_)) => live.take(),
                _ => None,
            }
        };
        if let Some(LiveTask::Consumer(c)) = taken {
            let _ = c.control.send(Control::Stopped);
            await_teardown(c.task, id).await;
            *entry.state.lock().await = SessionState::Idle;
            info!(session = %id, "consumer disconnected");
        }
    }

    /// Replaces the message template of a live producer; next tick uses it.
    pub async fn set_template(&self, id: &str, template: impl Into<String>) {
        let Some(entry) = self.lookup(id).await else {
            return;
        };
        let _op = entry.op_lock.lock().await;
        let live = entry.live_pruned().await;
        if let Some(LiveTask::Producer(p)) = live.as_ref() {
            p.config.write().await.template = template.into();
            debug!(session = %id, "template updated");
        }
    }

    /// Adds or replaces (by name) a parameter of a live producer.
    pub async fn set_parameter(&self, id: &str, parameter: Parameter) {
        let Some(entry) = self.lookup(id).await else {
            return;
        };
        let _op = entry.op_lock.lock().await;
        let live = entry.live_pruned().await;
        if let Some(LiveTask::Producer(p)) = live.as_ref() {
            let mut cfg = p.config.write().await;
            match cfg
                .parameters
                .iter_mut()
                .find(|existing| existing.name == parameter.name)
            {
                Some(slot) => *slot = parameter,
                None => cfg.parameters.push(parameter),
            }
            debug!(session = %id, "parameter updated");
        }
    }

    /// Removes a parameter by name from a live producer.
    pub async fn remove_parameter(&self, id: &str, name: &str) {
        let Some(entry) = self.lookup(id).await else {
            return;
        };
        let _op = entry.op_lock.lock().await;
        let live = entry.live_pruned().await;
        if let Some(LiveTask::Producer(p)) = live.as_ref() {
            p.config
                .write()
                .await
                .parameters
                .retain(|param| param.name != name);
            debug!(session = %id, parameter = %name, "parameter removed");
        }
    }

    /// Current state of a session. Unknown ids are an error, unlike the
    /// mutating operations: callers asking for state want a real answer.
    pub async fn state(&self, id: &str) -> Result<SessionState, SessionError> {
        let entry = self
            .lookup(id)
            .await
            .ok_or_else(|| SessionError::UnknownSession(id.to_string()))?;
        let state = *entry.state.lock().await;
        Ok(state)
    }

    /// Kind of the session's live task, `None` once it is torn down.
    pub async fn kind(&self, id: &str) -> Result<Option<SessionKind>, SessionError> {
        let entry = self
            .lookup(id)
            .await
            .ok_or_else(|| SessionError::UnknownSession(id.to_string()))?;
        let live = entry.live_pruned().await;
        Ok(live.as_ref().map(|task| match task {
            LiveTask::Producer(_) => SessionKind::Producer,
            LiveTask::Consumer(_) => SessionKind::Consumer,
        }))
    }

    /// Ids of every session the registry has ever seen.
    pub async fn session_ids(&self) -> Vec<String> {
        self.sessions.lock().await.keys().cloned().collect()
    }

    /// Stops every live task. Used on process shutdown.
    pub async fn shutdown(&self) {
        let ids = self.session_ids().await;
        info!(sessions = ids.len(), "shutting down session registry");
        for id in ids {
            self.stop_producer(&id).await;
            self.disconnect_consumer(&id).await;
        }
    }
}

async fn await_teardown(mut task: JoinHandle<()>, id: &str) {
    match tokio::time::timeout(TEARDOWN_TIMEOUT, &mut task).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(session = %id, "session task ended abnormally: {e}"),
        Err(_) => {
            warn!(session = %id, "session task did not stop in time, aborting");
            task.abort();
        }
    }
}
