//! Session engine tests against an in-memory broker.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use stream_core::{ConsumerConfig, Destination, Parameter, ProducerConfig, SessionState, StopAfter};
use stream_generator::BuiltinCatalog;
use stream_session::{
    BrokerClient, BrokerError, ConsumedRecord, Publisher, RecordStream, SessionError,
    SessionRegistry, StreamObserver,
};

/// What a mock subscription does once its scripted records run out.
#[derive(Clone, Copy)]
enum StreamEnd {
    /// Fail the next receive, ending the subscription.
    Fail,
    /// Block forever, as a healthy but quiet topic would.
    Pending,
}

#[derive(Clone)]
struct MockBroker {
    sent: Arc<StdMutex<Vec<(String, String)>>>,
    fail_next_publishes: Arc<AtomicUsize>,
    records: Arc<StdMutex<Vec<ConsumedRecord>>>,
    stream_end: Arc<StdMutex<StreamEnd>>,
}

impl MockBroker {
    fn new() -> Self {
        Self {
            sent: Arc::new(StdMutex::new(Vec::new())),
            fail_next_publishes: Arc::new(AtomicUsize::new(0)),
            records: Arc::new(StdMutex::new(Vec::new())),
            stream_end: Arc::new(StdMutex::new(StreamEnd::Pending)),
        }
    }

    fn sent_to(&self, topic: &str) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, m)| m.clone())
            .collect()
    }

    fn fail_next_publishes(&self, count: usize) {
        self.fail_next_publishes.store(count, Ordering::SeqCst);
    }

    fn serve_records(&self, records: Vec<ConsumedRecord>, end: StreamEnd) {
        *self.records.lock().unwrap() = records;
        *self.stream_end.lock().unwrap() = end;
    }
}

struct MockPublisher {
    topic: String,
    sent: Arc<StdMutex<Vec<(String, String)>>>,
    fail_next: Arc<AtomicUsize>,
}

#[async_trait]
impl Publisher for MockPublisher {
    async fn publish(&self, payload: &[u8]) -> Result<(), BrokerError> {
        let should_fail = self
            .fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(BrokerError::Publish("broker unavailable".to_string()));
        }
        self.sent.lock().unwrap().push((
            self.topic.clone(),
            String::from_utf8_lossy(payload).into_owned(),
        ));
        Ok(())
    }
}

struct MockStream {
    records: std::vec::IntoIter<ConsumedRecord>,
    end: StreamEnd,
}

#[async_trait]
impl RecordStream for MockStream {
    async fn next_record(&mut self) -> Result<ConsumedRecord, BrokerError> {
        match self.records.next() {
            Some(record) => Ok(record),
            None => match self.end {
                StreamEnd::Fail => Err(BrokerError::Receive("stream closed".to_string())),
                StreamEnd::Pending => std::future::pending().await,
            },
        }
    }
}

#[async_trait]
impl BrokerClient for MockBroker {
    async fn publisher(&self, destination: &Destination) -> Result<Box<dyn Publisher>, BrokerError> {
        Ok(Box::new(MockPublisher {
            topic: destination.topic.clone(),
            sent: self.sent.clone(),
            fail_next: self.fail_next_publishes.clone(),
        }))
    }

    async fn subscribe(
        &self,
        _destination: &Destination,
        _group_id: Option<&str>,
    ) -> Result<Box<dyn RecordStream>, BrokerError> {
        let records = std::mem::take(&mut *self.records.lock().unwrap());
        let end = *self.stream_end.lock().unwrap();
        Ok(Box::new(MockStream {
            records: records.into_iter(),
            end,
        }))
    }
}

#[derive(Default)]
struct CollectObserver {
    messages: StdMutex<Vec<String>>,
    records: StdMutex<Vec<ConsumedRecord>>,
    errors: StdMutex<Vec<String>>,
}

impl CollectObserver {
    fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    fn records(&self) -> Vec<ConsumedRecord> {
        self.records.lock().unwrap().clone()
    }

    fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl StreamObserver for CollectObserver {
    fn message_sent(&self, _session_id: &str, payload: &str) {
        self.messages.lock().unwrap().push(payload.to_string());
    }

    fn record_received(&self, _session_id: &str, record: &ConsumedRecord) {
        self.records.lock().unwrap().push(record.clone());
    }

    fn session_error(&self, _session_id: &str, error: &SessionError) {
        self.errors.lock().unwrap().push(error.to_string());
    }
}

fn setup() -> (SessionRegistry, MockBroker, Arc<CollectObserver>) {
    let broker = MockBroker::new();
    let observer = Arc::new(CollectObserver::default());
    let registry = SessionRegistry::new(
        Arc::new(broker.clone()),
        Arc::new(BuiltinCatalog),
        observer.clone(),
    );
    (registry, broker, observer)
}

/// Fixed-value config: every render produces `{"n":"7"}` (manual values
/// substitute as JSON strings).
fn producer_config(topic: &str, interval_ms: u64, stop_after: StopAfter) -> ProducerConfig {
    ProducerConfig {
        destination: Destination::new(topic, "mock:9092"),
        template: r#"{"n":{{n}}}"#.to_string(),
        interval_ms,
        stop_after,
        parameters: vec![Parameter::manual("n", vec!["7".to_string()])],
        seed: Some(42),
    }
}

fn record(topic: &str, offset: i64, payload: &str) -> ConsumedRecord {
    ConsumedRecord {
        topic: topic.to_string(),
        partition: 0,
        offset,
        key: None,
        payload: payload.to_string(),
        timestamp: Some(1_700_000_000_000),
    }
}

async fn wait_for_state(registry: &SessionRegistry, id: &str, want: SessionState) {
    for _ in 0..400 {
        if registry.state(id).await.ok() == Some(want) {
            return;
        }
        sleep(Duration::from_millis(5)).await;
    }
    panic!("session {id} did not reach {want:?} within 2s");
}

async fn wait_for(what: &str, cond: impl Fn() -> bool) {
    for _ in 0..400 {
        if cond() {
            return;
        }
        sleep(Duration::from_millis(5)).await;
    }
    panic!("{what} not observed within 2s");
}

#[tokio::test]
async fn stop_after_sends_exact_count_then_idles() {
    let (registry, broker, observer) = setup();
    registry
        .start_producer("a", producer_config("orders", 1, StopAfter::after(3)))
        .await
        .unwrap();

    wait_for_state(&registry, "a", SessionState::Idle).await;
    // Extra ticks after the limit would land in this window.
    sleep(Duration::from_millis(50)).await;

    assert_eq!(broker.sent_to("orders"), vec![r#"{"n":"7"}"#; 3]);
    assert_eq!(observer.messages().len(), 3);
    assert!(observer.errors().is_empty());
}

#[tokio::test]
async fn start_is_idempotent_while_running() {
    let (registry, broker, _observer) = setup();
    let config = producer_config("orders", 5, StopAfter::after(4));

    registry.start_producer("a", config.clone()).await.unwrap();
    // A second loop here would double the message count.
    registry.start_producer("a", config.clone()).await.unwrap();
    sleep(Duration::from_millis(8)).await;
    registry.start_producer("a", config).await.unwrap();

    wait_for_state(&registry, "a", SessionState::Idle).await;
    sleep(Duration::from_millis(30)).await;
    assert_eq!(broker.sent_to("orders").len(), 4);
}

#[tokio::test]
async fn stop_after_limit_survives_pause_and_resume() {
    let (registry, broker, _observer) = setup();
    registry
        .start_producer("a", producer_config("orders", 20, StopAfter::after(3)))
        .await
        .unwrap();

    wait_for("first message", || !broker.sent_to("orders").is_empty()).await;
    registry.pause_producer("a").await;
    assert_eq!(registry.state("a").await.unwrap(), SessionState::Paused);

    sleep(Duration::from_millis(30)).await;
    let frozen = broker.sent_to("orders").len();
    sleep(Duration::from_millis(120)).await;
    assert_eq!(broker.sent_to("orders").len(), frozen, "paused producer kept sending");
    assert!(frozen < 3);

    registry.resume_producer("a").await;
    wait_for_state(&registry, "a", SessionState::Idle).await;
    // The counter carried across the pause: 3 in total, not 3 + frozen.
    assert_eq!(broker.sent_to("orders").len(), 3);
}

#[tokio::test]
async fn operations_on_unknown_sessions_are_noops() {
    let (registry, _broker, _observer) = setup();

    registry.stop_producer("ghost").await;
    registry.pause_producer("ghost").await;
    registry.resume_producer("ghost").await;
    registry.disconnect_consumer("ghost").await;
    registry.set_template("ghost", "{}").await;
    registry.remove_parameter("ghost", "n").await;

    assert!(matches!(
        registry.state("ghost").await,
        Err(SessionError::UnknownSession(_))
    ));
    assert!(registry.session_ids().await.is_empty());
}

#[tokio::test]
async fn sessions_progress_independently() {
    let (registry, broker, _observer) = setup();
    registry
        .start_producer("a", producer_config("alpha", 1, StopAfter::after(5)))
        .await
        .unwrap();
    registry
        .start_producer("b", producer_config("beta", 5, StopAfter::default()))
        .await
        .unwrap();

    wait_for_state(&registry, "a", SessionState::Idle).await;
    assert_eq!(registry.state("b").await.unwrap(), SessionState::Running);
    assert_eq!(
        registry.kind("b").await.unwrap(),
        Some(stream_core::SessionKind::Producer)
    );

    // b keeps ticking after a has finished.
    let before = broker.sent_to("beta").len();
    wait_for("more beta messages", || {
        broker.sent_to("beta").len() > before
    })
    .await;

    registry.stop_producer("b").await;
    assert_eq!(registry.state("b").await.unwrap(), SessionState::Idle);
    assert_eq!(broker.sent_to("alpha").len(), 5);
}

#[tokio::test]
async fn publish_failures_are_reported_but_do_not_end_the_loop() {
    let (registry, broker, observer) = setup();
    broker.fail_next_publishes(2);
    registry
        .start_producer("a", producer_config("orders", 1, StopAfter::after(1)))
        .await
        .unwrap();

    wait_for_state(&registry, "a", SessionState::Idle).await;

    // Two failed attempts, then the one counted success.
    assert_eq!(broker.sent_to("orders").len(), 1);
    let errors = observer.errors();
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| e.contains("Publish")));
    assert_eq!(observer.messages().len(), 1);
}

#[tokio::test]
async fn generation_errors_leave_placeholder_and_message_still_publishes() {
    let (registry, broker, observer) = setup();
    let config = ProducerConfig {
        destination: Destination::new("orders", "mock:9092"),
        template: "{{bad}} {{ok}}".to_string(),
        interval_ms: 1,
        stop_after: StopAfter::after(1),
        parameters: vec![
            Parameter::randomized("bad", "no.such.path"),
            Parameter::manual("ok", vec!["v".to_string()]),
        ],
        seed: Some(7),
    };
    registry.start_producer("a", config).await.unwrap();

    wait_for_state(&registry, "a", SessionState::Idle).await;

    let sent = broker.sent_to("orders");
    assert_eq!(sent, vec![r#"{{bad}} "v""#.to_string()]);
    let errors = observer.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("bad"));
}

#[tokio::test]
async fn template_and_parameter_edits_apply_on_the_next_tick() {
    let (registry, broker, _observer) = setup();
    let config = ProducerConfig {
        destination: Destination::new("orders", "mock:9092"),
        template: "{{x}}".to_string(),
        interval_ms: 10,
        stop_after: StopAfter::default(),
        parameters: vec![Parameter::manual("x", vec!["old".to_string()])],
        seed: None,
    };
    registry.start_producer("a", config).await.unwrap();

    wait_for("initial message", || !broker.sent_to("orders").is_empty()).await;
    registry
        .set_parameter("a", Parameter::manual("x", vec!["new".to_string()]))
        .await;
    registry.set_template("a", "v={{x}}").await;

    wait_for("edited message", || {
        broker
            .sent_to("orders")
            .iter()
            .any(|m| m == r#"v="new""#)
    })
    .await;
    registry.stop_producer("a").await;
    assert_eq!(registry.state("a").await.unwrap(), SessionState::Idle);
}

#[tokio::test]
async fn consumer_forwards_records_in_order_then_reports_failure_once() {
    let (registry, broker, observer) = setup();
    broker.serve_records(
        (0..5).map(|i| record("orders", i, &format!("m{i}"))).collect(),
        StreamEnd::Fail,
    );

    registry
        .connect_consumer("c", ConsumerConfig {
            destination: Destination::new("orders", "mock:9092"),
            group_id: None,
        })
        .await
        .unwrap();

    wait_for_state(&registry, "c", SessionState::Idle).await;

    let records = observer.records();
    assert_eq!(records.len(), 5);
    let offsets: Vec<i64> = records.iter().map(|r| r.offset).collect();
    assert_eq!(offsets, vec![0, 1, 2, 3, 4]);
    assert_eq!(records[0].payload, "m0");

    let errors = observer.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Subscription"));
}

#[tokio::test]
async fn connect_is_idempotent_and_disconnect_returns_to_idle() {
    let (registry, broker, observer) = setup();
    broker.serve_records(vec![record("orders", 0, "m0")], StreamEnd::Pending);

    let config = ConsumerConfig {
        destination: Destination::new("orders", "mock:9092"),
        group_id: Some("group-1".to_string()),
    };
    registry.connect_consumer("c", config.clone()).await.unwrap();
    registry.connect_consumer("c", config).await.unwrap();

    assert_eq!(registry.state("c").await.unwrap(), SessionState::Connected);
    assert_eq!(
        registry.kind("c").await.unwrap(),
        Some(stream_core::SessionKind::Consumer)
    );
    wait_for("forwarded record", || !observer.records().is_empty()).await;
    assert_eq!(observer.records().len(), 1);

    registry.disconnect_consumer("c").await;
    assert_eq!(registry.state("c").await.unwrap(), SessionState::Idle);
    assert_eq!(registry.kind("c").await.unwrap(), None);
    assert!(observer.errors().is_empty());
}

#[tokio::test]
async fn active_session_id_is_not_taken_over_by_the_other_kind() {
    let (registry, broker, observer) = setup();
    broker.serve_records(Vec::new(), StreamEnd::Pending);

    registry
        .start_producer("x", producer_config("orders", 5, StopAfter::default()))
        .await
        .unwrap();
    let consumer_config = ConsumerConfig {
        destination: Destination::new("orders", "mock:9092"),
        group_id: None,
    };
    // Connecting on an id with a live producer must leave it untouched;
    // displacing it would orphan the task and let its exit write Idle over
    // the consumer's state.
    registry
        .connect_consumer("x", consumer_config.clone())
        .await
        .unwrap();

    sleep(Duration::from_millis(200)).await;
    assert_eq!(registry.state("x").await.unwrap(), SessionState::Running);
    assert_eq!(
        registry.kind("x").await.unwrap(),
        Some(stream_core::SessionKind::Producer)
    );
    assert!(observer.records().is_empty());

    // Same rule in the other direction once the id really is free.
    registry.stop_producer("x").await;
    registry.connect_consumer("x", consumer_config).await.unwrap();
    assert_eq!(registry.state("x").await.unwrap(), SessionState::Connected);

    let sent_before = broker.sent_to("orders").len();
    registry
        .start_producer("x", producer_config("orders", 5, StopAfter::default()))
        .await
        .unwrap();
    sleep(Duration::from_millis(50)).await;
    assert_eq!(registry.state("x").await.unwrap(), SessionState::Connected);
    assert_eq!(broker.sent_to("orders").len(), sent_before);

    registry.shutdown().await;
}

#[tokio::test]
async fn finished_producer_reports_no_kind_and_ignores_edits() {
    let (registry, broker, _observer) = setup();
    registry
        .start_producer("a", producer_config("orders", 1, StopAfter::after(1)))
        .await
        .unwrap();
    wait_for_state(&registry, "a", SessionState::Idle).await;

    // The task may need a moment after its Idle write to fully retire.
    for _ in 0..400 {
        if registry.kind("a").await.unwrap().is_none() {
            break;
        }
        sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(registry.kind("a").await.unwrap(), None);

    // Edits land nowhere, and a fresh start runs from its own config.
    registry.set_template("a", "stale").await;
    registry
        .start_producer("a", producer_config("orders", 1, StopAfter::after(1)))
        .await
        .unwrap();
    wait_for_state(&registry, "a", SessionState::Idle).await;

    let sent = broker.sent_to("orders");
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|m| m == r#"{"n":"7"}"#));
}

#[tokio::test]
async fn shutdown_stops_every_session() {
    let (registry, broker, _observer) = setup();
    broker.serve_records(Vec::new(), StreamEnd::Pending);

    registry
        .start_producer("p", producer_config("alpha", 5, StopAfter::default()))
        .await
        .unwrap();
    registry
        .connect_consumer("c", ConsumerConfig {
            destination: Destination::new("beta", "mock:9092"),
            group_id: None,
        })
        .await
        .unwrap();

    wait_for("producer output", || !broker.sent_to("alpha").is_empty()).await;
    registry.shutdown().await;

    assert_eq!(registry.state("p").await.unwrap(), SessionState::Idle);
    assert_eq!(registry.state("c").await.unwrap(), SessionState::Idle);
}
