//! Kafka implementation of the session broker traits
//!
//! Wraps rdkafka behind the `stream-session` [`BrokerClient`] surface:
//! a `FutureProducer` per producer session and a `StreamConsumer` per
//! consumer subscription, plus an admin helper for creating topics on
//! clusters without auto-creation.
//!
//! Client construction is cheap and does not contact the cluster; errors
//! surface on the first publish or receive instead.

use std::time::Duration;

use async_trait::async_trait;
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::Message;
use rdkafka::producer::{FutureProducer, FutureRecord};
use tracing::{debug, info};

use stream_core::Destination;
use stream_session::{BrokerClient, BrokerError, ConsumedRecord, Publisher, RecordStream};

/// Consumer group used when a session does not name one.
pub const DEFAULT_GROUP_ID: &str = "stream-tester-consumer";

/// How long a publish waits for broker acknowledgement.
const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Broker client backed by rdkafka.
#[derive(Debug, Default, Clone)]
pub struct KafkaBroker;

impl KafkaBroker {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BrokerClient for KafkaBroker {
    async fn publisher(&self, destination: &Destination) -> Result<Box<dyn Publisher>, BrokerError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &destination.brokers)
            .set("message.timeout.ms", "5000")
            .create()
            .map_err(|e| BrokerError::Connect {
                brokers: destination.brokers.clone(),
                reason: e.to_string(),
            })?;

        debug!(topic = %destination.topic, brokers = %destination.brokers, "producer created");
        Ok(Box::new(KafkaPublisher {
            producer,
            topic: destination.topic.clone(),
        }))
    }

    async fn subscribe(
        &self,
        destination: &Destination,
        group_id: Option<&str>,
    ) -> Result<Box<dyn RecordStream>, BrokerError> {
        let group_id = group_id.unwrap_or(DEFAULT_GROUP_ID);
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &destination.brokers)
            .set("group.id", group_id)
            .set("enable.auto.commit", "true")
            .set("auto.offset.reset", "earliest")
            .set("session.timeout.ms", "6000")
            .set("enable.partition.eof", "false")
            .create()
            .map_err(|e| BrokerError::Connect {
                brokers: destination.brokers.clone(),
                reason: e.to_string(),
            })?;

        consumer
            .subscribe(&[&destination.topic])
            .map_err(|e| BrokerError::Receive(format!("Failed to subscribe to topic: {e}")))?;

        debug!(topic = %destination.topic, group_id, "consumer subscribed");
        Ok(Box::new(KafkaRecordStream { consumer }))
    }
}

struct KafkaPublisher {
    producer: FutureProducer,
    topic: String,
}

#[async_trait]
impl Publisher for KafkaPublisher {
    async fn publish(&self, payload: &[u8]) -> Result<(), BrokerError> {
        let record = FutureRecord::<(), _>::to(&self.topic).payload(payload);
        self.producer
            .send(record, SEND_TIMEOUT)
            .await
            .map_err(|(e, _)| BrokerError::Publish(e.to_string()))?;
        Ok(())
    }
}

struct KafkaRecordStream {
    consumer: StreamConsumer,
}

#[async_trait]
impl RecordStream for KafkaRecordStream {
    async fn next_record(&mut self) -> Result<ConsumedRecord, BrokerError> {
        let msg = self
            .consumer
            .recv()
            .await
            .map_err(|e| BrokerError::Receive(e.to_string()))?;

        let payload = match msg.payload() {
            Some(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            None => String::new(),
        };

        Ok(ConsumedRecord {
            topic: msg.topic().to_string(),
            partition: msg.partition(),
            offset: msg.offset(),
            key: msg.key().map(|k| String::from_utf8_lossy(k).into_owned()),
            payload,
            timestamp: msg.timestamp().to_millis(),
        })
    }
}

/// Creates a topic, tolerating clusters where it already exists.
pub async fn create_topic_if_not_exists(
    brokers: &str,
    topic: &str,
    partitions: i32,
) -> Result<(), BrokerError> {
    let admin_client: AdminClient<DefaultClientContext> = ClientConfig::new()
        .set("bootstrap.servers", brokers)
        .create()
        .map_err(|e| BrokerError::Connect {
            brokers: brokers.to_string(),
            reason: e.to_string(),
        })?;

    let new_topic = NewTopic::new(topic, partitions, TopicReplication::Fixed(1));
    let opts = AdminOptions::new().operation_timeout(Some(Duration::from_secs(5)));

    let results = admin_client
        .create_topics(&[new_topic], &opts)
        .await
        .map_err(|e| BrokerError::Admin(format!("Failed to create topics: {e}")))?;

    for result in results {
        match result {
            Ok(topic_name) => {
                info!("Topic '{topic_name}' created successfully");
            }
            Err((topic_name, err)) => {
                if err.to_string().contains("already exists") {
                    info!("Topic '{topic_name}' already exists");
                } else {
                    return Err(BrokerError::Admin(format!(
                        "Failed to create topic '{topic_name}': {err}"
                    )));
                }
            }
        }
    }

    Ok(())
}
