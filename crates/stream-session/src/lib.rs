//! Session engine: concurrently running producer and consumer sessions
//!
//! A session is a named, long-lived streaming activity against one topic.
//! Producer sessions render a message from a template once per interval and
//! publish it; consumer sessions subscribe to a topic and forward every
//! record they receive. The [`SessionRegistry`] owns all sessions and is the
//! only entry point for lifecycle operations.
//!
//! ```text
//!                 +------------------+
//!   start/pause   |                  |   spawn        +---------------+
//!   stop/connect  |  SessionRegistry |--------------->| producer task |--> Publisher
//!  -------------->|                  |   watch ctrl   +---------------+
//!                 |  id -> entry     |--------------->| consumer task |<-- RecordStream
//!                 +------------------+                +---------------+
//!                                                            |
//!                                                            v
//!                                                      StreamObserver
//! ```
//!
//! Broker access goes through the [`BrokerClient`] trait so the engine can
//! be driven against an in-memory broker in tests and against Kafka in
//! production.

pub mod broker;
mod consumer;
pub mod error;
pub mod observer;
mod producer;
pub mod registry;

pub use broker::{BrokerClient, BrokerError, ConsumedRecord, Publisher, RecordStream};
pub use error::SessionError;
pub use observer::{LogObserver, StreamObserver};
pub use registry::SessionRegistry;
