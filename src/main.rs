//! Command-line interface for stream-tester
//!
//! # Usage Examples
//!
//! ## Render
//! ```bash
//! # Render five sample messages from a scenario, no broker needed
//! stream-tester render --scenario scenario.yaml --count 5
//! ```
//!
//! ## Produce
//! ```bash
//! # Publish templated messages to a topic until Ctrl+C or the
//! # scenario's stop-after limit
//! stream-tester produce \
//!   --brokers localhost:9092 \
//!   --topic orders \
//!   --scenario scenario.yaml \
//!   --create-topic
//! ```
//!
//! ## Consume
//! ```bash
//! # Print every record from a topic until Ctrl+C
//! stream-tester consume \
//!   --brokers localhost:9092 \
//!   --topic orders \
//!   --group-id my-group
//! ```
//!
//! ## Scenario Format
//! ```yaml
//! template: '{"orderId":{{id}},"amount":{{amount}}}'
//! intervalMs: 500
//! stopAfter:
//!   enabled: true
//!   count: 100
//! parameters:
//!   - name: id
//!     isRandomized: true
//!     type: uuid
//!   - name: amount
//!     isRandomized: true
//!     type: number
//!     constraints: ["min:1", "max:500", "precision:2"]
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use stream_core::{ConsumerConfig, Destination, SessionState, StreamScenario};
use stream_generator::{BuiltinCatalog, MessageRenderer};
use stream_kafka::KafkaBroker;
use stream_session::SessionRegistry;

#[derive(Parser)]
#[command(name = "stream-tester")]
#[command(about = "Synthetic Kafka load tool with templated message generation")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render sample messages from a scenario to stdout
    Render {
        /// Scenario YAML file
        #[arg(long)]
        scenario: PathBuf,

        /// Number of messages to render
        #[arg(long, default_value_t = 1)]
        count: u32,
    },

    /// Run one producer session against a Kafka topic
    Produce {
        /// Kafka brokers (comma-separated list)
        #[arg(long, env = "KAFKA_BROKERS", default_value = "localhost:9092")]
        brokers: String,

        /// Topic to publish to
        #[arg(long)]
        topic: String,

        /// Scenario YAML file
        #[arg(long)]
        scenario: PathBuf,

        /// Create the topic before producing
        #[arg(long)]
        create_topic: bool,

        /// Partition count used with --create-topic
        #[arg(long, default_value_t = 1)]
        partitions: i32,
    },

    /// Run one consumer session against a Kafka topic
    Consume {
        /// Kafka brokers (comma-separated list)
        #[arg(long, env = "KAFKA_BROKERS", default_value = "localhost:9092")]
        brokers: String,

        /// Topic to subscribe to
        #[arg(long)]
        topic: String,

        /// Consumer group id (a default is used when omitted)
        #[arg(long)]
        group_id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render { scenario, count } => render_samples(&scenario, count),
        Commands::Produce {
            brokers,
            topic,
            scenario,
            create_topic,
            partitions,
        } => produce(brokers, topic, scenario, create_topic, partitions).await,
        Commands::Consume {
            brokers,
            topic,
            group_id,
        } => consume(brokers, topic, group_id).await,
    }
}

fn load_scenario(path: &PathBuf) -> anyhow::Result<StreamScenario> {
    StreamScenario::from_file(path).with_context(|| format!("Failed to load scenario from {path:?}"))
}

fn render_samples(path: &PathBuf, count: u32) -> anyhow::Result<()> {
    let scenario = load_scenario(path)?;
    let mut renderer = MessageRenderer::new(Arc::new(BuiltinCatalog), scenario.seed);

    for _ in 0..count {
        let rendered = renderer.render(&scenario.template, &scenario.parameters);
        for issue in &rendered.issues {
            tracing::warn!(
                parameter = %issue.parameter,
                error = %issue.error,
                "placeholder left unrendered"
            );
        }
        println!("{}", rendered.message);
    }

    Ok(())
}

async fn produce(
    brokers: String,
    topic: String,
    scenario_path: PathBuf,
    create_topic: bool,
    partitions: i32,
) -> anyhow::Result<()> {
    let scenario = load_scenario(&scenario_path)?;

    if create_topic {
        stream_kafka::create_topic_if_not_exists(&brokers, &topic, partitions)
            .await
            .with_context(|| format!("Failed to create topic '{topic}'"))?;
    }

    let registry = SessionRegistry::with_defaults(Arc::new(KafkaBroker::new()));
    let config = scenario.into_producer_config(Destination::new(&topic, &brokers));
    registry.start_producer("produce", config).await?;
    info!(topic = %topic, brokers = %brokers, "producer session started, Ctrl+C to stop");

    wait_for_session_end(&registry, "produce").await?;
    registry.shutdown().await;
    Ok(())
}

async fn consume(brokers: String, topic: String, group_id: Option<String>) -> anyhow::Result<()> {
    let registry = SessionRegistry::with_defaults(Arc::new(KafkaBroker::new()));
    let config = ConsumerConfig {
        destination: Destination::new(&topic, &brokers),
        group_id,
    };
    registry.connect_consumer("consume", config).await?;
    info!(topic = %topic, brokers = %brokers, "consumer session connected, Ctrl+C to stop");

    wait_for_session_end(&registry, "consume").await?;
    registry.shutdown().await;
    Ok(())
}

/// Blocks until the session goes idle on its own or Ctrl+C arrives.
async fn wait_for_session_end(registry: &SessionRegistry, id: &str) -> anyhow::Result<()> {
    let mut shutdown_rx = setup_shutdown_handler();

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                info!("Shutdown requested, stopping session");
                return Ok(());
            }
            _ = tokio::time::sleep(Duration::from_millis(200)) => {
                if registry.state(id).await? == SessionState::Idle {
                    info!(session = %id, "session finished");
                    return Ok(());
                }
            }
        }
    }
}

/// Sets up a shutdown signal handler
fn setup_shutdown_handler() -> tokio::sync::broadcast::Receiver<()> {
    let (shutdown_tx, shutdown_rx) = tokio::sync::broadcast::channel(1);

    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");

        info!("\nReceived interrupt signal (Ctrl+C)");
        let _ = shutdown_tx.send(());
    });

    shutdown_rx
}
