//! Kafka-backed [`BrokerClient`] on rdkafka's threaded producer
//!
//! Delivery confirmations arrive on the producer's internal poll thread and
//! are handed to the per-record callback via the delivery opaque; nothing of
//! that thread is exposed to the pipeline.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rdkafka::ClientConfig;
use rdkafka::client::ClientContext;
use rdkafka::message::Message;
use rdkafka::producer::{
    BaseRecord, DeliveryResult, Producer, ProducerContext, ThreadedProducer,
};
use rdkafka::util::Timeout;
use tracing::warn;

use super::broker::{
    BrokerClient, BrokerError, DeliveryCallback, DeliveryError, DeliveryOutcome, Result,
};
use crate::config::KafkaConfig;

/// Carries the per-record completion callback through librdkafka.
pub struct DeliveryHook {
    callback: DeliveryCallback,
}

struct CallbackContext;

impl ClientContext for CallbackContext {}

impl ProducerContext for CallbackContext {
    type DeliveryOpaque = Box<DeliveryHook>;

    fn delivery(&self, result: &DeliveryResult<'_>, hook: Self::DeliveryOpaque) {
        let outcome = match result {
            Ok(message) => DeliveryOutcome::Delivered {
                partition: message.partition(),
                offset: message.offset(),
            },
            Err((err, _)) => DeliveryOutcome::Failed(DeliveryError {
                cause: err.to_string(),
            }),
        };
        let DeliveryHook { callback } = *hook;
        callback(outcome);
    }
}

pub struct KafkaBroker {
    producer: Arc<ThreadedProducer<CallbackContext>>,
    topic: String,
}

impl KafkaBroker {
    pub fn new(config: &KafkaConfig) -> Result<Self> {
        let mut client_config = ClientConfig::new();
        client_config.set("bootstrap.servers", &config.bootstrap_servers);
        for (key, value) in &config.properties {
            client_config.set(key, value);
        }

        let producer = client_config
            .create_with_context(CallbackContext)
            .map_err(|e| BrokerError::Connect(e.to_string()))?;

        Ok(Self {
            producer: Arc::new(producer),
            topic: config.topic.clone(),
        })
    }
}

#[async_trait]
impl BrokerClient for KafkaBroker {
    fn produce(&self, key: &str, payload: Vec<u8>, on_delivery: DeliveryCallback) -> Result<()> {
        let hook = Box::new(DeliveryHook {
            callback: on_delivery,
        });
        let record = BaseRecord::with_opaque_to(&self.topic, hook)
            .key(key)
            .payload(&payload);

        // A synchronous rejection concerns this record only (oversized
        // payload, full local queue); report it through the callback like any
        // other failed delivery so later records still flow.
        if let Err((err, record)) = self.producer.send(record) {
            let DeliveryHook { callback } = *record.delivery_opaque;
            callback(DeliveryOutcome::Failed(DeliveryError {
                cause: err.to_string(),
            }));
        }
        Ok(())
    }

    async fn flush(&self, timeout: Duration) {
        let producer = Arc::clone(&self.producer);
        let flushed = tokio::task::spawn_blocking(move || {
            producer.flush(Timeout::After(timeout))
        })
        .await;

        match flushed {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(error = %err, "kafka flush did not drain in time"),
            Err(err) => warn!(error = %err, "kafka flush task failed"),
        }
    }
}
