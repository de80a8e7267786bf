//! Schema-validating publisher with bounded in-flight deliveries

pub mod broker;
pub mod encoder;
pub mod kafka;
pub mod registry;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{Notify, Semaphore};
use tracing::{debug, warn};

use crate::observability::Metrics;
use crate::record::PublishRecord;

pub use broker::{BrokerClient, BrokerError, DeliveryCallback, DeliveryError, DeliveryOutcome, MockBroker};
pub use encoder::{AvroEncoder, EncodeError};
pub use kafka::KafkaBroker;
pub use registry::{RegisteredSchema, RegistryError, SchemaRegistryClient};

#[derive(Debug, Error)]
pub enum PublishError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Broker(#[from] BrokerError),
}

pub type Result<T> = std::result::Result<T, PublishError>;

/// Publishes encoded records through one broker client bound to one topic and
/// one pre-resolved schema.
///
/// At most `queue_capacity` deliveries are in flight at a time. When the slot
/// budget is exhausted, [`Publisher::publish`] blocks the caller instead of
/// dropping or buffering without bound, so broker slowness propagates back to
/// the traversal.
pub struct Publisher {
    client: Arc<dyn BrokerClient>,
    encoder: AvroEncoder,
    slots: Arc<Semaphore>,
    queue_capacity: usize,
    completed: Arc<Notify>,
    metrics: Arc<Metrics>,
}

impl Publisher {
    pub fn new(
        client: Arc<dyn BrokerClient>,
        encoder: AvroEncoder,
        queue_capacity: usize,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            client,
            encoder,
            slots: Arc::new(Semaphore::new(queue_capacity)),
            queue_capacity,
            completed: Arc::new(Notify::new()),
            metrics,
        }
    }

    /// Validate-encode `record` and enqueue it for delivery, returning once
    /// the broker client has accepted it. Does not wait for acknowledgment.
    ///
    /// The delivery completion releases the in-flight slot and reports the
    /// outcome: failures are logged and counted, never retried here, and
    /// never abort the run.
    pub async fn publish(&self, key: &str, record: &PublishRecord) -> Result<()> {
        let payload = self.encoder.encode(record)?;

        let permit = Arc::clone(&self.slots)
            .acquire_owned()
            .await
            .map_err(|_| BrokerError::Produce("publisher is shut down".to_string()))?;

        let video_id = key.to_string();
        let metrics = Arc::clone(&self.metrics);
        let completed = Arc::clone(&self.completed);
        let on_delivery: DeliveryCallback = Box::new(move |outcome| {
            match outcome {
                DeliveryOutcome::Delivered { partition, offset } => {
                    debug!(video_id = %video_id, partition, offset, "record delivered");
                    metrics.record_delivered();
                }
                DeliveryOutcome::Failed(err) => {
                    warn!(video_id = %video_id, error = %err, "record delivery failed");
                    metrics.delivery_failed();
                }
            }
            drop(permit);
            completed.notify_waiters();
        });

        self.client.produce(key, payload, on_delivery)?;
        Ok(())
    }

    /// Block until every enqueued delivery has completed or `timeout`
    /// elapses. Returns the number of records still undelivered.
    pub async fn flush(&self, timeout: Duration) -> usize {
        let deadline = tokio::time::Instant::now() + timeout;
        self.client.flush(timeout).await;

        loop {
            // Register for completion wakeups before reading the in-flight
            // count; notify_waiters only reaches already-registered waiters,
            // so the other order can miss a completion and stall until the
            // deadline.
            let completed = self.completed.notified();
            tokio::pin!(completed);
            completed.as_mut().enable();

            let in_flight = self.in_flight();
            if in_flight == 0 {
                return 0;
            }
            if tokio::time::Instant::now() >= deadline {
                return in_flight;
            }
            let _ = tokio::time::timeout_at(deadline, completed).await;
        }
    }

    fn in_flight(&self) -> usize {
        self.queue_capacity - self.slots.available_permits()
    }
}
