//! Broker client abstraction
//!
//! The pipeline only needs this interface; the real Kafka implementation
//! lives in [`super::kafka`]. `MockBroker` is exposed (not test-gated) so
//! integration tests can drive delivery completions by hand.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("failed to create producer: {0}")]
    Connect(String),

    #[error("produce failed: {0}")]
    Produce(String),
}

pub type Result<T> = std::result::Result<T, BrokerError>;

/// Final broker-side disposition of one published record.
#[derive(Debug, Clone)]
pub enum DeliveryOutcome {
    Delivered { partition: i32, offset: i64 },
    Failed(DeliveryError),
}

#[derive(Debug, Clone, Error)]
#[error("delivery failed: {cause}")]
pub struct DeliveryError {
    pub cause: String,
}

/// Invoked exactly once per produced record, on the broker client's own
/// completion path. Must only report the outcome, never touch traversal state.
pub type DeliveryCallback = Box<dyn FnOnce(DeliveryOutcome) + Send + Sync + 'static>;

/// Asynchronous producer bound to a single topic.
#[async_trait]
pub trait BrokerClient: Send + Sync {
    /// Enqueue one record for delivery and return without waiting for broker
    /// acknowledgment. Implementations must invoke `on_delivery` exactly once
    /// per record; a rejection that concerns this record alone is reported as
    /// a failed outcome through the callback, not as `Err`. `Err` is reserved
    /// for faults that leave the client unable to accept further records.
    fn produce(&self, key: &str, payload: Vec<u8>, on_delivery: DeliveryCallback) -> Result<()>;

    /// Hint to push out anything still queued client-side, waiting at most
    /// `timeout`. Completion accounting happens through the callbacks.
    async fn flush(&self, timeout: Duration);
}

/// In-memory broker double, mirroring the real client's callback contract.
#[derive(Default)]
pub struct MockBroker {
    auto_ack: bool,
    pending: Mutex<VecDeque<DeliveryCallback>>,
    produced: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MockBroker {
    /// Every produce is acknowledged immediately with a success outcome.
    pub fn acking() -> Self {
        Self {
            auto_ack: true,
            ..Self::default()
        }
    }

    /// Deliveries stay pending until [`MockBroker::complete_next`] is called.
    pub fn manual() -> Self {
        Self::default()
    }

    /// Complete the oldest pending delivery with `outcome`. Returns `false`
    /// when nothing is pending.
    pub fn complete_next(&self, outcome: DeliveryOutcome) -> bool {
        let callback = self.pending.lock().expect("lock poisoned").pop_front();
        match callback {
            Some(callback) => {
                callback(outcome);
                true
            }
            None => false,
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().expect("lock poisoned").len()
    }

    pub fn produced(&self) -> Vec<(String, Vec<u8>)> {
        self.produced.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl BrokerClient for MockBroker {
    fn produce(&self, key: &str, payload: Vec<u8>, on_delivery: DeliveryCallback) -> Result<()> {
        let offset = {
            let mut produced = self.produced.lock().expect("lock poisoned");
            produced.push((key.to_string(), payload));
            produced.len() as i64 - 1
        };

        if self.auto_ack {
            on_delivery(DeliveryOutcome::Delivered {
                partition: 0,
                offset,
            });
        } else {
            self.pending
                .lock()
                .expect("lock poisoned")
                .push_back(on_delivery);
        }
        Ok(())
    }

    async fn flush(&self, _timeout: Duration) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn acking_broker_completes_inline() {
        let broker = MockBroker::acking();
        let completions = Arc::new(AtomicUsize::new(0));

        let seen = Arc::clone(&completions);
        broker
            .produce(
                "k1",
                b"payload".to_vec(),
                Box::new(move |outcome| {
                    assert!(matches!(outcome, DeliveryOutcome::Delivered { .. }));
                    seen.fetch_add(1, Ordering::Relaxed);
                }),
            )
            .unwrap();

        assert_eq!(completions.load(Ordering::Relaxed), 1);
        assert_eq!(broker.produced().len(), 1);
    }

    #[test]
    fn manual_broker_holds_callbacks_until_completed() {
        let broker = MockBroker::manual();
        let completions = Arc::new(AtomicUsize::new(0));

        let seen = Arc::clone(&completions);
        broker
            .produce(
                "k1",
                vec![1, 2, 3],
                Box::new(move |_| {
                    seen.fetch_add(1, Ordering::Relaxed);
                }),
            )
            .unwrap();

        assert_eq!(broker.pending_count(), 1);
        assert_eq!(completions.load(Ordering::Relaxed), 0);

        assert!(broker.complete_next(DeliveryOutcome::Failed(DeliveryError {
            cause: "broker down".to_string(),
        })));
        assert_eq!(completions.load(Ordering::Relaxed), 1);
        assert!(!broker.complete_next(DeliveryOutcome::Delivered {
            partition: 0,
            offset: 0,
        }));
    }
}
