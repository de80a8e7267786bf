//! In-process run counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Aggregate counters for one pipeline run
#[derive(Debug, Default)]
pub struct Metrics {
    records_delivered: AtomicU64,
    deliveries_failed: AtomicU64,
    videos_skipped: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_delivered(&self) {
        self.records_delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn delivery_failed(&self) {
        self.deliveries_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn video_skipped(&self) {
        self.videos_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            records_delivered: self.records_delivered.load(Ordering::Relaxed),
            deliveries_failed: self.deliveries_failed.load(Ordering::Relaxed),
            videos_skipped: self.videos_skipped.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub records_delivered: u64,
    pub deliveries_failed: u64,
    pub videos_skipped: u64,
}
