use std::sync::atomic::{AtomicU64, Ordering};
use serde::Serialize;

#[derive(Debug, Default)]
pub struct Metrics {
    pub total_requests: AtomicU64,
    pub successes: AtomicU64,
    pub client_errors: AtomicU64,
    pub upstream_errors: AtomicU64,
    pub internal_errors: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {

        Self::default()

    }

    pub fn record_success(&self) {

        self.successes.fetch_add(1, Ordering::Relaxed);
        self.total_requests.fetch_add(1, Ordering::Relaxed);

    }

    // missing or malformed inbound fields
    pub fn record_client_error(&self) {

        self.client_errors.fetch_add(1, Ordering::Relaxed);
        self.total_requests.fetch_add(1, Ordering::Relaxed);

    }

    // downstream answered with a non-2xx status
    pub fn record_upstream_error(&self) {

        self.upstream_errors.fetch_add(1, Ordering::Relaxed);
        self.total_requests.fetch_add(1, Ordering::Relaxed);

    }

    pub fn record_internal_error(&self) {

        self.internal_errors.fetch_add(1, Ordering::Relaxed);
        self.total_requests.fetch_add(1, Ordering::Relaxed);

    }

    pub fn snapshot(&self) -> MetricsSnapshot {

        let mut snapshot = MetricsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            client_errors: self.client_errors.load(Ordering::Relaxed),
            upstream_errors: self.upstream_errors.load(Ordering::Relaxed),
            internal_errors: self.internal_errors.load(Ordering::Relaxed),
            success_rate: 0.0,
        };
        snapshot.success_rate = snapshot.compute_success_rate();
        snapshot

    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub successes: u64,
    pub client_errors: u64,
    pub upstream_errors: u64,
    pub internal_errors: u64,
    pub success_rate: f64,
}

impl MetricsSnapshot {
    fn compute_success_rate(&self) -> f64 {

        if self.total_requests == 0 {
            return 0.0;
        }
        (self.successes as f64 / self.total_requests as f64) * 100.0

    }
}
