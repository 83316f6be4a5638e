//! Performance metrics and statistics tracking for the estimation service.

use crate::types::EstimateStatus;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::info;

/// Retained latency samples; older half is dropped past this
const MAX_SAMPLES: usize = 10_000;

/// Metrics collector for request handling
pub struct ServiceMetrics {
    /// Total requests handled
    pub requests_handled: AtomicU64,
    /// Requests by outcome
    by_status: RwLock<HashMap<EstimateStatus, u64>>,
    /// Handling times (in microseconds)
    processing_times: RwLock<Vec<u64>>,
    /// Estimated prices, for the running mean
    price_sum: RwLock<f64>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl ServiceMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            requests_handled: AtomicU64::new(0),
            by_status: RwLock::new(HashMap::new()),
            processing_times: RwLock::new(Vec::with_capacity(1000)),
            price_sum: RwLock::new(0.0),
            start_time: Instant::now(),
        }
    }

    /// Record one handled request
    pub fn record_request(&self, status: EstimateStatus, processing_time: Duration, price: Option<f64>) {
        self.requests_handled.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut by_status) = self.by_status.write() {
            *by_status.entry(status).or_insert(0) += 1;
        }

        if let Ok(mut times) = self.processing_times.write() {
            times.push(processing_time.as_micros() as u64);
            if times.len() > MAX_SAMPLES {
                times.drain(0..MAX_SAMPLES / 2);
            }
        }

        if let Some(price) = price {
            if let Ok(mut sum) = self.price_sum.write() {
                *sum += price;
            }
        }
    }

    /// Count of requests with the given outcome
    pub fn status_count(&self, status: EstimateStatus) -> u64 {
        self.by_status
            .read()
            .map(|by_status| by_status.get(&status).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Get processing time statistics
    pub fn get_processing_stats(&self) -> ProcessingStats {
        let mut sorted = match self.processing_times.read() {
            Ok(times) if !times.is_empty() => times.clone(),
            _ => return ProcessingStats::default(),
        };
        sorted.sort_unstable();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: sorted[count - 1],
        }
    }

    /// Mean estimated price over successful requests
    pub fn mean_price(&self) -> Option<f64> {
        let estimated = self.status_count(EstimateStatus::Ok);
        if estimated == 0 {
            return None;
        }
        self.price_sum.read().ok().map(|sum| *sum / estimated as f64)
    }

    /// Get current throughput (requests per second)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.requests_handled.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Log summary statistics
    pub fn print_summary(&self) {
        let handled = self.requests_handled.load(Ordering::Relaxed);
        let processing = self.get_processing_stats();

        info!(
            handled = handled,
            estimated = self.status_count(EstimateStatus::Ok),
            rejected = self.status_count(EstimateStatus::Rejected),
            failed = self.status_count(EstimateStatus::Failed),
            unavailable = self.status_count(EstimateStatus::Unavailable),
            throughput = format!("{:.1} req/s", self.get_throughput()),
            mean_us = processing.mean_us,
            p50_us = processing.p50_us,
            p95_us = processing.p95_us,
            p99_us = processing.p99_us,
            max_us = processing.max_us,
            mean_price = self.mean_price().unwrap_or(0.0),
            "Estimation service metrics"
        );
    }
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Processing time statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Periodic metrics reporter
pub struct MetricsReporter {
    metrics: Arc<ServiceMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: Arc<ServiceMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs.max(1)));
        // The first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}
