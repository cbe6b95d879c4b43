//! Application metrics collection and reporting.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use tile_common::TileError;
use tokio::sync::RwLock;

/// Metrics collector for the tile API.
#[derive(Debug)]
pub struct MetricsCollector {
    /// Pixel grid requests
    pub tile_requests: AtomicU64,
    pub grids_served: AtomicU64,

    /// Remote fetches
    pub fetches: AtomicU64,
    pub fetch_bytes: AtomicU64,

    /// Failures by error code
    errors: RwLock<HashMap<&'static str, u64>>,

    /// Fetch timing (microseconds)
    fetch_times: RwLock<TimingStats>,

    start_time: Instant,
}

#[derive(Debug, Default)]
struct TimingStats {
    count: u64,
    total_us: u64,
    min_us: u64,
    max_us: u64,
    last_us: u64,
}

impl TimingStats {
    fn record(&mut self, duration_us: u64) {
        self.count += 1;
        self.total_us += duration_us;
        self.last_us = duration_us;
        if self.min_us == 0 || duration_us < self.min_us {
            self.min_us = duration_us;
        }
        if duration_us > self.max_us {
            self.max_us = duration_us;
        }
    }

    fn avg_ms(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.total_us as f64 / self.count as f64) / 1000.0
        }
    }
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            tile_requests: AtomicU64::new(0),
            grids_served: AtomicU64::new(0),
            fetches: AtomicU64::new(0),
            fetch_bytes: AtomicU64::new(0),
            errors: RwLock::new(HashMap::new()),
            fetch_times: RwLock::new(TimingStats::default()),
            start_time: Instant::now(),
        }
    }

    /// Record an incoming pixel grid request.
    pub fn record_tile_request(&self, layer: &str) {
        self.tile_requests.fetch_add(1, Ordering::Relaxed);
        counter!("tile_requests_total", "layer" => layer.to_string()).increment(1);
    }

    /// Record a completed remote fetch.
    pub async fn record_fetch(&self, bytes: usize, duration_us: u64) {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        self.fetch_bytes.fetch_add(bytes as u64, Ordering::Relaxed);
        counter!("tile_fetch_bytes_total").increment(bytes as u64);
        histogram!("tile_fetch_duration_seconds").record(duration_us as f64 / 1_000_000.0);

        self.fetch_times.write().await.record(duration_us);
    }

    pub fn record_grid_served(&self) {
        self.grids_served.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed request, labelled by error code.
    pub async fn record_error(&self, error: &TileError) {
        let kind = error.error_code();
        counter!("tile_errors_total", "kind" => kind).increment(1);

        *self.errors.write().await.entry(kind).or_insert(0) += 1;
    }

    pub async fn snapshot(&self) -> MetricsSnapshot {
        let fetch_times = self.fetch_times.read().await;
        let errors = self
            .errors
            .read()
            .await
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect();

        MetricsSnapshot {
            uptime_secs: self.start_time.elapsed().as_secs(),
            tile_requests: self.tile_requests.load(Ordering::Relaxed),
            grids_served: self.grids_served.load(Ordering::Relaxed),
            fetches: self.fetches.load(Ordering::Relaxed),
            fetch_bytes: self.fetch_bytes.load(Ordering::Relaxed),
            fetch_avg_ms: fetch_times.avg_ms(),
            fetch_last_ms: fetch_times.last_us as f64 / 1000.0,
            fetch_min_ms: fetch_times.min_us as f64 / 1000.0,
            fetch_max_ms: fetch_times.max_us as f64 / 1000.0,
            errors,
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of current metrics for JSON serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: u64,

    pub tile_requests: u64,
    pub grids_served: u64,

    pub fetches: u64,
    pub fetch_bytes: u64,
    pub fetch_avg_ms: f64,
    pub fetch_last_ms: f64,
    pub fetch_min_ms: f64,
    pub fetch_max_ms: f64,

    pub errors: HashMap<String, u64>,
}

/// Timer for measuring operation duration.
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_micros() as f64 / 1000.0
    }
}
