//! `MetricsCollector` (spec.md §4.9): per-request latency/success
//! counters under a single mutex with an O(1) critical section
//! (spec.md §5).
//!
//! Grounded in the teacher's `Config`/lock-guarded-counters convention
//! (`parking_lot::Mutex`, used throughout `reflex-cache` for small
//! shared-state updates) rather than `RwLock`, since every update here
//! is a write.

#[cfg(test)]
mod tests;

use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;

/// A point-in-time snapshot of [`MetricsCollector`]'s counters
/// (spec.md §4.9). Field names are `camelCase` on the wire to match
/// spec.md §4.9's own naming (`queryCount`, `averageResponseTime`, ...).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    /// Total number of completed requests (success + failure).
    pub query_count: u64,
    /// Number of requests that completed without error.
    pub successful_queries: u64,
    /// Number of requests that completed with an error.
    pub failed_queries: u64,
    /// Running mean latency across all recorded requests, in milliseconds.
    pub average_response_time_ms: f64,
    /// The latency of the most recently recorded request, in milliseconds.
    pub last_response_time_ms: f64,
    /// The minimum latency ever recorded, in milliseconds.
    pub min_response_time_ms: f64,
    /// The maximum latency ever recorded, in milliseconds.
    pub max_response_time_ms: f64,
    /// Unix timestamp (seconds) of the last recorded failure, if any.
    pub last_error_time: Option<i64>,
    /// Unix timestamp (seconds) this collector was created.
    pub start_time: i64,
}

#[derive(Debug)]
struct Counters {
    query_count: u64,
    successful_queries: u64,
    failed_queries: u64,
    total_response_time_ms: f64,
    last_response_time_ms: f64,
    min_response_time_ms: f64,
    max_response_time_ms: f64,
    last_error_time: Option<i64>,
}

impl Default for Counters {
    fn default() -> Self {
        Self {
            query_count: 0,
            successful_queries: 0,
            failed_queries: 0,
            total_response_time_ms: 0.0,
            last_response_time_ms: 0.0,
            min_response_time_ms: f64::MAX,
            max_response_time_ms: 0.0,
            last_error_time: None,
        }
    }
}

/// Records `(duration, success)` for every RPC handler invocation
/// (spec.md §4.8/§4.9). Cheap to clone: internally an `Arc`-free
/// `Mutex`-guarded struct, intended to be held behind an `Arc` by callers
/// (matching [`crate::router::CollectionRouter`]'s own convention of
/// letting the caller choose the sharing strategy).
pub struct MetricsCollector {
    counters: Mutex<Counters>,
    start_time: Instant,
    start_unix: i64,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCollector {
    /// Creates a collector with all counters zeroed.
    pub fn new() -> Self {
        Self {
            counters: Mutex::new(Counters::default()),
            start_time: Instant::now(),
            start_unix: chrono::Utc::now().timestamp(),
        }
    }

    /// Records the outcome of one request. The critical section is O(1)
    /// per spec.md §5.
    pub fn record(&self, duration: Duration, success: bool) {
        let duration_ms = duration.as_secs_f64() * 1000.0;
        let mut counters = self.counters.lock();

        counters.query_count += 1;
        if success {
            counters.successful_queries += 1;
        } else {
            counters.failed_queries += 1;
            counters.last_error_time = Some(chrono::Utc::now().timestamp());
        }

        counters.total_response_time_ms += duration_ms;
        counters.last_response_time_ms = duration_ms;
        counters.min_response_time_ms = counters.min_response_time_ms.min(duration_ms);
        counters.max_response_time_ms = counters.max_response_time_ms.max(duration_ms);
    }

    /// Returns a consistent snapshot of every counter.
    pub fn snapshot(&self) -> PerformanceMetrics {
        let counters = self.counters.lock();
        let average = if counters.query_count > 0 {
            counters.total_response_time_ms / counters.query_count as f64
        } else {
            0.0
        };
        let min = if counters.query_count > 0 {
            counters.min_response_time_ms
        } else {
            0.0
        };

        PerformanceMetrics {
            query_count: counters.query_count,
            successful_queries: counters.successful_queries,
            failed_queries: counters.failed_queries,
            average_response_time_ms: average,
            last_response_time_ms: counters.last_response_time_ms,
            min_response_time_ms: min,
            max_response_time_ms: counters.max_response_time_ms,
            last_error_time: counters.last_error_time,
            start_time: self.start_unix,
        }
    }

    /// Wall-clock uptime since this collector was created.
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }
}
