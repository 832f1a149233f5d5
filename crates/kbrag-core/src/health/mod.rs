//! `HealthMonitor` (spec.md §4.9): periodic capability-health checks with
//! a bounded automatic-restart budget, plus the on-demand checks the RPC
//! surface needs for `HealthCheck`/`DetailedHealthCheck`.
//!
//! The background ticker's shape — a single `tokio::spawn`'d task behind
//! an `Arc<AtomicBool>` running-guard, woken by `tokio::time::interval`,
//! breaking out on a shutdown flag — is grounded in the teacher's idle
//! reaper (`src/lifecycle/manager.rs::start_reaper_thread`). The trigger
//! differs (there: idle timeout => stop the instance; here: unhealthy
//! dependency => bounded restart attempts) but the control-flow skeleton
//! is the same shape, repurposed per SPEC_FULL §4.9.
//!
//! Neither [`crate::vectorstore::VectorStore`] nor [`crate::llm::LLMClient`]
//! expose a `Reinitialize`/`Initialize` operation (spec.md §4.1/§4.2 name
//! only `Health`), so "restart" here means "re-poll `Health` after
//! `restart_delay`, up to `max_restarts` times" rather than tearing down
//! and rebuilding the client — the closest faithful reading of spec.md
//! §4.9 given the capabilities actually on offer. See DESIGN.md.

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{info, warn};

use crate::llm::LLMClient;
use crate::vectorstore::VectorStore;

/// The well-known name `HealthCheck`/`DetailedHealthCheck` use for the
/// vector store dependency (spec.md §8 scenario 7).
pub const VECTOR_DB: &str = "vector_db";
/// The well-known name for the LLM dependency.
pub const LLM_CLIENT: &str = "llm_client";

/// One dependency's health as of its last check (spec.md §4.9).
#[derive(Debug, Clone)]
pub struct HealthStatus {
    /// Whether the dependency reported itself reachable and serving.
    pub healthy: bool,
    /// A short detail string: `"healthy"` or `"unhealthy: <reason>"`
    /// (spec.md §8 scenario 7's `services["llm_client"]` shape).
    pub detail: String,
    /// Unix timestamp (seconds) this status was observed.
    pub checked_at: i64,
}

impl HealthStatus {
    fn ok() -> Self {
        Self {
            healthy: true,
            detail: "healthy".to_string(),
            checked_at: Utc::now().timestamp(),
        }
    }

    fn err(reason: impl std::fmt::Display) -> Self {
        Self {
            healthy: false,
            detail: format!("unhealthy: {reason}"),
            checked_at: Utc::now().timestamp(),
        }
    }
}

/// Periodic dependency-health checks (spec.md §4.9): a `tokio::time::
/// interval` ticker (default 30s, `Config::health_interval`) that polls
/// each capability's `Health`, stores a boolean-ish status per name
/// (replaced atomically each tick per spec.md §5), and — on a failing
/// dependency — retries up to `max_restarts` times with `restart_delay`
/// between attempts.
pub struct HealthMonitor {
    vector_store: Arc<dyn VectorStore>,
    llm: Arc<dyn LLMClient>,
    statuses: RwLock<HashMap<String, HealthStatus>>,
    max_restarts: u32,
    restart_delay: Duration,
    running: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
}

impl HealthMonitor {
    /// Builds a monitor over the two core dependencies, with an empty
    /// (unchecked) status map until the first [`HealthMonitor::check_now`]
    /// or ticker tick.
    pub fn new(
        vector_store: Arc<dyn VectorStore>,
        llm: Arc<dyn LLMClient>,
        max_restarts: u32,
        restart_delay: Duration,
    ) -> Self {
        Self {
            vector_store,
            llm,
            statuses: RwLock::new(HashMap::new()),
            max_restarts,
            restart_delay,
            running: Arc::new(AtomicBool::new(false)),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Polls both dependencies immediately and replaces the cached
    /// status map atomically (spec.md §5: "replaced atomically on each
    /// check"). Used directly by the RPC `HealthCheck`/`DetailedHealthCheck`
    /// handlers so an operator never sees a status staler than their
    /// own request.
    pub async fn check_now(&self) -> HashMap<String, HealthStatus> {
        let vector_status = match self.vector_store.health().await {
            Ok(()) => HealthStatus::ok(),
            Err(err) => HealthStatus::err(err),
        };
        let llm_status = match self.llm.health().await {
            Ok(()) => HealthStatus::ok(),
            Err(err) => HealthStatus::err(err),
        };

        let mut map = HashMap::with_capacity(2);
        map.insert(VECTOR_DB.to_string(), vector_status);
        map.insert(LLM_CLIENT.to_string(), llm_status);

        *self.statuses.write() = map.clone();
        map
    }

    /// The most recently observed status map, without making a new call
    /// (cheap; for callers that already tolerate ticker-interval staleness).
    pub fn snapshot(&self) -> HashMap<String, HealthStatus> {
        self.statuses.read().clone()
    }

    /// `"healthy"` iff every entry in `statuses` is healthy, else
    /// `"unhealthy"` (spec.md §4.8 `HealthCheck`).
    pub fn overall_status(statuses: &HashMap<String, HealthStatus>) -> &'static str {
        if statuses.values().all(|s| s.healthy) {
            "healthy"
        } else {
            "unhealthy"
        }
    }

    /// Starts the background ticker (no-op if already running), matching
    /// the teacher reaper's idempotent `start_reaper_thread` (spec.md §4.9,
    /// `Config::health_interval`).
    pub fn start_ticker(self: &Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        if self.running.swap(true, Ordering::AcqRel) {
            return tokio::spawn(async {});
        }

        let monitor = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if monitor.shutdown.load(Ordering::Acquire) {
                    break;
                }

                let statuses = monitor.check_now().await;
                for (name, status) in statuses.iter().filter(|(_, s)| !s.healthy) {
                    warn!(dependency = %name, detail = %status.detail, "dependency unhealthy, attempting bounded restart");
                    monitor.attempt_restart(name).await;
                }
            }
            monitor.running.store(false, Ordering::Release);
        })
    }

    /// Signals the ticker to stop at its next tick.
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    async fn attempt_restart(&self, name: &str) {
        for attempt in 1..=self.max_restarts {
            tokio::time::sleep(self.restart_delay).await;

            let recovered = match name {
                VECTOR_DB => self.vector_store.health().await.is_ok(),
                LLM_CLIENT => self.llm.health().await.is_ok(),
                _ => true,
            };

            if recovered {
                info!(dependency = %name, attempt, "dependency recovered");
                let mut statuses = self.statuses.write();
                statuses.insert(name.to_string(), HealthStatus::ok());
                return;
            }
        }
        warn!(dependency = %name, max_restarts = self.max_restarts, "dependency still unhealthy after exhausting restart budget");
    }
}
