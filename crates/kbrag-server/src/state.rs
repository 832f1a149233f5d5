//! The process-wide state every RPC handler reads (spec.md §9 "Avoid
//! global mutable state": one `Server` instance owning one `Agent`, one
//! `Vectorizer`, one `CollectionRouter`, held here behind `Arc`s instead
//! of package-level statics).

use std::sync::Arc;

use kbrag_core::config::Config;
use kbrag_core::health::HealthMonitor;
use kbrag_core::metrics::MetricsCollector;
use kbrag_core::{Agent, Vectorizer};

/// Everything a dispatched RPC call needs. Cheap to clone (every field
/// is an `Arc`), so each connection/task can hold its own copy.
#[derive(Clone)]
pub struct ServerState {
    /// Orchestrates `Query`.
    pub agent: Arc<Agent>,
    /// Backs `SyncKeybindings`/`UpdateKeybindings`.
    pub vectorizer: Arc<Vectorizer>,
    /// Backs `HealthCheck`/`DetailedHealthCheck`.
    pub health: Arc<HealthMonitor>,
    /// Backs `GetMetrics` and every handler's `(duration, success)` record.
    pub metrics: Arc<MetricsCollector>,
    /// Boot-time configuration (limits, timeouts, collection names).
    pub config: Arc<Config>,
}

impl ServerState {
    /// Builds the shared state from its five collaborators.
    pub fn new(
        agent: Arc<Agent>,
        vectorizer: Arc<Vectorizer>,
        health: Arc<HealthMonitor>,
        metrics: Arc<MetricsCollector>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            agent,
            vectorizer,
            health,
            metrics,
            config,
        }
    }
}
