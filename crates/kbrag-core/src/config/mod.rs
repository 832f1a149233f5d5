//! Environment-backed configuration.
//!
//! Mirrors the teacher's `Config::from_env` / `Config::default` shape:
//! every knob has a documented default and an env var override, and
//! `validate` catches inconsistent values before the server starts.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::time::Duration;

/// The three well-known collection names (spec.md §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionNames {
    /// User-authored keybindings, highest merge priority.
    pub user: String,
    /// Built-in editor/plugin keybindings.
    pub builtin: String,
    /// General vim knowledge not tied to a specific binding.
    pub general: String,
}

impl Default for CollectionNames {
    fn default() -> Self {
        Self {
            user: "user_keybindings".to_string(),
            builtin: "vim_knowledge".to_string(),
            general: "general_knowledge".to_string(),
        }
    }
}

/// Process-wide configuration, read once at boot (spec.md §6: "no
/// per-request reconfiguration").
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of results returned by `ResponseGenerator::rank`.
    pub max_final_results: usize,
    /// Minimum vector score for a vector-only result to survive ranking.
    pub relevance_threshold: f64,
    /// Additive score boost applied to `source == "user"` hits.
    pub user_boost_factor: f64,
    /// Batch size used when seeding/bulk-upserting collections.
    pub batch_size: usize,
    /// Maximum in-flight embedding requests during `Incremental`.
    pub embed_concurrency: usize,
    /// Per-RPC-call deadline.
    pub rpc_timeout: Duration,
    /// Interval between `HealthMonitor` ticks.
    pub health_interval: Duration,
    /// Maximum automatic restarts `HealthMonitor` will attempt per dependency.
    pub max_restarts: u32,
    /// Delay between restart attempts.
    pub restart_delay: Duration,
    /// The three logical collection names.
    pub collection_names: CollectionNames,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_final_results: 5,
            relevance_threshold: 0.3,
            user_boost_factor: 0.2,
            batch_size: 50,
            embed_concurrency: 5,
            rpc_timeout: Duration::from_millis(5000),
            health_interval: Duration::from_secs(30),
            max_restarts: 5,
            restart_delay: Duration::from_secs(5),
            collection_names: CollectionNames::default(),
        }
    }
}

impl Config {
    const ENV_MAX_FINAL_RESULTS: &'static str = "KBRAG_MAX_FINAL_RESULTS";
    const ENV_RELEVANCE_THRESHOLD: &'static str = "KBRAG_RELEVANCE_THRESHOLD";
    const ENV_USER_BOOST_FACTOR: &'static str = "KBRAG_USER_BOOST_FACTOR";
    const ENV_BATCH_SIZE: &'static str = "KBRAG_BATCH_SIZE";
    const ENV_EMBED_CONCURRENCY: &'static str = "KBRAG_EMBED_CONCURRENCY";
    const ENV_RPC_TIMEOUT_MS: &'static str = "KBRAG_RPC_TIMEOUT_MS";
    const ENV_HEALTH_INTERVAL_SEC: &'static str = "KBRAG_HEALTH_INTERVAL_SEC";
    const ENV_MAX_RESTARTS: &'static str = "KBRAG_MAX_RESTARTS";
    const ENV_RESTART_DELAY_SEC: &'static str = "KBRAG_RESTART_DELAY_SEC";

    /// Builds a `Config` from environment variables, falling back to
    /// spec.md §6 defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            max_final_results: Self::parse_usize(
                Self::ENV_MAX_FINAL_RESULTS,
                defaults.max_final_results,
            )?,
            relevance_threshold: Self::parse_f64(
                Self::ENV_RELEVANCE_THRESHOLD,
                defaults.relevance_threshold,
            )?,
            user_boost_factor: Self::parse_f64(
                Self::ENV_USER_BOOST_FACTOR,
                defaults.user_boost_factor,
            )?,
            batch_size: Self::parse_usize(Self::ENV_BATCH_SIZE, defaults.batch_size)?,
            embed_concurrency: Self::parse_usize(
                Self::ENV_EMBED_CONCURRENCY,
                defaults.embed_concurrency,
            )?,
            rpc_timeout: Duration::from_millis(Self::parse_u64(
                Self::ENV_RPC_TIMEOUT_MS,
                defaults.rpc_timeout.as_millis() as u64,
            )?),
            health_interval: Duration::from_secs(Self::parse_u64(
                Self::ENV_HEALTH_INTERVAL_SEC,
                defaults.health_interval.as_secs(),
            )?),
            max_restarts: Self::parse_u64(
                Self::ENV_MAX_RESTARTS,
                u64::from(defaults.max_restarts),
            )? as u32,
            restart_delay: Duration::from_secs(Self::parse_u64(
                Self::ENV_RESTART_DELAY_SEC,
                defaults.restart_delay.as_secs(),
            )?),
            collection_names: CollectionNames::default(),
        })
    }

    /// Validates cross-field invariants that a single env var parse can't catch.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_final_results == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_final_results",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.relevance_threshold) {
            return Err(ConfigError::InvalidValue {
                field: "relevance_threshold",
                reason: "must be within [0.0, 1.0]".to_string(),
            });
        }
        if self.embed_concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "embed_concurrency",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    fn parse_usize(var: &str, default: usize) -> Result<usize, ConfigError> {
        match env::var(var) {
            Ok(v) => v.parse().map_err(|_| ConfigError::ParseError {
                field: var,
                value: v,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_u64(var: &str, default: u64) -> Result<u64, ConfigError> {
        match env::var(var) {
            Ok(v) => v.parse().map_err(|_| ConfigError::ParseError {
                field: var,
                value: v,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_f64(var: &str, default: f64) -> Result<f64, ConfigError> {
        match env::var(var) {
            Ok(v) => v.parse().map_err(|_| ConfigError::ParseError {
                field: var,
                value: v,
            }),
            Err(_) => Ok(default),
        }
    }
}
