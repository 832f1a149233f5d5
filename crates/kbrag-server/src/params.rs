//! Per-method parameter/result payloads (spec.md §4.8, §6).
//!
//! Every struct here is the `params`/`result` half of one JSON-RPC
//! method; [`crate::dispatch`] deserializes/serializes through
//! `serde_json::Value` at the envelope boundary so an individual
//! method's shape stays fully typed.

use std::collections::BTreeMap;

use kbrag_core::keybinding::RawKeybinding;
use kbrag_core::metrics::PerformanceMetrics;
use kbrag_core::response::RankedResult;
use serde::{Deserialize, Serialize};

/// `Query` params (spec.md §4.8).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    /// The natural-language query.
    pub query: String,
    /// Unused by the core pipeline today; accepted for forward
    /// compatibility with editor-supplied extra context.
    #[serde(default)]
    pub context: Option<String>,
    /// Requested result count; clamped to `[1, 50]` (spec.md §4.8).
    #[serde(default)]
    pub limit: Option<usize>,
}

/// `Query` result.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    /// The fused, ranked results.
    pub results: Vec<RankedResult>,
    /// A deterministic one-paragraph reasoning summary.
    pub reasoning: String,
}

/// `SyncKeybindings` params (spec.md §4.8).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncKeybindingsParams {
    /// The complete set of keybindings to sync.
    pub keybindings: Vec<RawKeybinding>,
    /// When `true`, delete every existing user-collection document
    /// before inserting `keybindings` (SPEC_FULL §9.2's resolution of
    /// spec.md's open question: delete-then-insert, atomicity
    /// best-effort).
    #[serde(default)]
    pub clear_existing: bool,
}

/// `SyncKeybindings` result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncKeybindingsResult {
    /// `true` unless the call returned an error.
    pub success: bool,
    /// Number of keybindings changed or deleted by this sync.
    pub processed_count: usize,
}

/// `UpdateKeybindings` params (spec.md §4.8).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateKeybindingsParams {
    /// The keybindings to upsert/delete incrementally.
    pub keybindings: Vec<RawKeybinding>,
}

/// `UpdateKeybindings` result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateKeybindingsResult {
    /// `true` unless the call returned an error.
    pub success: bool,
    /// Number of keybindings changed or deleted by this call.
    pub updated_count: usize,
}

/// `HealthCheck` result (spec.md §4.8).
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheckResult {
    /// `"healthy"` iff every dependency's `Health` returned ok.
    pub status: String,
    /// Unix timestamp (seconds) this check was performed.
    pub timestamp: i64,
    /// Per-dependency detail string (`"healthy"` or `"unhealthy: ..."`).
    pub services: BTreeMap<String, String>,
}

/// Static, boot-time system information surfaced by
/// `DetailedHealthCheck` (spec.md §4.8's `systemInfo`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    /// The three logical collection names in use.
    pub collection_names: CollectionNamesView,
    /// Number of user-keybinding ids currently tracked by the vectorizer's
    /// hash store.
    pub tracked_user_keybindings: usize,
}

/// A serializable view of [`kbrag_core::config::CollectionNames`].
#[derive(Debug, Clone, Serialize)]
pub struct CollectionNamesView {
    /// `user_keybindings` by default.
    pub user: String,
    /// `vim_knowledge` by default.
    pub builtin: String,
    /// `general_knowledge` by default.
    pub general: String,
}

/// `DetailedHealthCheck` result (spec.md §4.8).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedHealthCheckResult {
    /// `"healthy"`/`"unhealthy"` rollup, same rule as `HealthCheck`.
    pub health: String,
    /// The full performance-metrics snapshot.
    pub metrics: PerformanceMetrics,
    /// Per-dependency detail string, same contents as `HealthCheck.services`.
    pub dependencies: BTreeMap<String, String>,
    /// Static system/config information.
    pub system_info: SystemInfo,
    /// Wall-clock seconds since the server started.
    pub uptime_secs: u64,
}
