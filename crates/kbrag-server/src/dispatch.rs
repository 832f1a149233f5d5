//! Method dispatch (spec.md §4.8): validates params, calls into
//! `kbrag-core`, and wraps every handler with the timeout, panic
//! isolation, metrics, and logging contracts spec.md §4.8/§7 require.

use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use chrono::Utc;
use futures::FutureExt;
use kbrag_core::error::ErrorBand;
use kbrag_core::health;
use kbrag_core::keybinding::RawKeybinding;
use serde_json::Value;
use tracing::{error, warn};

use crate::error::ServerError;
use crate::params::{
    CollectionNamesView, DetailedHealthCheckResult, HealthCheckResult, QueryParams, QueryResult,
    SyncKeybindingsParams, SyncKeybindingsResult, SystemInfo, UpdateKeybindingsParams,
    UpdateKeybindingsResult,
};
use crate::protocol::{RpcRequest, RpcResponse};
use crate::state::ServerState;

/// Maximum records accepted per `SyncKeybindings` call (spec.md §4.8).
pub const MAX_SYNC_KEYBINDINGS: usize = 10_000;
/// Maximum records accepted per `UpdateKeybindings` call (spec.md §4.8).
pub const MAX_UPDATE_KEYBINDINGS: usize = 1_000;
/// The floor/ceiling `Query.limit` is clamped to (spec.md §4.8).
pub const QUERY_LIMIT_RANGE: (usize, usize) = (1, 50);
/// `Query.limit`'s default when the caller omits it (spec.md §6 example).
pub const DEFAULT_QUERY_LIMIT: usize = 10;

/// Dispatches one decoded request to its handler (spec.md §4.8):
/// spawns the handler on its own task (spec.md §5: "each RPC invocation
/// runs on its own task"), bounds it by `Config::rpc_timeout`, and
/// converts a panic or timeout into the matching JSON-RPC error instead
/// of ever letting either take the process down.
pub async fn dispatch(state: ServerState, request: RpcRequest) -> RpcResponse {
    let id = request.id.clone();
    let method = request.method.clone();
    let started = Instant::now();

    let timeout = state.config.rpc_timeout;
    let task_state = state.clone();
    let handle = tokio::spawn(async move {
        AssertUnwindSafe(handle_method(task_state, request))
            .catch_unwind()
            .await
    });

    let outcome = match tokio::time::timeout(timeout, handle).await {
        Ok(Ok(Ok(result))) => Ok(result),
        Ok(Ok(Err(panic))) => Err(ServerError::Panicked(panic_message(panic))),
        Ok(Err(join_err)) => Err(ServerError::Panicked(format!("task join error: {join_err}"))),
        Err(_elapsed) => Err(ServerError::Timeout),
    };

    let success = outcome.is_ok();
    state.metrics.record(started.elapsed(), success);

    match outcome {
        Ok(result) => RpcResponse::success(id, result),
        Err(err) => {
            log_error(&method, &err);
            RpcResponse::failure(id, err.to_rpc_error())
        }
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked with a non-string payload".to_string()
    }
}

fn log_error(method: &str, err: &ServerError) {
    match err.band() {
        ErrorBand::Server => error!(method, error = %err, code = err.code(), "rpc handler failed"),
        ErrorBand::Client => warn!(method, error = %err, code = err.code(), "rpc request rejected"),
    }
}

async fn handle_method(state: ServerState, request: RpcRequest) -> Result<Value, ServerError> {
    match request.method.as_str() {
        "Query" => query(&state, request.params).await,
        "SyncKeybindings" => sync_keybindings(&state, request.params).await,
        "UpdateKeybindings" => update_keybindings(&state, request.params).await,
        "HealthCheck" => health_check(&state).await,
        "DetailedHealthCheck" => detailed_health_check(&state).await,
        "GetMetrics" => get_metrics(&state).await,
        other => Err(ServerError::UnknownMethod(other.to_string())),
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(params: Value) -> Result<T, ServerError> {
    serde_json::from_value(params).map_err(|err| ServerError::InvalidParams(err.to_string()))
}

/// `VectorizerError` only converts into `CoreError` through `AgentError`
/// (`kbrag-core`'s own `#[from]` chain), so handlers that call the
/// vectorizer directly route the conversion through here.
fn vectorizer_err_to_core(err: kbrag_core::vectorizer::VectorizerError) -> kbrag_core::error::CoreError {
    kbrag_core::error::CoreError::from(kbrag_core::agent::AgentError::from(err))
}

async fn query(state: &ServerState, params: Value) -> Result<Value, ServerError> {
    let params: QueryParams = parse_params(params)?;
    let limit = params
        .limit
        .unwrap_or(DEFAULT_QUERY_LIMIT)
        .clamp(QUERY_LIMIT_RANGE.0, QUERY_LIMIT_RANGE.1);

    let outcome = state
        .agent
        .process_query_with_limit(&params.query, kbrag_core::vectorstore::FilterBySource::All, limit)
        .await
        .map_err(kbrag_core::error::CoreError::from)?;

    let mut results = outcome.results;
    results.truncate(limit);

    Ok(serde_json::to_value(QueryResult {
        results,
        reasoning: outcome.reasoning,
    })
    .expect("QueryResult always serializes"))
}

async fn sync_keybindings(state: &ServerState, params: Value) -> Result<Value, ServerError> {
    let params: SyncKeybindingsParams = parse_params(params)?;
    if params.keybindings.len() > MAX_SYNC_KEYBINDINGS {
        return Err(ServerError::BatchTooLarge(format!(
            "SyncKeybindings accepts at most {MAX_SYNC_KEYBINDINGS} records, got {}",
            params.keybindings.len()
        )));
    }

    if params.clear_existing {
        state
            .vectorizer
            .clear_user_collection()
            .await
            .map_err(vectorizer_err_to_core)?;
    }

    let outcome = state
        .vectorizer
        .incremental(params.keybindings)
        .await
        .map_err(vectorizer_err_to_core)?;
    let processed_count = outcome.changed.len() + outcome.deleted.len();

    Ok(serde_json::to_value(SyncKeybindingsResult {
        success: true,
        processed_count,
    })
    .expect("SyncKeybindingsResult always serializes"))
}

async fn update_keybindings(state: &ServerState, params: Value) -> Result<Value, ServerError> {
    let params: UpdateKeybindingsParams = parse_params(params)?;
    if params.keybindings.len() > MAX_UPDATE_KEYBINDINGS {
        return Err(ServerError::BatchTooLarge(format!(
            "UpdateKeybindings accepts at most {MAX_UPDATE_KEYBINDINGS} records per call, got {}",
            params.keybindings.len()
        )));
    }

    let outcome: Vec<RawKeybinding> = params.keybindings;
    let outcome = state
        .vectorizer
        .incremental(outcome)
        .await
        .map_err(vectorizer_err_to_core)?;
    let updated_count = outcome.changed.len() + outcome.deleted.len();

    Ok(serde_json::to_value(UpdateKeybindingsResult {
        success: true,
        updated_count,
    })
    .expect("UpdateKeybindingsResult always serializes"))
}

async fn health_check(state: &ServerState) -> Result<Value, ServerError> {
    let statuses = state.health.check_now().await;
    let status = health::HealthMonitor::overall_status(&statuses).to_string();
    let services: BTreeMap<String, String> = statuses
        .into_iter()
        .map(|(name, status)| (name, status.detail))
        .collect();

    Ok(serde_json::to_value(HealthCheckResult {
        status,
        timestamp: Utc::now().timestamp(),
        services,
    })
    .expect("HealthCheckResult always serializes"))
}

async fn detailed_health_check(state: &ServerState) -> Result<Value, ServerError> {
    let statuses = state.health.check_now().await;
    let health_status = health::HealthMonitor::overall_status(&statuses).to_string();
    let dependencies: BTreeMap<String, String> = statuses
        .into_iter()
        .map(|(name, status)| (name, status.detail))
        .collect();

    let names = &state.config.collection_names;
    let system_info = SystemInfo {
        collection_names: CollectionNamesView {
            user: names.user.clone(),
            builtin: names.builtin.clone(),
            general: names.general.clone(),
        },
        tracked_user_keybindings: state.vectorizer.tracked_count().await,
    };

    Ok(serde_json::to_value(DetailedHealthCheckResult {
        health: health_status,
        metrics: state.metrics.snapshot(),
        dependencies,
        system_info,
        uptime_secs: state.metrics.uptime().as_secs(),
    })
    .expect("DetailedHealthCheckResult always serializes"))
}

async fn get_metrics(state: &ServerState) -> Result<Value, ServerError> {
    Ok(serde_json::to_value(state.metrics.snapshot()).expect("PerformanceMetrics always serializes"))
}
