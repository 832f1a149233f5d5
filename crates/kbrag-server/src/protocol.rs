//! Line-delimited JSON-RPC 2.0 envelope types (spec.md §6).
//!
//! One request object per line on stdin, one response object per line on
//! stdout; `id` round-trips verbatim (including `null`, per JSON-RPC 2.0
//! notifications, even though this server always replies).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The fixed protocol version string every message carries.
pub const JSONRPC_VERSION: &str = "2.0";

/// One decoded request line.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcRequest {
    /// Must be `"2.0"`; not enforced beyond being present, matching how
    /// permissive editor-side JSON-RPC clients already are.
    #[serde(default)]
    pub jsonrpc: String,
    /// Echoed back verbatim in the response.
    #[serde(default)]
    pub id: Value,
    /// The method name (spec.md §4.8: `Query`, `SyncKeybindings`, ...).
    pub method: String,
    /// Method-specific parameters, deserialized per method.
    #[serde(default)]
    pub params: Value,
}

/// One encoded response line. Exactly one of `result`/`error` is set
/// (spec.md §7: "never mixed with a partial result").
#[derive(Debug, Clone, Serialize)]
pub struct RpcResponse {
    /// Always `"2.0"`.
    pub jsonrpc: &'static str,
    /// The request's `id`, echoed back.
    pub id: Value,
    /// The method's result, present only on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// The error object, present only on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    /// Builds a successful response.
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Builds a failure response.
    pub fn failure(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// The error object shape from spec.md §6: `{code, message, details?}`.
#[derive(Debug, Clone, Serialize)]
pub struct RpcError {
    /// One of the numeric codes enumerated in spec.md §6.
    pub code: i64,
    /// A human-readable summary.
    pub message: String,
    /// Optional structured detail (e.g. a rendered panic payload).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}
