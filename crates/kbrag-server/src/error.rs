//! Maps [`kbrag_core::CoreError`] and the server's own request-level
//! failures onto the JSON-RPC error object from spec.md §6, and onto the
//! client/server log-level split from spec.md §7 ("server-class entries
//! are at ERROR, client-class at WARN").

use kbrag_core::error::{CoreError, ErrorBand};
use serde_json::Value;
use thiserror::Error;

use crate::protocol::RpcError;

/// Request-handling failures that never reach `kbrag-core` — malformed
/// JSON, an unknown method, or params that don't deserialize into the
/// method's expected shape. All three are client-class (spec.md §7)
/// and map onto `4000 InvalidRequest`, the closest of spec.md §6's codes
/// to "the request itself was malformed".
#[derive(Debug, Error)]
pub enum ServerError {
    /// The line on stdin was not valid JSON.
    #[error("invalid request: malformed JSON ({0})")]
    MalformedJson(String),

    /// `method` did not match any of spec.md §4.8's RPC methods.
    #[error("invalid request: unknown method '{0}'")]
    UnknownMethod(String),

    /// `params` did not deserialize into the method's expected shape.
    #[error("invalid request: {0}")]
    InvalidParams(String),

    /// A batch request exceeded a method's own size limit (spec.md §4.8:
    /// `SyncKeybindings` caps at 10000, `UpdateKeybindings` at 1000).
    #[error("invalid request: {0}")]
    BatchTooLarge(String),

    /// The handler exceeded `Config::rpc_timeout` (spec.md §6).
    #[error("service unavailable: request timed out")]
    Timeout,

    /// The handler task panicked; `details` carries the panic payload.
    #[error("internal error: {0}")]
    Panicked(String),

    /// A `kbrag-core` call failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ServerError {
    /// The client/server band (spec.md §7), used to choose the log level.
    pub fn band(&self) -> ErrorBand {
        match self {
            ServerError::MalformedJson(_)
            | ServerError::UnknownMethod(_)
            | ServerError::InvalidParams(_)
            | ServerError::BatchTooLarge(_) => ErrorBand::Client,
            ServerError::Timeout | ServerError::Panicked(_) => ErrorBand::Server,
            ServerError::Core(err) => err.band(),
        }
    }

    /// The numeric JSON-RPC code (spec.md §6).
    pub fn code(&self) -> i64 {
        match self {
            ServerError::MalformedJson(_)
            | ServerError::UnknownMethod(_)
            | ServerError::InvalidParams(_)
            | ServerError::BatchTooLarge(_) => 4000,
            ServerError::Timeout => 5001,
            ServerError::Panicked(_) => 5000,
            ServerError::Core(err) => err.code(),
        }
    }

    /// Structured detail to attach to the error object, if any (spec.md
    /// §7: "the panic rendered into `details`").
    pub fn details(&self) -> Option<Value> {
        match self {
            ServerError::Panicked(payload) => Some(Value::String(payload.clone())),
            _ => None,
        }
    }

    /// Renders this error into the wire-level error object.
    pub fn to_rpc_error(&self) -> RpcError {
        RpcError {
            code: self.code(),
            message: self.to_string(),
            details: self.details(),
        }
    }
}
