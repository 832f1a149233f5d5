//! The client/server error taxonomy (spec.md §7) and its mapping onto the
//! numeric JSON-RPC codes from spec.md §6.
//!
//! Every leaf error type in this crate (`VectorStoreError`, `LlmError`,
//! `VectorizerError`, `QueryError`, `ResponseError`, `AgentError`)
//! converts into [`CoreError`] via `#[from]`, so `kbrag-server` never has
//! to invent a code itself — it just asks [`CoreError::code`] and
//! [`CoreError::band`].

use thiserror::Error;

use crate::agent::AgentError;
use crate::llm::LlmError;
use crate::query::QueryError;
use crate::response::ResponseError;
use crate::vectorizer::VectorizerError;
use crate::vectorstore::VectorStoreError;

/// Two-band error classification from spec.md §7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorBand {
    /// The request itself was malformed or over a limit (4xxx).
    Client,
    /// A dependency failed or an invariant was violated (5xxx).
    Server,
}

/// The crate-wide error type. Carries enough information for
/// `kbrag-server` to build a JSON-RPC error object without re-deriving
/// the band or numeric code.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The request was malformed, e.g. too many records in a batch.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A query was empty.
    #[error("query must not be empty")]
    InvalidQuery,

    /// A query exceeded the 1000-character limit.
    #[error("query exceeds the 1000 character limit")]
    QueryTooLong,

    /// A client issued requests faster than the server will serve them.
    #[error("rate limited")]
    RateLimited,

    /// An unclassified internal error, typically a recovered panic.
    #[error("internal error: {0}")]
    Internal(String),

    /// A dependency capability reported itself unhealthy or unreachable.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// `Agent::process_query` failed.
    #[error(transparent)]
    Agent(#[from] AgentError),

    /// A `VectorStore` call failed.
    #[error(transparent)]
    VectorStore(#[from] VectorStoreError),

    /// An `LLMClient` call failed.
    #[error(transparent)]
    Llm(#[from] LlmError),
}

impl CoreError {
    /// The client/server band this error belongs to.
    pub fn band(&self) -> ErrorBand {
        match self {
            CoreError::InvalidRequest(_)
            | CoreError::InvalidQuery
            | CoreError::QueryTooLong
            | CoreError::RateLimited => ErrorBand::Client,
            CoreError::Agent(AgentError::Query(QueryError::Empty | QueryError::TooLong | QueryError::NoSearchTerms)) => {
                ErrorBand::Client
            }
            CoreError::Agent(AgentError::Vectorizer(VectorizerError::ValidationFailed { .. })) => {
                ErrorBand::Client
            }
            CoreError::Internal(_)
            | CoreError::ServiceUnavailable(_)
            | CoreError::Agent(_)
            | CoreError::VectorStore(_)
            | CoreError::Llm(_) => ErrorBand::Server,
        }
    }

    /// The numeric JSON-RPC error code from spec.md §6.
    pub fn code(&self) -> i64 {
        match self {
            CoreError::InvalidRequest(_) => 4000,
            CoreError::InvalidQuery => 4001,
            CoreError::QueryTooLong => 4002,
            CoreError::RateLimited => 4003,
            CoreError::Agent(AgentError::Query(QueryError::Empty | QueryError::NoSearchTerms)) => 4001,
            CoreError::Agent(AgentError::Query(QueryError::TooLong)) => 4002,
            CoreError::Internal(_) => 5000,
            CoreError::ServiceUnavailable(_) => 5001,
            CoreError::Agent(AgentError::Response(ResponseError::Generation(_))) => 5004,
            CoreError::Agent(AgentError::VectorStore(_)) => 5003,
            CoreError::Agent(AgentError::Vectorizer(VectorizerError::ValidationFailed { .. })) => 4000,
            CoreError::Agent(AgentError::Vectorizer(VectorizerError::Embedding(_))) => 5004,
            CoreError::Agent(AgentError::Vectorizer(VectorizerError::VectorStore(_))) => 5003,
            CoreError::Agent(_) => 5002,
            CoreError::VectorStore(_) => 5003,
            CoreError::Llm(_) => 5004,
        }
    }
}

/// Error produced while parsing/validating a keybinding (spec.md §4.4's
/// `Parse(raw) -> Keybinding | Invalid`), kept distinct from `CoreError`
/// because it is never itself surfaced over RPC as a single error — a
/// batch of these becomes part of a `SyncKeybindings`/`UpdateKeybindings`
/// rejection count instead of an RPC failure.
pub use crate::keybinding::GrammarError;

impl From<QueryError> for CoreError {
    fn from(err: QueryError) -> Self {
        CoreError::Agent(AgentError::Query(err))
    }
}
