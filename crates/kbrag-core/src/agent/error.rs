use thiserror::Error;

use crate::query::QueryError;
use crate::response::ResponseError;
use crate::vectorizer::VectorizerError;
use crate::vectorstore::VectorStoreError;

/// Errors returned by [`super::Agent`] (spec.md §4.7).
#[derive(Debug, Error)]
pub enum AgentError {
    /// Query sanitization or normalization failed.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The vector search fan-out failed (spec.md §7: "vector fail ->
    /// return 5003 (no fallback: LLM alone is not trusted to produce
    /// keybindings)").
    #[error("vector search failed: {0}")]
    VectorStore(#[from] VectorStoreError),

    /// Response generation failed in a way that could not be degraded
    /// to a vector-only result (spec.md §7 only degrades on an LLM
    /// *generation* failure; a parse failure still yields an empty LLM
    /// contribution, not this error).
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// `UpdateVectorDB` delegated to `Vectorizer::incremental`, which failed.
    #[error(transparent)]
    Vectorizer(#[from] VectorizerError),
}
