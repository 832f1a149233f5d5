use thiserror::Error;

use crate::llm::LlmError;
use crate::vectorstore::VectorStoreError;

/// Errors returned by [`super::Vectorizer::incremental`] (spec.md §4.4).
#[derive(Debug, Error)]
pub enum VectorizerError {
    /// One or more input records failed [`crate::keybinding::parse`].
    #[error("{count} keybinding(s) failed validation: {first}")]
    ValidationFailed {
        /// Number of records that failed.
        count: usize,
        /// The first rejection reason, for a quick diagnosis.
        first: String,
    },

    /// Embedding failed for at least one changed record; the whole batch
    /// is failed per spec.md §4.4 ("fail the whole batch if any
    /// embedding fails").
    #[error("embedding failed: {0}")]
    Embedding(#[from] LlmError),

    /// The upsert or delete against the vector store failed.
    #[error(transparent)]
    VectorStore(#[from] VectorStoreError),
}
