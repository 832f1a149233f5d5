use thiserror::Error;

use crate::llm::LlmError;

/// Errors returned by [`super::ResponseGenerator`] (spec.md §4.6).
#[derive(Debug, Error)]
pub enum ResponseError {
    /// The `LLMClient::generate` call itself failed.
    #[error("llm generation failed: {0}")]
    Generation(#[from] LlmError),
}
