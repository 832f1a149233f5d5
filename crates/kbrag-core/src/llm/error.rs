use thiserror::Error;

/// Errors returned by [`super::LLMClient`] operations (spec.md §4.2).
#[derive(Debug, Error)]
pub enum LlmError {
    /// `Embed` failed.
    #[error("embedding failed: {reason}")]
    EmbedFailed {
        /// The underlying error message.
        reason: String,
    },

    /// `Generate` failed.
    #[error("generation failed: {reason}")]
    GenerateFailed {
        /// The underlying error message.
        reason: String,
    },

    /// The configured model is unavailable or not yet loaded.
    #[error("model unavailable: {reason}")]
    ModelUnavailable {
        /// The underlying error message.
        reason: String,
    },

    /// The client (or its backing API) reported itself unhealthy.
    #[error("llm client unhealthy: {0}")]
    Unhealthy(String),
}
