//! The `LLMClient` capability (spec.md §4.2).
//!
//! Grounded in the teacher's `embedding` module shape (`SinterEmbedder`
//! plus a stub backend), generalized to an object-safe `#[async_trait]`
//! (for the same reason as [`crate::vectorstore`]) and widened from
//! embeddings-only to also cover non-streaming chat generation, since
//! `ResponseGenerator` needs both behind one capability.

pub mod error;
pub mod mock;
pub mod model;
#[cfg(feature = "openai")]
pub mod openai;

pub use error::LlmError;
pub use mock::MockLlmClient;
pub use model::{GenerateRequest, GenerateResponse, ModelInfo};
#[cfg(feature = "openai")]
pub use openai::OpenAiLlmClient;

use async_trait::async_trait;

/// Capability abstraction over an embedding + generation backend
/// (spec.md §4.2).
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Embeds `text`. Deterministic for identical inputs under a fixed
    /// model; dimensionality is constant across a process lifetime.
    async fn embed(&self, text: &str) -> Result<Vec<f64>, LlmError>;

    /// Embeds a batch of texts in one call. Implementations may simply
    /// loop over [`LLMClient::embed`]; the batch form exists so a real
    /// backend can use its native batch endpoint.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>, LlmError>;

    /// Generates a non-streaming completion.
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError>;

    /// Checks whether the backend is reachable and serving.
    async fn health(&self) -> Result<(), LlmError>;

    /// Returns identity/health information about the active model.
    async fn model_info(&self) -> Result<ModelInfo, LlmError>;
}
