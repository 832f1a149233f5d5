use serde::{Deserialize, Serialize};

/// A non-streaming generation request (spec.md §4.2).
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// The instruction/question for the model.
    pub prompt: String,
    /// Retrieved context passed alongside the prompt.
    pub context: String,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature; spec.md §4.2 default is `0.1`.
    pub temperature: f32,
}

impl Default for GenerateRequest {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            context: String::new(),
            max_tokens: 512,
            temperature: 0.1,
        }
    }
}

/// The result of a [`super::LLMClient::generate`] call.
#[derive(Debug, Clone)]
pub struct GenerateResponse {
    /// The generated text.
    pub text: String,
    /// The number of tokens consumed (prompt + completion).
    pub tokens: u32,
}

/// Health/identity information about the active model (spec.md §4.2
/// `ModelInfo`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// The model's name (e.g. "mock-embedder-v1").
    pub name: String,
    /// The model's version string.
    pub version: String,
    /// The embedding dimensionality this model produces.
    pub size: usize,
    /// A short human-readable status (e.g. "stub", "ready").
    pub status: String,
}
