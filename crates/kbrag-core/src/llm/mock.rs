use async_trait::async_trait;

use super::error::LlmError;
use super::model::{GenerateRequest, GenerateResponse, ModelInfo};
use super::LLMClient;

/// The default embedding dimensionality for [`MockLlmClient`], chosen to
/// match the teacher's `SINTER_EMBEDDING_DIM` order of magnitude without
/// depending on it directly.
pub const MOCK_EMBEDDING_DIM: usize = 256;

/// A deterministic, model-free [`LLMClient`] for tests and the default
/// `mock` build.
///
/// `embed` is grounded in the teacher's `SinterEmbedder::embed_stub`
/// ("running in STUB mode") — a hash expanded into a pseudo-random,
/// L2-normalized vector of fixed dimensionality — generalized from
/// `DefaultHasher`'s process-seeded 64-bit state to BLAKE3, which is
/// stable across runs and processes (spec.md §4.2 requires `Embed` to be
/// "deterministic for identical inputs" — a process-seeded hasher would
/// violate that across restarts). Unlike hashing the whole string as one
/// opaque seed, this hashes per token and sums each token's pseudo-random
/// direction (the classic hashing-trick bag-of-words embedding): two
/// texts that share words get a positive cosine similarity, which is
/// what lets `InMemoryVectorStore`'s vector search — and the §7
/// vector-only degrade path when the LLM is unavailable — behave
/// meaningfully without a real model.
pub struct MockLlmClient {
    dim: usize,
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new(MOCK_EMBEDDING_DIM)
    }
}

impl MockLlmClient {
    /// Creates a mock client producing embeddings of `dim` dimensions.
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    fn stub_embed(&self, text: &str) -> Vec<f64> {
        let mut embedding = vec![0.0_f64; self.dim];

        let tokens = text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|tok| !tok.is_empty())
            .map(|tok| Self::token_direction(tok, self.dim))
            .collect::<Vec<_>>();

        for token_vector in &tokens {
            for (slot, value) in embedding.iter_mut().zip(token_vector) {
                *slot += *value;
            }
        }

        let norm: f64 = embedding.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }
        embedding
    }

    /// A deterministic pseudo-random unit-ish direction for one token,
    /// derived from a BLAKE3 hash of the token bytes (not the whole
    /// text), so identical tokens in different inputs always contribute
    /// the same direction.
    fn token_direction(token: &str, dim: usize) -> Vec<f64> {
        let seed = blake3::hash(token.as_bytes());
        let seed_bytes = seed.as_bytes();
        let mut state = u64::from_le_bytes(seed_bytes[0..8].try_into().unwrap());

        (0..dim)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
                ((state >> 32) as f64 / u32::MAX as f64) * 2.0 - 1.0
            })
            .collect()
    }

    /// Builds a canned, keyword-derived response in the exact
    /// four-section shape `ResponseGenerator` expects (spec.md §4.6),
    /// so its parser has realistic structured text to exercise in tests
    /// without a live model (spec.md §4.2's `MockLlmClient` requirement).
    ///
    /// Recommendations are derived from the candidate keybindings found
    /// in `request.context` (one line rendered per `key - description`
    /// hint the caller supplied), so the mock stays grounded in whatever
    /// the vector search actually found rather than hallucinating keys.
    fn stub_generate(&self, request: &GenerateRequest) -> GenerateResponse {
        let keywords: Vec<&str> = request
            .prompt
            .split_whitespace()
            .filter(|w| w.len() > 3)
            .take(5)
            .collect();

        let mut recommendations = String::new();
        for (idx, line) in request.context.lines().filter(|l| !l.trim().is_empty()).take(5).enumerate() {
            let (keys, desc) = line
                .split_once(" - ")
                .unwrap_or((line.trim(), line.trim()));
            let score = 0.9 - (idx as f64 * 0.1);
            recommendations.push_str(&format!(
                "{}. Keys: {} | Command: {} | Description: {} | Mode: n | Score: {:.1} | Explanation: matches \"{}\"\n",
                idx + 1,
                keys.trim(),
                desc.trim(),
                desc.trim(),
                score.max(0.1),
                request.prompt.trim(),
            ));
        }
        if recommendations.is_empty() {
            recommendations.push_str("1. Keys: <leader>? | Command: unknown | Description: no candidates available | Mode: n | Score: 0.5 | Explanation: no vector hints were supplied\n");
        }

        let text = format!(
            "ANALYSIS\nThe user wants to: {}.\n\nRECOMMENDATIONS\n{}\nREASONING\nThese keybindings were selected because they match the terms {} from the query.\n\nALTERNATIVES\nNo closer alternatives were found in the supplied context.\n",
            request.prompt.trim(),
            recommendations,
            keywords.join(", "),
        );

        let tokens = (text.split_whitespace().count() + request.prompt.split_whitespace().count()) as u32;
        GenerateResponse { text, tokens }
    }
}

#[async_trait]
impl LLMClient for MockLlmClient {
    async fn embed(&self, text: &str) -> Result<Vec<f64>, LlmError> {
        if text.trim().is_empty() {
            return Err(LlmError::EmbedFailed {
                reason: "empty input".to_string(),
            });
        }
        Ok(self.stub_embed(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>, LlmError> {
        texts.iter().map(|t| self.stub_embed_checked(t)).collect()
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
        Ok(self.stub_generate(&request))
    }

    async fn health(&self) -> Result<(), LlmError> {
        Ok(())
    }

    async fn model_info(&self) -> Result<ModelInfo, LlmError> {
        Ok(ModelInfo {
            name: "mock-embedder".to_string(),
            version: "1.0.0".to_string(),
            size: self.dim,
            status: "stub".to_string(),
        })
    }
}

impl MockLlmClient {
    fn stub_embed_checked(&self, text: &str) -> Result<Vec<f64>, LlmError> {
        if text.trim().is_empty() {
            return Err(LlmError::EmbedFailed {
                reason: "empty input".to_string(),
            });
        }
        Ok(self.stub_embed(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn embed_is_deterministic() {
        let client = MockLlmClient::default();
        let a = client.embed("delete a word").await.unwrap();
        let b = client.embed("delete a word").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn embed_differs_for_different_text() {
        let client = MockLlmClient::default();
        let a = client.embed("delete a word").await.unwrap();
        let b = client.embed("copy a line").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn embed_dimension_matches_config() {
        let client = MockLlmClient::new(64);
        let v = client.embed("hello").await.unwrap();
        assert_eq!(v.len(), 64);
    }

    #[tokio::test]
    async fn embed_rejects_empty_input() {
        let client = MockLlmClient::default();
        assert!(client.embed("   ").await.is_err());
    }

    #[tokio::test]
    async fn generate_echoes_prompt_keywords() {
        let client = MockLlmClient::default();
        let response = client
            .generate(GenerateRequest {
                prompt: "how do I delete a word".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(response.text.contains("delete") || response.text.contains("word"));
        assert!(response.tokens > 0);
    }
}
