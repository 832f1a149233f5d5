//! `ResponseGenerator` (spec.md §4.6): builds the LLM prompt, parses its
//! structured response, and fuses the result with vector scores under a
//! fixed ranking formula.
//!
//! Stateless across calls, per spec.md §4.6's "State machine: none".

pub mod error;
pub mod model;
pub mod parse;
pub mod prompt;
pub mod rank;

#[cfg(test)]
mod tests;

pub use error::ResponseError;
pub use model::{GeneratedSections, KeybindingView, ParsedRecommendation, RankedResult, RankingWeights};

use std::sync::Arc;

use tracing::warn;

use crate::llm::{GenerateRequest, LLMClient};
use crate::query::ProcessedQuery;
use crate::router::RoutedDocument;

/// Builds prompts, parses responses, and fuses LLM output with vector
/// search results (spec.md §4.6).
pub struct ResponseGenerator {
    llm: Arc<dyn LLMClient>,
    weights: RankingWeights,
}

impl ResponseGenerator {
    /// Builds a generator over `llm` using the default (spec.md-literal)
    /// ranking weights.
    pub fn new(llm: Arc<dyn LLMClient>) -> Self {
        Self::with_weights(llm, RankingWeights::default())
    }

    /// Builds a generator with custom ranking weights, e.g. for testing
    /// the monotonicity/source-boost properties in isolation.
    pub fn with_weights(llm: Arc<dyn LLMClient>, weights: RankingWeights) -> Self {
        Self { llm, weights }
    }

    /// Builds the prompt from `query`/`context`, calls
    /// [`LLMClient::generate`], and parses the result (spec.md §4.6).
    /// Temperature defaults low (0.1) per spec.md §4.2 to keep parsed
    /// outputs stable.
    pub async fn generate_and_parse(
        &self,
        query: &str,
        context: &str,
    ) -> Result<GeneratedSections, ResponseError> {
        let request = GenerateRequest {
            prompt: prompt::build(query, context),
            context: context.to_string(),
            max_tokens: 1024,
            temperature: 0.1,
        };

        let response = self.llm.generate(request).await?;
        let sections = parse::parse_response(&response.text);

        if sections.used_fallback {
            warn!("LLM response required fallback parsing; possible prompt/model drift");
        }

        Ok(sections)
    }

    /// Fuses `vector_results` with the parsed LLM `sections` into a
    /// final ranked list (spec.md §4.6).
    pub fn rank(
        &self,
        vector_results: &[RoutedDocument],
        sections: &GeneratedSections,
        processed: Option<&ProcessedQuery>,
        max_final_results: usize,
        relevance_threshold: f64,
    ) -> (Vec<RankedResult>, String) {
        rank::fuse(
            vector_results,
            sections,
            processed,
            &self.weights,
            max_final_results,
            relevance_threshold,
        )
    }

    /// Renders compact vector-search hints for the LLM prompt's context
    /// (spec.md §4.7: "context=renderedVectorHints").
    pub fn render_hints(vector_results: &[RoutedDocument]) -> String {
        vector_results
            .iter()
            .filter_map(|routed| {
                let keys = routed.scored.document.metadata.get("keys")?;
                let command = routed
                    .scored
                    .document
                    .metadata
                    .get("command")
                    .map(String::as_str)
                    .unwrap_or("");
                Some(format!("{keys} - {command}"))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
