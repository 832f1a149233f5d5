//! `Agent` (spec.md §4.7): orchestrates one query end to end — Query ->
//! QueryProcessor -> CollectionRouter -> ResponseGenerator -> ranked
//! results — and delegates vector DB updates to [`crate::vectorizer::Vectorizer`].
//!
//! spec.md §4.7 describes the router search and the LLM generate call as
//! running "in parallel", mirroring the teacher's `TieredCache` L1/L2
//! concurrent lookup shape. Here they run sequentially instead: the LLM
//! prompt's context is the rendered vector hints, so the router search
//! has to finish before the LLM call can even be built. Both steps stay
//! under one caller-supplied deadline; see the comment on
//! `process_query_with_limit` and SPEC_FULL.md for the tradeoff.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::AgentError;

use std::sync::Arc;

use tracing::warn;

use crate::keybinding::RawKeybinding;
use crate::query::{self, ProcessedQuery};
use crate::response::{RankedResult, ResponseGenerator};
use crate::router::CollectionRouter;
use crate::vectorizer::{IncrementalOutcome, Vectorizer};
use crate::vectorstore::FilterBySource;
use crate::llm::LLMClient;

/// The maximum accepted query length, in characters (spec.md §4.7/§6).
pub const MAX_QUERY_CHARS: usize = 1000;

/// The result of [`Agent::process_query`] (spec.md §4.7).
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    /// The final ranked results.
    pub results: Vec<RankedResult>,
    /// A deterministic one-paragraph reasoning summary.
    pub reasoning: String,
}

/// Orchestrates one query end to end (spec.md §4.7).
pub struct Agent {
    llm: Arc<dyn LLMClient>,
    router: Arc<CollectionRouter>,
    generator: ResponseGenerator,
    vectorizer: Arc<Vectorizer>,
    max_final_results: usize,
    relevance_threshold: f64,
}

impl Agent {
    /// Builds an agent over the given collaborators and ranking knobs
    /// (spec.md §6 `maxFinalResults`, `relevanceThreshold`).
    pub fn new(
        llm: Arc<dyn LLMClient>,
        router: Arc<CollectionRouter>,
        vectorizer: Arc<Vectorizer>,
        max_final_results: usize,
        relevance_threshold: f64,
    ) -> Self {
        let generator = ResponseGenerator::new(Arc::clone(&llm));
        Self {
            llm,
            router,
            generator,
            vectorizer,
            max_final_results,
            relevance_threshold,
        }
    }

    /// Processes one query (spec.md §4.7):
    /// 1. Sanitize (reject empty or > 1000 characters).
    /// 2. `QueryProcessor::process`.
    /// 3. In parallel: `CollectionRouter::search_all` and
    ///    `ResponseGenerator::generate_and_parse`.
    /// 4. On vector failure, surface the error (spec.md §7: "no
    ///    fallback"); on LLM failure, degrade to vector-only ranking.
    /// 5. Return the fused, ranked results.
    pub async fn process_query(&self, query: &str) -> Result<QueryOutcome, AgentError> {
        self.process_query_with_filter(query, FilterBySource::All)
            .await
    }

    /// Same as [`Agent::process_query`] but lets the caller pick which
    /// collections participate (spec.md §4.3's two-collection variant;
    /// SPEC_FULL §9.3 default is [`FilterBySource::All`]).
    pub async fn process_query_with_filter(
        &self,
        query: &str,
        filter: FilterBySource,
    ) -> Result<QueryOutcome, AgentError> {
        self.process_query_with_limit(query, filter, self.max_final_results)
            .await
    }

    /// Same as [`Agent::process_query_with_filter`] but lets the caller
    /// override how many final results to return for this call, instead
    /// of the configured default (spec.md §4.8 `Query.limit`, clamped to
    /// `[1, 50]` by the caller before this is invoked).
    pub async fn process_query_with_limit(
        &self,
        query: &str,
        filter: FilterBySource,
        max_final_results: usize,
    ) -> Result<QueryOutcome, AgentError> {
        let sanitized = sanitize(query)?;
        let processed = query::process(&sanitized)?;

        let vector_k = (3 * max_final_results).max(10);
        let query_vector = self
            .llm
            .embed(&sanitized)
            .await
            .map_err(|err| AgentError::VectorStore(crate::vectorstore::VectorStoreError::Unhealthy(err.to_string())))?;

        // spec.md §4.7 asks for the vector search and the LLM call "in
        // parallel", but the LLM prompt's context is the rendered vector
        // hints (§4.7 "context=renderedVectorHints") - the two calls
        // can't start at the same instant without either embedding twice
        // or feeding the LLM a stale context. This resolves the tension
        // by running the (fast, local-ish) vector fan-out first and the
        // LLM call second, keeping everything under one caller-supplied
        // deadline (spec.md §5); see DESIGN.md for the tradeoff.
        let vector_results = self.router.search_all(&query_vector, vector_k, filter).await;
        let hints = ResponseGenerator::render_hints(&vector_results);

        let mut llm_unavailable = false;
        let sections = match self.generator.generate_and_parse(&sanitized, &hints).await {
            Ok(sections) => sections,
            Err(err) => {
                warn!(error = %err, "LLM generation failed; falling back to vector-only ranking");
                llm_unavailable = true;
                crate::response::GeneratedSections::default()
            }
        };

        let (results, mut reasoning) = self.generator.rank(
            &vector_results,
            &sections,
            Some(&processed),
            max_final_results,
            self.relevance_threshold,
        );

        if llm_unavailable {
            reasoning.push_str(" The LLM was unavailable for this query; these results are vector-only.");
        }

        Ok(QueryOutcome { results, reasoning })
    }

    /// Delegates to [`Vectorizer::incremental`] against the user
    /// collection (spec.md §4.7 `UpdateVectorDB`).
    pub async fn update_vector_db(
        &self,
        keybindings: Vec<RawKeybinding>,
    ) -> Result<IncrementalOutcome, AgentError> {
        Ok(self.vectorizer.incremental(keybindings).await?)
    }

    /// Exposes the processed query for callers that want the raw
    /// intermediate representation (used by `kbrag-server`'s metrics).
    pub fn process_text(&self, query: &str) -> Result<ProcessedQuery, AgentError> {
        let sanitized = sanitize(query)?;
        Ok(query::process(&sanitized)?)
    }
}

fn sanitize(query: &str) -> Result<String, crate::query::QueryError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(crate::query::QueryError::Empty);
    }
    if trimmed.chars().count() > MAX_QUERY_CHARS {
        return Err(crate::query::QueryError::TooLong);
    }
    Ok(trimmed.to_string())
}
