//! `CollectionRouter` (spec.md §4.3): fans a query out to the three
//! named collections and merges the results with a per-source priority
//! boost.
//!
//! The fan-out shape — `futures_util::future::join_all` over N
//! concurrent backend calls, each wrapped so a failure degrades to an
//! empty result instead of aborting the whole call — is grounded in the
//! teacher's `L2SemanticCache` multi-backend load path
//! (`src/cache/l2/cache.rs`), generalized from "load candidates from N
//! storage backends" to "search N named collections".

#[cfg(test)]
mod tests;

use std::collections::HashSet;
use std::sync::Arc;

use futures_util::future::join_all;
use tracing::warn;

use crate::config::CollectionNames;
use crate::vectorstore::{Document, FilterBySource, IncludeOptions, ScoredDocument, VectorStore};

/// Additive score boosts applied per source (spec.md §4.3).
pub const USER_BOOST: f64 = 0.2;
/// Additive score boost for the built-in collection.
pub const BUILTIN_BOOST: f64 = 0.1;
/// Additive score boost for the general-knowledge collection.
pub const GENERAL_BOOST: f64 = 0.0;

/// A single merged hit, annotated with the collection it came from.
#[derive(Debug, Clone)]
pub struct RoutedDocument {
    /// The underlying document and its raw vector score.
    pub scored: ScoredDocument,
    /// Which of the three collections produced this hit.
    pub source: Source,
    /// `scored.score` plus the source's boost, not clamped (spec.md
    /// §4.3 describes this as an additive step feeding `ResponseGenerator
    /// ::rank`, which does its own clamping).
    pub boosted_score: f64,
}

/// The collection a [`RoutedDocument`] was retrieved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// `user_keybindings`.
    User,
    /// `vim_knowledge`.
    Builtin,
    /// `general_knowledge`.
    General,
}

impl Source {
    fn boost(self) -> f64 {
        match self {
            Source::User => USER_BOOST,
            Source::Builtin => BUILTIN_BOOST,
            Source::General => GENERAL_BOOST,
        }
    }
}

/// Fans a query out to the three named collections and merges the
/// results (spec.md §4.3).
pub struct CollectionRouter {
    store: Arc<dyn VectorStore>,
    names: CollectionNames,
}

impl CollectionRouter {
    /// Builds a router over `store`'s three named collections.
    pub fn new(store: Arc<dyn VectorStore>, names: CollectionNames) -> Self {
        Self { store, names }
    }

    /// Fans `vector` out to the collections selected by `filter`,
    /// requesting `ceil(k / n)` from each (minimum 1, where `n` is the
    /// number of participating collections), and merges per spec.md
    /// §4.3: additive boost, concatenate user → built-in → general,
    /// de-duplicate by id keeping the first occurrence, truncate to `k`.
    pub async fn search_all(
        &self,
        vector: &[f64],
        k: usize,
        filter: FilterBySource,
    ) -> Vec<RoutedDocument> {
        let participants = self.participants(filter);
        let per_collection_k = k.div_ceil(participants.len().max(1)).max(1);

        let fetches = participants.iter().map(|(name, source)| {
            let store = Arc::clone(&self.store);
            let name = name.clone();
            let source = *source;
            async move {
                match store
                    .query(&name, vector, per_collection_k, IncludeOptions::default())
                    .await
                {
                    Ok(hits) => hits
                        .into_iter()
                        .map(|scored| {
                            let boosted_score = scored.score + source.boost();
                            RoutedDocument {
                                scored,
                                source,
                                boosted_score,
                            }
                        })
                        .collect::<Vec<_>>(),
                    Err(err) => {
                        warn!(collection = %name, error = %err, "collection query failed, treating as empty");
                        Vec::new()
                    }
                }
            }
        });

        let per_collection_results = join_all(fetches).await;

        let mut seen: HashSet<String> = HashSet::new();
        let mut merged = Vec::new();
        for collection_hits in per_collection_results {
            for hit in collection_hits {
                if seen.insert(hit.scored.document.id.clone()) {
                    merged.push(hit);
                }
            }
        }

        merged.truncate(k);
        merged
    }

    /// Inserts documents into the named collection for `source`.
    pub async fn upsert(
        &self,
        source: Source,
        docs: Vec<Document>,
    ) -> Result<(), crate::vectorstore::VectorStoreError> {
        self.store.upsert(self.collection_name(source), docs).await
    }

    /// Deletes documents by id from the named collection for `source`.
    pub async fn delete(
        &self,
        source: Source,
        ids: &[String],
    ) -> Result<(), crate::vectorstore::VectorStoreError> {
        self.store.delete(self.collection_name(source), ids).await
    }

    /// Deletes every document currently in the user collection and
    /// returns the ids that were removed (SPEC_FULL §9.2's
    /// `clearExisting == true` semantics: "collects current ids for
    /// `user_keybindings` via `Count`+`Query` with a maximal `k`, then
    /// `Delete`s them"). There is no native "list all ids" operation on
    /// [`VectorStore`], so this queries with a dummy vector and `k ==
    /// count`; the in-memory and Qdrant backends both return every
    /// document up to `k` regardless of the query vector's relevance
    /// ordering, which is all this needs.
    pub async fn clear_user_collection(&self) -> Result<Vec<String>, crate::vectorstore::VectorStoreError> {
        let name = &self.names.user;
        let count = self.store.count(name).await?;
        if count == 0 {
            return Ok(Vec::new());
        }

        let hits = self
            .store
            .query(name, &[0.0], count, IncludeOptions::default())
            .await?;
        let ids: Vec<String> = hits.into_iter().map(|hit| hit.document.id).collect();
        self.store.delete(name, &ids).await?;
        Ok(ids)
    }

    fn collection_name(&self, source: Source) -> &str {
        match source {
            Source::User => &self.names.user,
            Source::Builtin => &self.names.builtin,
            Source::General => &self.names.general,
        }
    }

    fn participants(&self, filter: FilterBySource) -> Vec<(String, Source)> {
        match filter {
            FilterBySource::User => vec![(self.names.user.clone(), Source::User)],
            FilterBySource::Builtin => vec![(self.names.builtin.clone(), Source::Builtin)],
            FilterBySource::UserAndBuiltin => vec![
                (self.names.user.clone(), Source::User),
                (self.names.builtin.clone(), Source::Builtin),
            ],
            FilterBySource::All => vec![
                (self.names.user.clone(), Source::User),
                (self.names.builtin.clone(), Source::Builtin),
                (self.names.general.clone(), Source::General),
            ],
        }
    }
}
