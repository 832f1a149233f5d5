//! `Vectorizer` (spec.md §4.4): validation, content rendering,
//! embedding, and incremental maintenance of the user collection.
//!
//! The hash store and its single-writer/many-reader discipline mirror
//! the teacher's `src/hashing/mod.rs` content-hash cache check. Unlike
//! `parking_lot`'s, `tokio::sync::RwLock` is safe to hold across `.await`
//! points, which `incremental` needs to keep the whole diff -> delete ->
//! embed -> upsert sequence under one writer. The bounded-concurrency
//! embed fan-out is the teacher's `L2SemanticCache` `join_all` shape
//! (`src/cache/l2/cache.rs`) plus a `tokio::sync::Semaphore` gate,
//! generalized from unconditional concurrency to a caller-configured cap
//! (spec.md §4.4/§9 "counting gate").

pub mod content;
pub mod error;
pub mod model;

#[cfg(test)]
mod tests;

pub use error::VectorizerError;
pub use model::IncrementalOutcome;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use futures_util::future::join_all;
use tokio::sync::{RwLock, Semaphore};
use tracing::{info, instrument, warn};

use crate::keybinding::{self, Keybinding, RawKeybinding};
use crate::llm::LLMClient;
use crate::router::{CollectionRouter, Source};
use crate::vectorstore::Document;

/// Validation, rendering, embedding, and incremental sync of the user
/// collection.
pub struct Vectorizer {
    llm: Arc<dyn LLMClient>,
    router: Arc<CollectionRouter>,
    hash_store: RwLock<HashMap<String, String>>,
    embed_concurrency: usize,
}

impl Vectorizer {
    /// Builds a vectorizer with an empty hash store.
    pub fn new(llm: Arc<dyn LLMClient>, router: Arc<CollectionRouter>, embed_concurrency: usize) -> Self {
        Self {
            llm,
            router,
            hash_store: RwLock::new(HashMap::new()),
            embed_concurrency: embed_concurrency.max(1),
        }
    }

    /// Parses a raw record (spec.md §4.4 `Parse`).
    pub fn parse(&self, raw: RawKeybinding) -> keybinding::ParseOutcome {
        keybinding::parse(raw)
    }

    /// The content hash of a keybinding (spec.md §4.4 `Hash`).
    pub fn hash(&self, kb: &Keybinding) -> String {
        keybinding::hash_of(kb)
    }

    /// The stable id of a keybinding (spec.md §4.4 `Id`).
    pub fn id(&self, kb: &Keybinding) -> String {
        keybinding::id_of(kb)
    }

    /// Returns the current number of tracked ids, for diagnostics.
    pub async fn tracked_count(&self) -> usize {
        self.hash_store.read().await.len()
    }

    /// Deletes every document in the user collection and empties the
    /// hash store (SPEC_FULL §9.2's resolution of spec.md's
    /// `SyncKeybindings.clearExisting` open question: delete-then-insert,
    /// atomicity best-effort). Returns the number of documents removed.
    /// Callers run [`Vectorizer::incremental`] afterward to insert the
    /// new set; a failure between the two leaves the user collection and
    /// hash store both empty, which a subsequent sync reconciles.
    #[instrument(skip(self))]
    pub async fn clear_user_collection(&self) -> Result<usize, VectorizerError> {
        let mut store = self.hash_store.write().await;
        let deleted_ids = self.router.clear_user_collection().await?;
        store.clear();
        Ok(deleted_ids.len())
    }

    /// The central `Incremental` routine (spec.md §4.4): diffs `inputs`
    /// against the hash store, deletes what's gone, re-embeds and
    /// upserts what changed. Guarded end-to-end by one write guard held
    /// across the whole diff -> delete -> embed -> upsert sequence,
    /// including its awaited calls into the router and the LLM, so no
    /// other `incremental` call can interleave (spec.md §5: "No other
    /// mutator may touch the hash store during an update").
    #[instrument(skip(self, raw_keybindings))]
    pub async fn incremental(
        &self,
        raw_keybindings: Vec<RawKeybinding>,
    ) -> Result<IncrementalOutcome, VectorizerError> {
        let mut parsed = Vec::with_capacity(raw_keybindings.len());
        for raw in raw_keybindings {
            match keybinding::parse(raw) {
                keybinding::ParseOutcome::Valid(kb) => parsed.push(kb),
                keybinding::ParseOutcome::Invalid(reason) => {
                    return Err(VectorizerError::ValidationFailed {
                        count: 1,
                        first: reason,
                    });
                }
            }
        }

        let current_ids: HashSet<String> = parsed.iter().map(|kb| kb.id.clone()).collect();

        // Single writer section: hold the write guard from the diff
        // through the final hash-store update, so a second concurrent
        // `incremental` call can't observe a stale snapshot between this
        // call's delete and upsert phases.
        let mut store = self.hash_store.write().await;

        let changed: Vec<Keybinding> = parsed
            .into_iter()
            .filter(|kb| store.get(&kb.id) != Some(&keybinding::hash_of(kb)))
            .collect();
        let to_delete: Vec<String> = store
            .keys()
            .filter(|id| !current_ids.contains(*id))
            .cloned()
            .collect();

        let delete_started = Instant::now();
        if !to_delete.is_empty() {
            self.router.delete(Source::User, &to_delete).await?;
            for id in &to_delete {
                store.remove(id);
            }
        }
        let delete_duration = delete_started.elapsed();

        let update_started = Instant::now();
        let changed_ids: Vec<String> = changed.iter().map(|kb| kb.id.clone()).collect();
        if !changed.is_empty() {
            let documents = self.embed_and_build_documents(&changed).await?;
            self.router.upsert(Source::User, documents).await?;

            for kb in &changed {
                store.insert(kb.id.clone(), keybinding::hash_of(kb));
            }
        }
        let update_duration = update_started.elapsed();

        drop(store);

        info!(
            changed = changed_ids.len(),
            deleted = to_delete.len(),
            ?delete_duration,
            ?update_duration,
            "incremental sync complete"
        );

        Ok(IncrementalOutcome {
            changed: changed_ids,
            deleted: to_delete,
            delete_duration,
            update_duration,
        })
    }

    async fn embed_and_build_documents(
        &self,
        keybindings: &[Keybinding],
    ) -> Result<Vec<Document>, VectorizerError> {
        let semaphore = Arc::new(Semaphore::new(self.embed_concurrency));

        let tasks = keybindings.iter().map(|kb| {
            let semaphore = Arc::clone(&semaphore);
            let llm = Arc::clone(&self.llm);
            let content = content::render(kb);
            let kb_id = kb.id.clone();
            let kb_hash = keybinding::hash_of(kb);
            let metadata = kb.metadata.clone();
            let keys = kb.keys.clone();
            let command = kb.command.clone();
            let mode = kb.mode.as_str().to_string();
            let description = kb.description.clone();
            let plugin = kb.plugin.clone();

            async move {
                let _permit = semaphore
                    .acquire()
                    .await
                    .expect("semaphore is never closed");
                let vector = llm.embed(&content).await?;

                let mut doc_metadata: BTreeMap<String, String> = metadata;
                doc_metadata.insert("keybinding_id".to_string(), kb_id.clone());
                doc_metadata.insert("content_hash".to_string(), kb_hash);
                doc_metadata.insert("content_length".to_string(), content.len().to_string());
                doc_metadata
                    .entry("source".to_string())
                    .or_insert_with(|| "user".to_string());
                doc_metadata.insert("vectorized_at".to_string(), chrono::Utc::now().to_rfc3339());
                doc_metadata.insert("keys".to_string(), keys);
                doc_metadata.insert("command".to_string(), command);
                doc_metadata.insert("mode".to_string(), mode);
                if let Some(description) = description {
                    doc_metadata.insert("description".to_string(), description);
                }
                if let Some(plugin) = plugin {
                    doc_metadata.insert("plugin".to_string(), plugin);
                }

                Ok::<Document, VectorizerError>(Document {
                    id: kb_id,
                    content,
                    metadata: doc_metadata,
                    vector,
                })
            }
        });

        let results = join_all(tasks).await;

        // spec.md §4.4: "fail the whole batch if any embedding fails".
        let mut documents = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(doc) => documents.push(doc),
                Err(err) => {
                    warn!(error = %err, "batch embedding failed, aborting incremental update");
                    return Err(err);
                }
            }
        }

        Ok(documents)
    }
}
