use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::error::VectorStoreError;
use super::model::{Document, IncludeOptions, ScoredDocument, score_from_distance};
use super::VectorStore;

#[derive(Default, Clone)]
struct Collection {
    documents: HashMap<String, Document>,
}

/// The default, always-available `VectorStore` backend: a
/// `RwLock`-guarded map of named collections, each a map of documents
/// scored by brute-force cosine distance.
///
/// Grounded directly in the teacher's `MockVectorDbClient` /
/// `cosine_similarity` (`src/vectordb/mock.rs`), generalized from a
/// single collection keyed by `u64` to many named collections keyed by
/// string id, and from a single `tenant_filter` to no filter at all
/// (collection name *is* the partition here).
#[derive(Default)]
pub struct InMemoryVectorStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryVectorStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of documents in `collection`, or `None` if the
    /// collection has never been written to.
    pub fn len(&self, collection: &str) -> Option<usize> {
        self.collections
            .read()
            .get(collection)
            .map(|c| c.documents.len())
    }
}

/// Cosine similarity, `0.0` for degenerate (mismatched length or
/// zero-length) inputs. Same shape as the teacher's
/// `vectordb::mock::cosine_similarity`, generalized from `f32` to `f64`.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn upsert(&self, collection: &str, docs: Vec<Document>) -> Result<(), VectorStoreError> {
        let mut collections = self.collections.write();
        let coll = collections.entry(collection.to_string()).or_default();
        for doc in docs {
            coll.documents.insert(doc.id.clone(), doc);
        }
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        vector: &[f64],
        k: usize,
        _include: IncludeOptions,
    ) -> Result<Vec<ScoredDocument>, VectorStoreError> {
        let collections = self.collections.read();
        let Some(coll) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut scored: Vec<ScoredDocument> = coll
            .documents
            .values()
            .map(|doc| {
                let similarity = cosine_similarity(vector, &doc.vector);
                let distance = 1.0 - similarity;
                ScoredDocument {
                    document: doc.clone(),
                    score: score_from_distance(distance),
                }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.document.id.cmp(&b.document.id))
        });
        scored.truncate(k);
        Ok(scored)
    }

    async fn delete(&self, collection: &str, ids: &[String]) -> Result<(), VectorStoreError> {
        let mut collections = self.collections.write();
        if let Some(coll) = collections.get_mut(collection) {
            for id in ids {
                coll.documents.remove(id);
            }
        }
        Ok(())
    }

    async fn count(&self, collection: &str) -> Result<usize, VectorStoreError> {
        Ok(self
            .collections
            .read()
            .get(collection)
            .map(|c| c.documents.len())
            .unwrap_or(0))
    }

    async fn list_collections(&self) -> Result<Vec<String>, VectorStoreError> {
        Ok(self.collections.read().keys().cloned().collect())
    }

    async fn health(&self) -> Result<(), VectorStoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn doc(id: &str, vector: Vec<f64>) -> Document {
        Document {
            id: id.to_string(),
            content: format!("content for {id}"),
            metadata: BTreeMap::new(),
            vector,
        }
    }

    #[tokio::test]
    async fn upsert_then_query_finds_nearest() {
        let store = InMemoryVectorStore::new();
        store
            .upsert(
                "c",
                vec![doc("a", vec![1.0, 0.0]), doc("b", vec![0.0, 1.0])],
            )
            .await
            .unwrap();

        let results = store
            .query("c", &[1.0, 0.0], 10, IncludeOptions::default())
            .await
            .unwrap();
        assert_eq!(results[0].document.id, "a");
    }

    #[tokio::test]
    async fn query_on_missing_collection_is_empty_not_error() {
        let store = InMemoryVectorStore::new();
        let results = store
            .query("nope", &[1.0], 10, IncludeOptions::default())
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn delete_is_idempotent_for_unknown_ids() {
        let store = InMemoryVectorStore::new();
        store.upsert("c", vec![doc("a", vec![1.0])]).await.unwrap();
        store
            .delete("c", &["a".to_string(), "nonexistent".to_string()])
            .await
            .unwrap();
        assert_eq!(store.count("c").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn query_truncates_to_k() {
        let store = InMemoryVectorStore::new();
        let docs: Vec<Document> = (0..10).map(|i| doc(&format!("d{i}"), vec![1.0])).collect();
        store.upsert("c", docs).await.unwrap();
        let results = store
            .query("c", &[1.0], 3, IncludeOptions::default())
            .await
            .unwrap();
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn cosine_similarity_handles_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}
