//! Qdrant-backed [`super::VectorStore`] implementation, enabled by the
//! `qdrant` feature.
//!
//! Grounded in the teacher's `QdrantClient` (`src/vectordb/client.rs`):
//! same builder calls (`CreateCollectionBuilder`, `UpsertPointsBuilder`,
//! `SearchPointsBuilder`, `DeletePointsBuilder`), same
//! on-first-use `ensure_collection`. Generalized from the teacher's single
//! `reflex_cache` collection keyed by `u64` point ids with a `tenant_id`
//! payload filter, to many named collections keyed by string keybinding
//! ids (Qdrant point ids are a uuid derived deterministically from the
//! string id, with the original id kept in the payload) and no filter
//! (collection name is the partition).

use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, DeletePointsBuilder, Distance, PointId, PointStruct,
    PointsIdsList, SearchPointsBuilder, UpsertPointsBuilder, Value as QdrantValue,
    VectorParamsBuilder, value::Kind,
};
use tokio::sync::RwLock;

use super::error::VectorStoreError;
use super::model::{Document, IncludeOptions, ScoredDocument, score_from_distance};
use super::VectorStore;

const DOC_ID_PAYLOAD_KEY: &str = "kbrag_doc_id";
const CONTENT_PAYLOAD_KEY: &str = "kbrag_content";

/// A [`VectorStore`] backed by a live Qdrant instance.
pub struct QdrantVectorStore {
    client: Qdrant,
    vector_size: u64,
    known_collections: RwLock<std::collections::HashSet<String>>,
}

impl QdrantVectorStore {
    /// Connects to `url`. Collections are created lazily on first
    /// [`VectorStore::upsert`], matching the teacher's `ensure_collection`
    /// on-first-use pattern.
    pub async fn new(url: &str, vector_size: u64) -> Result<Self, VectorStoreError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| VectorStoreError::Unhealthy(e.to_string()))?;

        Ok(Self {
            client,
            vector_size,
            known_collections: RwLock::new(std::collections::HashSet::new()),
        })
    }

    async fn ensure_collection(&self, name: &str) -> Result<(), VectorStoreError> {
        if self.known_collections.read().await.contains(name) {
            return Ok(());
        }

        let exists = self
            .client
            .collection_exists(name)
            .await
            .map_err(|e| VectorStoreError::CollectionNotFound {
                collection: format!("{name} ({e})"),
            })?;

        if !exists {
            self.client
                .create_collection(
                    CreateCollectionBuilder::new(name)
                        .vectors_config(VectorParamsBuilder::new(self.vector_size, Distance::Cosine))
                        .on_disk_payload(true),
                )
                .await
                .map_err(|e| VectorStoreError::UpsertFailed {
                    collection: name.to_string(),
                    offset: 0,
                    message: e.to_string(),
                })?;
        }

        self.known_collections.write().await.insert(name.to_string());
        Ok(())
    }
}

fn point_id_for(doc_id: &str) -> PointId {
    uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_OID, doc_id.as_bytes())
        .to_string()
        .into()
}

fn string_value(s: impl Into<String>) -> QdrantValue {
    QdrantValue {
        kind: Some(Kind::StringValue(s.into())),
    }
}

fn value_as_string(value: &QdrantValue) -> Option<String> {
    match &value.kind {
        Some(Kind::StringValue(s)) => Some(s.clone()),
        _ => None,
    }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    async fn upsert(&self, collection: &str, docs: Vec<Document>) -> Result<(), VectorStoreError> {
        if docs.is_empty() {
            return Ok(());
        }
        self.ensure_collection(collection).await?;

        let points: Vec<PointStruct> = docs
            .into_iter()
            .map(|doc| {
                let mut payload: HashMap<String, QdrantValue> = HashMap::new();
                payload.insert(DOC_ID_PAYLOAD_KEY.to_string(), string_value(doc.id.clone()));
                payload.insert(CONTENT_PAYLOAD_KEY.to_string(), string_value(doc.content));
                for (k, v) in doc.metadata {
                    payload.insert(k, string_value(v));
                }

                let vector: Vec<f32> = doc.vector.iter().map(|v| *v as f32).collect();
                PointStruct::new(point_id_for(&doc.id), vector, payload)
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, points).wait(true))
            .await
            .map_err(|e| VectorStoreError::UpsertFailed {
                collection: collection.to_string(),
                offset: 0,
                message: e.to_string(),
            })?;

        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        vector: &[f64],
        k: usize,
        _include: IncludeOptions,
    ) -> Result<Vec<ScoredDocument>, VectorStoreError> {
        let query_vector: Vec<f32> = vector.iter().map(|v| *v as f32).collect();

        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(collection, query_vector, k as u64).with_payload(true),
            )
            .await
            .map_err(|e| VectorStoreError::QueryFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        let scored = response
            .result
            .into_iter()
            .filter_map(|point| {
                let mut payload = point.payload;
                let doc_id = payload
                    .remove(DOC_ID_PAYLOAD_KEY)
                    .and_then(|v| value_as_string(&v))?;
                let content = payload
                    .remove(CONTENT_PAYLOAD_KEY)
                    .and_then(|v| value_as_string(&v))
                    .unwrap_or_default();
                let metadata = payload
                    .into_iter()
                    .filter_map(|(k, v)| value_as_string(&v).map(|s| (k, s)))
                    .collect();

                let distance = 1.0 - point.score as f64;
                Some(ScoredDocument {
                    document: Document {
                        id: doc_id,
                        content,
                        metadata,
                        vector: Vec::new(),
                    },
                    score: score_from_distance(distance),
                })
            })
            .collect();

        Ok(scored)
    }

    async fn delete(&self, collection: &str, ids: &[String]) -> Result<(), VectorStoreError> {
        if ids.is_empty() {
            return Ok(());
        }

        let points_selector = PointsIdsList {
            ids: ids.iter().map(|id| point_id_for(id)).collect(),
        };

        self.client
            .delete_points(
                DeletePointsBuilder::new(collection)
                    .points(points_selector)
                    .wait(true),
            )
            .await
            .map_err(|e| VectorStoreError::DeleteFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    async fn count(&self, collection: &str) -> Result<usize, VectorStoreError> {
        let info = self
            .client
            .collection_info(collection)
            .await
            .map_err(|e| VectorStoreError::QueryFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        Ok(info
            .result
            .map(|r| r.points_count.unwrap_or(0) as usize)
            .unwrap_or(0))
    }

    async fn list_collections(&self) -> Result<Vec<String>, VectorStoreError> {
        let response = self
            .client
            .list_collections()
            .await
            .map_err(|e| VectorStoreError::Unhealthy(e.to_string()))?;

        Ok(response
            .collections
            .into_iter()
            .map(|c| c.name)
            .collect())
    }

    async fn health(&self) -> Result<(), VectorStoreError> {
        self.client
            .health_check()
            .await
            .map_err(|e| VectorStoreError::Unhealthy(e.to_string()))?;
        Ok(())
    }
}
