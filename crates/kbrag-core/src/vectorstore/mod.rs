//! The `VectorStore` capability (spec.md §4.1).
//!
//! Grounded in the teacher's `vectordb` module (`src/vectordb/client.rs`,
//! `src/vectordb/mock.rs`): there, a single Qdrant collection keyed by
//! `u64` tenant/context ids; here, three named collections keyed by
//! string keybinding ids. The shape — a small async trait plus a
//! `Qdrant`-backed implementation and an in-memory mock implementing the
//! same trait — is the same. Unlike the teacher's trait (which uses
//! `-> impl Future` and is therefore not object-safe), this trait is
//! `#[async_trait]` so the router can hold `Arc<dyn VectorStore>` for
//! each of the three collections' shared backend.

pub mod error;
mod mock;
pub mod model;
#[cfg(feature = "qdrant")]
pub mod qdrant;

pub use error::VectorStoreError;
pub use mock::InMemoryVectorStore;
pub use model::{Document, FilterBySource, IncludeOptions, ScoredDocument, score_from_distance};
#[cfg(feature = "qdrant")]
pub use qdrant::QdrantVectorStore;

use async_trait::async_trait;

/// Capability abstraction over a vector database (spec.md §4.1): insert,
/// query-by-vector, delete, count, and health, all scoped to a named
/// collection and bounded by a caller-supplied deadline at the call site
/// (spec.md §5 — the deadline itself is applied by the caller via
/// `tokio::time::timeout`, not by the trait).
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Inserts or replaces documents by id. Atomicity per call is
    /// best-effort; a partial failure names the offending batch range.
    async fn upsert(&self, collection: &str, docs: Vec<Document>) -> Result<(), VectorStoreError>;

    /// Returns up to `k` nearest neighbors to `vector`, ascending distance.
    /// An empty result is not an error.
    async fn query(
        &self,
        collection: &str,
        vector: &[f64],
        k: usize,
        include: IncludeOptions,
    ) -> Result<Vec<ScoredDocument>, VectorStoreError>;

    /// Deletes documents by id. Idempotent; unknown ids are not errors.
    async fn delete(&self, collection: &str, ids: &[String]) -> Result<(), VectorStoreError>;

    /// The number of documents in a collection.
    async fn count(&self, collection: &str) -> Result<usize, VectorStoreError>;

    /// The names of all known collections.
    async fn list_collections(&self) -> Result<Vec<String>, VectorStoreError>;

    /// Checks whether the store is reachable and serving.
    async fn health(&self) -> Result<(), VectorStoreError>;
}
