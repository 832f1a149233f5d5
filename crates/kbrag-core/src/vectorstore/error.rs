use thiserror::Error;

/// Errors returned by [`super::VectorStore`] operations (spec.md §4.1).
#[derive(Debug, Error)]
pub enum VectorStoreError {
    /// The named collection does not exist.
    #[error("collection not found: {collection}")]
    CollectionNotFound {
        /// The collection name.
        collection: String,
    },

    /// `Upsert` failed partway through a batch.
    #[error("upsert failed for collection '{collection}' at offset {offset}: {message}")]
    UpsertFailed {
        /// The collection name.
        collection: String,
        /// The index of the first document in the failing range.
        offset: usize,
        /// The underlying error message.
        message: String,
    },

    /// `Query` failed.
    #[error("query failed for collection '{collection}': {message}")]
    QueryFailed {
        /// The collection name.
        collection: String,
        /// The underlying error message.
        message: String,
    },

    /// `Delete` failed.
    #[error("delete failed for collection '{collection}': {message}")]
    DeleteFailed {
        /// The collection name.
        collection: String,
        /// The underlying error message.
        message: String,
    },

    /// A document's vector dimensionality did not match the collection's.
    #[error("invalid vector dimension in '{collection}': expected {expected}, got {actual}")]
    InvalidDimension {
        /// The collection name.
        collection: String,
        /// The expected dimension.
        expected: usize,
        /// The actual dimension.
        actual: usize,
    },

    /// The store (or its connection) reported itself unhealthy.
    #[error("vector store unhealthy: {0}")]
    Unhealthy(String),
}
