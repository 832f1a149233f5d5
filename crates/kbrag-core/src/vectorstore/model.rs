use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A stored vector-database record (spec.md §3 "Document").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Equal to the keybinding's id (or a synthetic prefix for seeded
    /// built-in/general records).
    pub id: String,
    /// The rendered embed text.
    pub content: String,
    /// Superset of the keybinding's metadata plus computed fields
    /// (`vectorized_at`, `content_length`, `content_hash`, `source`,
    /// `keybinding_id`).
    pub metadata: BTreeMap<String, String>,
    /// The embedding vector.
    pub vector: Vec<f64>,
}

/// Which collections a query should draw from (spec.md §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterBySource {
    /// User keybindings only.
    User,
    /// Built-in keybindings only.
    Builtin,
    /// All three collections (the default for `Agent::process_query`).
    All,
    /// User and built-in, skipping general knowledge (spec.md §4.3's
    /// "two-collection variant").
    UserAndBuiltin,
}

/// A single scored hit from a [`super::VectorStore::query`] call.
#[derive(Debug, Clone)]
pub struct ScoredDocument {
    /// The matched document.
    pub document: Document,
    /// `score = 1 - distance`, clamped to `[0, 1]` (spec.md §4.1).
    pub score: f64,
}

/// What a caller wants included in a query's results (spec.md §4.1).
#[derive(Debug, Clone, Copy, Default)]
pub struct IncludeOptions {
    /// Include `metadata` in each hit (always true in this implementation
    /// since `Document` always carries its metadata; kept as a field so
    /// the capability signature matches spec.md §4.1 verbatim).
    pub metadata: bool,
    /// Include raw distances alongside the derived score.
    pub distances: bool,
    /// Include ids (always true).
    pub ids: bool,
}

/// Clamps a cosine-like distance into a `[0, 1]` relevance score
/// (spec.md §4.1: "score = 1 - distance, clamped to [0, 1]").
pub fn score_from_distance(distance: f64) -> f64 {
    (1.0 - distance).clamp(0.0, 1.0)
}
