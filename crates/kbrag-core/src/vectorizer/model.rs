use std::time::Duration;

/// The result of [`super::Vectorizer::incremental`] (spec.md §4.4).
#[derive(Debug, Clone)]
pub struct IncrementalOutcome {
    /// Ids of keybindings that were re-embedded and upserted.
    pub changed: Vec<String>,
    /// Ids removed from the user collection because they no longer
    /// appear in the input.
    pub deleted: Vec<String>,
    /// Wall-clock time spent in the delete phase.
    pub delete_duration: Duration,
    /// Wall-clock time spent in the update (embed + upsert) phase.
    pub update_duration: Duration,
}
