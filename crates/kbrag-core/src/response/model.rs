use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::vectorstore::Document;

/// A recommendation line parsed out of the LLM's `RECOMMENDATIONS`
/// section (spec.md §4.6): `N. Keys: <k> | Command: <c> | Description:
/// <d> | Mode: <m> | Score: <0.0-1.0> | Explanation: <e>`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecommendation {
    /// The 1-based rank this recommendation appeared at in the response.
    pub rank: usize,
    /// The key sequence, as written by the model.
    pub keys: String,
    /// The bound command, if the model supplied one.
    pub command: Option<String>,
    /// The free-text description, if the model supplied one.
    pub description: Option<String>,
    /// The mode, if the model supplied one.
    pub mode: Option<String>,
    /// The model's own confidence, `[0.0, 1.0]`; defaults to `0.7` when
    /// the fallback parser is used (spec.md §4.6).
    pub score: f64,
    /// The model's explanation for why this recommendation fits the query.
    pub explanation: String,
}

/// The structured result of parsing the LLM's response into its four
/// labeled sections (spec.md §4.6).
#[derive(Debug, Clone, Default)]
pub struct GeneratedSections {
    /// The `ANALYSIS` section, verbatim.
    pub analysis: Option<String>,
    /// Parsed `RECOMMENDATIONS` lines.
    pub recommendations: Vec<ParsedRecommendation>,
    /// The `REASONING` section, verbatim.
    pub reasoning: Option<String>,
    /// The `ALTERNATIVES` section, verbatim.
    pub alternatives: Option<String>,
    /// Whether any fallback parser (rather than the strict regex) was
    /// needed to extract at least one recommendation (spec.md §9:
    /// "emit a structured warning when used").
    pub used_fallback: bool,
}

impl GeneratedSections {
    /// True when zero recommendations parsed at all (spec.md §4.6: "If
    /// zero recommendations parse... the LLM contribution is declared
    /// empty").
    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }
}

/// The fusion-ranking formula's constants (spec.md §4.6), collected into
/// one named struct per spec.md §9's design note ("do not inline magic
/// numbers inside the ranking path").
#[derive(Debug, Clone, Copy)]
pub struct RankingWeights {
    /// Weight on the vector score when an LLM score is also present.
    pub vector_weight: f64,
    /// Weight on the LLM score when a vector score is also present.
    pub llm_weight: f64,
    /// Weight on the vector score alone when there is no LLM counterpart.
    pub no_llm_vector_weight: f64,
    /// Score multiplier applied to a fuzzy (non-exact) key match.
    pub fuzzy_match_penalty: f64,
    /// Additive bonus when the query's intent was classified.
    pub intent_confidence_weight: f64,
    /// Additive bonus when the description/keys contain an intent keyword.
    pub keyword_presence_bonus: f64,
    /// Base additive bonus for LLM rank position (decayed per rank).
    pub rank_position_weight: f64,
    /// Per-rank decay applied to `rank_position_weight`.
    pub rank_position_decay: f64,
    /// Additive bonus for `metadata.source == "user"`.
    pub user_boost: f64,
    /// Additive bonus per matched search term.
    pub matched_term_weight: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            vector_weight: 0.4,
            llm_weight: 0.6,
            no_llm_vector_weight: 0.8,
            fuzzy_match_penalty: 0.9,
            intent_confidence_weight: 0.1,
            keyword_presence_bonus: 0.1,
            rank_position_weight: 0.05,
            rank_position_decay: 0.1,
            user_boost: 0.2,
            matched_term_weight: 0.05,
        }
    }
}

/// A reconstructed, display-ready keybinding (spec.md §6's
/// `{"keybinding":{"keys":"dw",…}}` shape).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeybindingView {
    /// The key sequence.
    pub keys: String,
    /// The bound command.
    pub command: String,
    /// Free-text description, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The editor mode string.
    pub mode: String,
    /// Originating plugin, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,
    /// Arbitrary provenance/tags.
    pub metadata: BTreeMap<String, String>,
}

impl KeybindingView {
    /// Reconstructs a display view from a stored [`Document`]'s
    /// metadata. Requires `keys` and `command` to have been carried
    /// through at vectorization time; returns `None` for a malformed
    /// document rather than fabricating placeholder fields.
    pub fn from_document(doc: &Document) -> Option<Self> {
        let keys = doc.metadata.get("keys")?.clone();
        let command = doc.metadata.get("command")?.clone();
        let mode = doc
            .metadata
            .get("mode")
            .cloned()
            .unwrap_or_else(|| "n".to_string());
        let description = doc.metadata.get("description").cloned();
        let plugin = doc.metadata.get("plugin").cloned();

        let metadata = doc
            .metadata
            .iter()
            .filter(|(k, _)| {
                !matches!(
                    k.as_str(),
                    "keys"
                        | "command"
                        | "mode"
                        | "description"
                        | "plugin"
                        | "vectorized_at"
                        | "content_length"
                        | "content_hash"
                        | "keybinding_id"
                )
            })
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Some(Self {
            keys,
            command,
            description,
            mode,
            plugin,
            metadata,
        })
    }
}

/// One fully-ranked, display-ready hit (spec.md §4.6 `RankedResult`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedResult {
    /// The keybinding this result refers to.
    pub keybinding: KeybindingView,
    /// The final fused relevance score, clamped to `[0.0, 1.0]`.
    pub relevance: f64,
    /// A short explanation of why this result matched.
    pub explanation: String,
    /// The raw vector score, if a vector hit contributed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_score: Option<f64>,
    /// The raw LLM score, if an LLM recommendation contributed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_score: Option<f64>,
}
