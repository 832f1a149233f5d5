//! Fuzzy key matching and the fusion-ranking formula (spec.md §4.6).

use std::collections::{HashMap, HashSet};

use crate::query::ProcessedQuery;
use crate::router::RoutedDocument;

use super::model::{GeneratedSections, KeybindingView, ParsedRecommendation, RankedResult, RankingWeights};

/// Abbreviation groups used when normalizing a key sequence for fuzzy
/// matching (spec.md §4.6): every token in a group is treated as
/// equivalent.
const ABBREVIATION_GROUPS: &[&[&str]] = &[
    &["ctrl", "c", "control"],
    &["alt", "a", "meta"],
    &["cmd", "d", "command"],
    &["esc", "escape"],
    &["ret", "return", "enter"],
    &["tab", "t"],
    &["spc", "space"],
];

/// Normalizes a vim-notation key sequence for fuzzy comparison: strips
/// angle brackets and punctuation, lowercases, and canonicalizes each
/// token through [`ABBREVIATION_GROUPS`] (spec.md §4.6: "strip angle
/// brackets, case, punctuation, and accept a small abbreviation table").
pub fn normalize_key(keys: &str) -> String {
    let lowered = keys.to_lowercase();
    lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|tok| !tok.is_empty())
        .map(canonicalize_token)
        .collect::<Vec<_>>()
        .join("")
}

fn canonicalize_token(token: &str) -> String {
    for group in ABBREVIATION_GROUPS {
        if group.contains(&token) {
            return group[0].to_string();
        }
    }
    token.to_string()
}

/// Which field of `RoutedDocument` a recommendation matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchKind {
    Exact,
    Fuzzy,
}

/// Fuses vector search results with the LLM's parsed recommendations
/// into a final ranked list (spec.md §4.6).
///
/// Returns the ranked results (already truncated to `max_final_results`)
/// and a deterministic one-paragraph reasoning summary.
pub fn fuse(
    vector_results: &[RoutedDocument],
    sections: &GeneratedSections,
    processed: Option<&ProcessedQuery>,
    weights: &RankingWeights,
    max_final_results: usize,
    relevance_threshold: f64,
) -> (Vec<RankedResult>, String) {
    let exact_by_keys: HashMap<&str, usize> = vector_results
        .iter()
        .enumerate()
        .filter_map(|(idx, doc)| doc.scored.document.metadata.get("keys").map(|k| (k.as_str(), idx)))
        .collect();

    let mut fuzzy_by_keys: HashMap<String, usize> = HashMap::new();
    for (idx, doc) in vector_results.iter().enumerate() {
        if let Some(keys) = doc.scored.document.metadata.get("keys") {
            fuzzy_by_keys.entry(normalize_key(keys)).or_insert(idx);
        }
    }

    let mut used: HashSet<usize> = HashSet::new();
    let mut scored: Vec<(f64, RankedResult)> = Vec::new();

    for rec in &sections.recommendations {
        let found = exact_by_keys
            .get(rec.keys.as_str())
            .map(|idx| (*idx, MatchKind::Exact))
            .or_else(|| {
                fuzzy_by_keys
                    .get(&normalize_key(&rec.keys))
                    .map(|idx| (*idx, MatchKind::Fuzzy))
            });

        let Some((idx, kind)) = found else {
            // spec.md §7: "LLM alone is not trusted to produce
            // keybindings" - a recommendation with no vector grounding
            // at all is dropped rather than surfaced as a bare guess.
            continue;
        };

        used.insert(idx);
        let routed = &vector_results[idx];
        let Some(view) = KeybindingView::from_document(&routed.scored.document) else {
            continue;
        };

        let vector_score = if kind == MatchKind::Fuzzy {
            routed.boosted_score * weights.fuzzy_match_penalty
        } else {
            routed.boosted_score
        };

        let base = weights.vector_weight * vector_score + weights.llm_weight * rec.score;
        let relevance = apply_bonuses(base, &view, Some(rec), processed, weights);

        scored.push((
            relevance,
            RankedResult {
                keybinding: view,
                relevance,
                explanation: rec.explanation.clone(),
                vector_score: Some(vector_score),
                llm_score: Some(rec.score),
            },
        ));
    }

    for (idx, routed) in vector_results.iter().enumerate() {
        if used.contains(&idx) {
            continue;
        }
        if routed.boosted_score < relevance_threshold {
            continue;
        }
        let Some(view) = KeybindingView::from_document(&routed.scored.document) else {
            continue;
        };

        let base = weights.no_llm_vector_weight * routed.boosted_score;
        let relevance = apply_bonuses(base, &view, None, processed, weights);

        scored.push((
            relevance,
            RankedResult {
                keybinding: view,
                relevance,
                explanation: "Matched by vector similarity; not confirmed by the LLM.".to_string(),
                vector_score: Some(routed.boosted_score),
                llm_score: None,
            },
        ));
    }

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(max_final_results);

    let ranked: Vec<RankedResult> = scored.into_iter().map(|(_, r)| r).collect();
    let reasoning = build_reasoning(&ranked, sections);

    (ranked, reasoning)
}

fn apply_bonuses(
    base: f64,
    view: &KeybindingView,
    rec: Option<&ParsedRecommendation>,
    processed: Option<&ProcessedQuery>,
    weights: &RankingWeights,
) -> f64 {
    let mut score = base;
    let haystack = format!(
        "{} {} {}",
        view.keys,
        view.command,
        view.description.as_deref().unwrap_or("")
    )
    .to_lowercase();

    if let Some(processed) = processed {
        if let Some(intent) = &processed.intent {
            score += weights.intent_confidence_weight * intent.confidence;
            if intent
                .intent
                .keywords()
                .iter()
                .any(|kw| haystack.contains(kw))
            {
                score += weights.keyword_presence_bonus;
            }
        }

        let matched_terms = processed
            .search_terms
            .iter()
            .filter(|term| haystack.contains(term.as_str()))
            .count();
        score += weights.matched_term_weight * matched_terms as f64;
    }

    if let Some(rec) = rec {
        let decay = 1.0 - (rec.rank.saturating_sub(1) as f64) * weights.rank_position_decay;
        score += weights.rank_position_weight * decay.max(0.0);
    }

    if view.metadata.get("source").map(String::as_str) == Some("user") {
        score += weights.user_boost;
    }

    score.clamp(0.0, 1.0)
}

fn build_reasoning(ranked: &[RankedResult], sections: &GeneratedSections) -> String {
    let user_hits = ranked
        .iter()
        .filter(|r| r.keybinding.metadata.get("source").map(String::as_str) == Some("user"))
        .count();
    let builtin_hits = ranked
        .iter()
        .filter(|r| r.keybinding.metadata.get("source").map(String::as_str) == Some("builtin"))
        .count();

    let mut paragraph = format!(
        "Found {} result(s): {} from your own keybindings and {} from built-in knowledge.",
        ranked.len(),
        user_hits,
        builtin_hits,
    );

    if let Some(reasoning) = &sections.reasoning {
        if !reasoning.trim().is_empty() {
            paragraph.push_str(&format!(" The assistant noted: \"{}\"", reasoning.trim()));
        }
    }

    paragraph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_key_strips_brackets_and_case() {
        assert_eq!(normalize_key("<C-v>"), normalize_key("ctrl-v"));
        assert_eq!(normalize_key("<Esc>"), normalize_key("escape"));
    }

    #[test]
    fn normalize_key_applies_abbreviation_table() {
        assert_eq!(normalize_key("<C-w>"), normalize_key("<Control-w>"));
        assert_eq!(normalize_key("<A-x>"), normalize_key("<Meta-x>"));
    }
}
