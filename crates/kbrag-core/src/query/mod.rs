//! `QueryProcessor` (spec.md §4.5): a pure function normalizing and
//! expanding a natural-language query into search terms, synonyms, and a
//! classified intent.
//!
//! Grounded in the teacher's small pure-function normalization helpers
//! (e.g. `reflex::cache::scoring` query/document token overlap), widened
//! here from "count shared tokens" to "tokenize, expand, and classify
//! intent", since spec.md §4.5 asks for all three as one pure step.

pub mod error;
pub mod tables;

#[cfg(test)]
mod tests;

pub use error::QueryError;
pub use tables::Intent;

use std::collections::BTreeSet;

/// The output of [`process`] (spec.md §4.5 `ProcessedQuery`).
#[derive(Debug, Clone)]
pub struct ProcessedQuery {
    /// The normalized, stopword-filtered tokens of the query.
    pub search_terms: Vec<String>,
    /// Synonyms of every search term, deduplicated, original terms excluded.
    pub synonyms: Vec<String>,
    /// The classified intent, if any keyword matched.
    pub intent: Option<ClassifiedIntent>,
}

/// A classified query intent with its confidence (spec.md §4.5).
#[derive(Debug, Clone)]
pub struct ClassifiedIntent {
    /// Which fixed intent category matched.
    pub intent: Intent,
    /// The search terms that matched this intent's keyword set.
    pub keywords: Vec<String>,
    /// `matching keywords / search terms`, capped at `1.0`.
    pub confidence: f64,
}

/// Normalizes and expands `query` (spec.md §4.5):
/// - lowercases, strips control characters, collapses whitespace;
/// - tokenizes on whitespace/punctuation, discarding [`tables::STOPWORDS`];
/// - expands each term through [`tables::SYNONYM_GROUPS`];
/// - classifies intent against [`tables::Intent::ALL`] by keyword overlap,
///   choosing the intent with the most matching keywords (ties broken by
///   [`tables::Intent::ALL`] order, i.e. declaration order).
pub fn process(query: &str) -> Result<ProcessedQuery, QueryError> {
    let normalized: String = query
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .to_lowercase();

    let search_terms: Vec<String> = normalized
        .split(|c: char| c.is_whitespace() || (c.is_ascii_punctuation() && c != '-'))
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .filter(|w| !tables::STOPWORDS.contains(w))
        .map(str::to_string)
        .collect();

    if search_terms.is_empty() {
        return Err(QueryError::NoSearchTerms);
    }

    let synonyms = expand_synonyms(&search_terms);
    let intent = classify_intent(&search_terms);

    Ok(ProcessedQuery {
        search_terms,
        synonyms,
        intent,
    })
}

fn expand_synonyms(search_terms: &[String]) -> Vec<String> {
    let original: BTreeSet<String> = search_terms.iter().cloned().collect();
    let mut expanded: BTreeSet<String> = BTreeSet::new();

    for term in search_terms {
        for group in tables::SYNONYM_GROUPS.iter() {
            let in_group = group.iter().any(|candidate| *candidate == term.as_str());
            if !in_group {
                continue;
            }
            for candidate in group.iter() {
                if !original.contains(*candidate) {
                    expanded.insert((*candidate).to_string());
                }
            }
        }
    }

    expanded.into_iter().collect()
}

fn classify_intent(search_terms: &[String]) -> Option<ClassifiedIntent> {
    let mut best: Option<(Intent, Vec<String>)> = None;

    for intent in Intent::ALL {
        let matched: Vec<String> = search_terms
            .iter()
            .filter(|term| intent.keywords().contains(&term.as_str()))
            .cloned()
            .collect();

        if matched.is_empty() {
            continue;
        }

        let replace = match &best {
            None => true,
            Some((_, best_matched)) => matched.len() > best_matched.len(),
        };
        if replace {
            best = Some((*intent, matched));
        }
    }

    best.map(|(intent, keywords)| {
        let confidence = (keywords.len() as f64 / search_terms.len() as f64).min(1.0);
        ClassifiedIntent {
            intent,
            keywords,
            confidence,
        }
    })
}
