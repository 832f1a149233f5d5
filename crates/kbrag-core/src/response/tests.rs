use std::collections::BTreeMap;
use std::sync::Arc;

use super::*;
use crate::llm::MockLlmClient;
use crate::router::Source;
use crate::vectorstore::{Document, ScoredDocument};

fn routed(id: &str, keys: &str, source: Source, score: f64) -> RoutedDocument {
    let mut metadata = BTreeMap::new();
    metadata.insert("keys".to_string(), keys.to_string());
    metadata.insert("command".to_string(), format!("do {keys}"));
    metadata.insert("description".to_string(), format!("description for {keys}"));
    metadata.insert(
        "source".to_string(),
        match source {
            Source::User => "user",
            Source::Builtin => "builtin",
            Source::General => "general",
        }
        .to_string(),
    );

    let document = Document {
        id: id.to_string(),
        content: format!("{keys} do {keys}"),
        metadata,
        vector: vec![1.0],
    };

    let boost = match source {
        Source::User => 0.2,
        Source::Builtin => 0.1,
        Source::General => 0.0,
    };

    RoutedDocument {
        scored: ScoredDocument { document, score },
        source,
        boosted_score: score + boost,
    }
}

fn recommendation(keys: &str, score: f64, rank: usize) -> ParsedRecommendation {
    ParsedRecommendation {
        rank,
        keys: keys.to_string(),
        command: Some(format!("do {keys}")),
        description: Some(format!("description for {keys}")),
        mode: Some("n".to_string()),
        score,
        explanation: format!("matches {keys}"),
    }
}

fn sections(recs: Vec<ParsedRecommendation>) -> GeneratedSections {
    GeneratedSections {
        analysis: None,
        recommendations: recs,
        reasoning: Some("dw is the standard delete-word binding".to_string()),
        alternatives: None,
        used_fallback: false,
    }
}

#[test]
fn ranking_is_monotonic_in_llm_score() {
    let weights = RankingWeights::default();
    let vector = vec![routed("a", "dw", Source::User, 0.5)];

    let low = rank::fuse(
        &vector,
        &sections(vec![recommendation("dw", 0.3, 1)]),
        None,
        &weights,
        5,
        0.3,
    );
    let high = rank::fuse(
        &vector,
        &sections(vec![recommendation("dw", 0.9, 1)]),
        None,
        &weights,
        5,
        0.3,
    );

    assert!(high.0[0].relevance > low.0[0].relevance);
}

#[test]
fn user_source_outranks_builtin_with_identical_raw_scores() {
    let weights = RankingWeights::default();
    let vector = vec![
        routed("u1", "dw", Source::User, 0.5),
        routed("b1", "dw2", Source::Builtin, 0.5),
    ];
    let recs = vec![recommendation("dw", 0.6, 1), recommendation("dw2", 0.6, 2)];

    let (ranked, _) = rank::fuse(&vector, &sections(recs), None, &weights, 5, 0.3);

    let user_rank = ranked
        .iter()
        .position(|r| r.keybinding.keys == "dw")
        .unwrap();
    let builtin_rank = ranked
        .iter()
        .position(|r| r.keybinding.keys == "dw2")
        .unwrap();
    assert!(user_rank < builtin_rank);
}

#[test]
fn fuzzy_match_penalizes_vector_score() {
    let weights = RankingWeights::default();
    let vector = vec![routed("a", "<C-v>", Source::User, 0.5)];
    let recs = vec![recommendation("ctrl-v", 0.5, 1)];

    let (ranked, _) = rank::fuse(&vector, &sections(recs), None, &weights, 5, 0.3);
    assert_eq!(ranked.len(), 1);
    assert!(ranked[0].vector_score.unwrap() < 0.5 + 0.2);
}

#[test]
fn unmatched_llm_recommendation_is_dropped() {
    let weights = RankingWeights::default();
    let vector = vec![routed("a", "dw", Source::User, 0.5)];
    let recs = vec![recommendation("totally-different-keys", 0.9, 1)];

    // threshold above the vector doc's boosted score (0.7) so the only
    // way "dw" could surface is via the (dropped) recommendation match.
    let (ranked, _) = rank::fuse(&vector, &sections(recs), None, &weights, 5, 0.8);
    assert!(ranked.is_empty());
}

#[test]
fn vector_only_results_above_threshold_are_appended() {
    let weights = RankingWeights::default();
    let vector = vec![routed("a", "dw", Source::User, 0.6)];
    let (ranked, _) = rank::fuse(&vector, &sections(vec![]), None, &weights, 5, 0.3);
    assert_eq!(ranked.len(), 1);
    assert!(ranked[0].llm_score.is_none());
}

#[test]
fn vector_only_results_below_threshold_are_dropped() {
    let weights = RankingWeights::default();
    let vector = vec![routed("a", "dw", Source::General, 0.1)];
    let (ranked, _) = rank::fuse(&vector, &sections(vec![]), None, &weights, 5, 0.5);
    assert!(ranked.is_empty());
}

#[test]
fn results_are_truncated_to_max_final_results() {
    let weights = RankingWeights::default();
    let vector: Vec<RoutedDocument> = (0..10)
        .map(|i| routed(&format!("k{i}"), &format!("key{i}"), Source::General, 0.9))
        .collect();
    let (ranked, _) = rank::fuse(&vector, &sections(vec![]), None, &weights, 3, 0.1);
    assert_eq!(ranked.len(), 3);
}

#[tokio::test]
async fn generate_and_parse_round_trips_through_mock_llm() {
    let llm = Arc::new(MockLlmClient::default());
    let generator = ResponseGenerator::new(llm);
    let sections = generator
        .generate_and_parse("delete a word", "dw - delete word")
        .await
        .unwrap();
    assert!(!sections.is_empty());
    assert_eq!(sections.recommendations[0].keys, "dw");
}

#[test]
fn reasoning_quotes_llm_reasoning_section_when_present() {
    let weights = RankingWeights::default();
    let vector = vec![routed("a", "dw", Source::User, 0.6)];
    let recs = vec![recommendation("dw", 0.8, 1)];
    let (_, reasoning) = rank::fuse(&vector, &sections(recs), None, &weights, 5, 0.3);
    assert!(reasoning.contains("dw is the standard delete-word binding"));
}
