use super::*;

#[test]
fn lowercases_and_strips_stopwords() {
    let processed = process("How do I delete a word").unwrap();
    assert_eq!(processed.search_terms, vec!["delete", "word"]);
}

#[test]
fn collapses_punctuation_and_whitespace() {
    let processed = process("  delete,,  a   WORD!! ").unwrap();
    assert_eq!(processed.search_terms, vec!["delete", "word"]);
}

#[test]
fn expands_synonyms_without_duplicating_originals() {
    let processed = process("delete a word").unwrap();
    assert!(processed.synonyms.contains(&"remove".to_string()));
    assert!(processed.synonyms.contains(&"erase".to_string()));
    assert!(!processed.synonyms.contains(&"delete".to_string()));
}

#[test]
fn classifies_editing_intent() {
    let processed = process("delete a word").unwrap();
    let intent = processed.intent.expect("should classify an intent");
    assert_eq!(intent.intent.as_str(), "editing");
    assert!(intent.confidence > 0.0 && intent.confidence <= 1.0);
}

#[test]
fn all_stopword_query_has_no_search_terms() {
    let result = process("the a an");
    assert!(matches!(result, Err(QueryError::NoSearchTerms)));
}

#[test]
fn query_with_no_intent_keywords_classifies_nothing() {
    let processed = process("xyzzy plugh").unwrap();
    assert!(processed.intent.is_none());
}

#[test]
fn confidence_is_capped_at_one() {
    // every term is an editing keyword, so matched == search_terms.
    let processed = process("delete remove insert").unwrap();
    let intent = processed.intent.unwrap();
    assert!(intent.confidence <= 1.0);
}
