use super::*;
use crate::config::CollectionNames;
use crate::llm::MockLlmClient;
use crate::vectorstore::InMemoryVectorStore;

fn raw(id: Option<&str>, keys: &str, command: &str) -> RawKeybinding {
    RawKeybinding {
        id: id.map(str::to_string),
        keys: keys.to_string(),
        command: command.to_string(),
        description: None,
        mode: None,
        plugin: None,
        metadata: None,
    }
}

fn vectorizer() -> Vectorizer {
    let store = Arc::new(InMemoryVectorStore::new());
    let router = Arc::new(CollectionRouter::new(store, CollectionNames::default()));
    let llm = Arc::new(MockLlmClient::default());
    Vectorizer::new(llm, router, 5)
}

#[tokio::test]
async fn incremental_upserts_new_keybindings() {
    let v = vectorizer();
    let outcome = v
        .incremental(vec![raw(Some("kb_1"), "dw", "delete word")])
        .await
        .unwrap();

    assert_eq!(outcome.changed, vec!["kb_1".to_string()]);
    assert!(outcome.deleted.is_empty());
    assert_eq!(v.tracked_count().await, 1);
}

#[tokio::test]
async fn incremental_is_noop_when_hash_unchanged() {
    let v = vectorizer();
    let input = vec![raw(Some("kb_1"), "dw", "delete word")];
    v.incremental(input.clone()).await.unwrap();

    let second = v.incremental(input).await.unwrap();
    assert!(second.changed.is_empty());
    assert!(second.deleted.is_empty());
}

#[tokio::test]
async fn incremental_deletes_missing_ids() {
    let v = vectorizer();
    v.incremental(vec![raw(Some("kb_1"), "dw", "delete word")])
        .await
        .unwrap();

    let outcome = v.incremental(vec![]).await.unwrap();
    assert_eq!(outcome.deleted, vec!["kb_1".to_string()]);
    assert_eq!(v.tracked_count().await, 0);
}

#[tokio::test]
async fn incremental_rejects_invalid_records() {
    let v = vectorizer();
    let result = v.incremental(vec![raw(None, "", "delete word")]).await;
    assert!(matches!(result, Err(VectorizerError::ValidationFailed { .. })));
}

#[tokio::test]
async fn clear_user_collection_empties_hash_store_and_documents() {
    let v = vectorizer();
    v.incremental(vec![
        raw(Some("kb_1"), "dw", "delete word"),
        raw(Some("kb_2"), "yy", "yank line"),
    ])
    .await
    .unwrap();
    assert_eq!(v.tracked_count().await, 2);

    let removed = v.clear_user_collection().await.unwrap();
    assert_eq!(removed, 2);
    assert_eq!(v.tracked_count().await, 0);

    let outcome = v.incremental(vec![]).await.unwrap();
    assert!(outcome.deleted.is_empty(), "hash store should already be empty");
}

#[tokio::test]
async fn incremental_re_embeds_when_content_changes() {
    let v = vectorizer();
    v.incremental(vec![raw(Some("kb_1"), "dw", "delete word")])
        .await
        .unwrap();

    let outcome = v
        .incremental(vec![raw(Some("kb_1"), "dw", "delete WORD (changed)")])
        .await
        .unwrap();
    assert_eq!(outcome.changed, vec!["kb_1".to_string()]);
}
