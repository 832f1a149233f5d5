use super::*;
use crate::vectorstore::InMemoryVectorStore;
use std::collections::BTreeMap;

fn doc(id: &str, vector: Vec<f64>) -> Document {
    Document {
        id: id.to_string(),
        content: format!("content for {id}"),
        metadata: BTreeMap::new(),
        vector,
    }
}

async fn seeded_router() -> CollectionRouter {
    let store = Arc::new(InMemoryVectorStore::new());
    let names = CollectionNames::default();

    store
        .upsert(&names.user, vec![doc("user_1", vec![1.0, 0.0])])
        .await
        .unwrap();
    store
        .upsert(&names.builtin, vec![doc("builtin_1", vec![1.0, 0.0])])
        .await
        .unwrap();
    store
        .upsert(&names.general, vec![doc("general_1", vec![1.0, 0.0])])
        .await
        .unwrap();

    CollectionRouter::new(store, names)
}

#[tokio::test]
async fn search_all_merges_and_orders_user_first_on_tie() {
    let router = seeded_router().await;
    let results = router.search_all(&[1.0, 0.0], 10, FilterBySource::All).await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].source, Source::User);
    assert_eq!(results[1].source, Source::Builtin);
    assert_eq!(results[2].source, Source::General);
}

#[tokio::test]
async fn search_all_applies_source_boost() {
    let router = seeded_router().await;
    let results = router.search_all(&[1.0, 0.0], 10, FilterBySource::All).await;

    let user = results.iter().find(|r| r.source == Source::User).unwrap();
    let general = results
        .iter()
        .find(|r| r.source == Source::General)
        .unwrap();
    assert!(user.boosted_score > general.boosted_score);
}

#[tokio::test]
async fn user_and_builtin_filter_skips_general() {
    let router = seeded_router().await;
    let results = router
        .search_all(&[1.0, 0.0], 10, FilterBySource::UserAndBuiltin)
        .await;

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.source != Source::General));
}

#[tokio::test]
async fn merge_is_deduplicated_by_id_keeping_first_occurrence() {
    let store = Arc::new(InMemoryVectorStore::new());
    let names = CollectionNames::default();
    store
        .upsert(&names.user, vec![doc("shared", vec![1.0])])
        .await
        .unwrap();
    store
        .upsert(&names.builtin, vec![doc("shared", vec![1.0])])
        .await
        .unwrap();

    let router = CollectionRouter::new(store, names);
    let results = router.search_all(&[1.0], 10, FilterBySource::All).await;

    let shared_count = results.iter().filter(|r| r.scored.document.id == "shared").count();
    assert_eq!(shared_count, 1);
    assert_eq!(results[0].source, Source::User);
}

#[tokio::test]
async fn results_are_truncated_to_k() {
    let router = seeded_router().await;
    let results = router.search_all(&[1.0, 0.0], 1, FilterBySource::All).await;
    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn clear_user_collection_removes_only_user_documents() {
    let router = seeded_router().await;
    let removed = router.clear_user_collection().await.unwrap();
    assert_eq!(removed, vec!["user_1".to_string()]);

    let results = router.search_all(&[1.0, 0.0], 10, FilterBySource::All).await;
    assert!(results.iter().all(|r| r.source != Source::User));
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn clear_user_collection_on_empty_collection_is_noop() {
    let store = Arc::new(InMemoryVectorStore::new());
    let router = CollectionRouter::new(store, CollectionNames::default());
    let removed = router.clear_user_collection().await.unwrap();
    assert!(removed.is_empty());
}

#[tokio::test]
async fn reruns_on_identical_input_are_stable() {
    let router = seeded_router().await;
    let first = router.search_all(&[1.0, 0.0], 10, FilterBySource::All).await;
    let second = router.search_all(&[1.0, 0.0], 10, FilterBySource::All).await;

    let first_ids: Vec<_> = first.iter().map(|r| r.scored.document.id.clone()).collect();
    let second_ids: Vec<_> = second.iter().map(|r| r.scored.document.id.clone()).collect();
    assert_eq!(first_ids, second_ids);
}
