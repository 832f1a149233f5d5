use std::time::Duration;

use async_trait::async_trait;

use super::*;
use crate::llm::{GenerateRequest, GenerateResponse, LlmError, MockLlmClient, ModelInfo};
use crate::vectorstore::InMemoryVectorStore;

/// An `LLMClient` that always reports itself unhealthy, for exercising
/// the degraded branch of `HealthMonitor` without a live backend.
struct AlwaysUnhealthyLlm;

#[async_trait]
impl LLMClient for AlwaysUnhealthyLlm {
    async fn embed(&self, _text: &str) -> Result<Vec<f64>, LlmError> {
        Err(LlmError::Unhealthy("stub always fails".to_string()))
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f64>>, LlmError> {
        Err(LlmError::Unhealthy("stub always fails".to_string()))
    }

    async fn generate(&self, _request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
        Err(LlmError::Unhealthy("stub always fails".to_string()))
    }

    async fn health(&self) -> Result<(), LlmError> {
        Err(LlmError::Unhealthy("stub always fails".to_string()))
    }

    async fn model_info(&self) -> Result<ModelInfo, LlmError> {
        Err(LlmError::Unhealthy("stub always fails".to_string()))
    }
}

#[tokio::test]
async fn check_now_reports_both_dependencies_healthy() {
    let monitor = HealthMonitor::new(
        Arc::new(InMemoryVectorStore::new()),
        Arc::new(MockLlmClient::default()),
        5,
        Duration::from_millis(1),
    );

    let statuses = monitor.check_now().await;
    assert_eq!(statuses.len(), 2);
    assert!(statuses[VECTOR_DB].healthy);
    assert!(statuses[LLM_CLIENT].healthy);
    assert_eq!(HealthMonitor::overall_status(&statuses), "healthy");
}

#[tokio::test]
async fn unhealthy_llm_rolls_up_to_overall_unhealthy() {
    let monitor = HealthMonitor::new(
        Arc::new(InMemoryVectorStore::new()),
        Arc::new(AlwaysUnhealthyLlm),
        5,
        Duration::from_millis(1),
    );

    let statuses = monitor.check_now().await;
    assert!(statuses[VECTOR_DB].healthy);
    assert!(!statuses[LLM_CLIENT].healthy);
    assert!(statuses[LLM_CLIENT].detail.starts_with("unhealthy:"));
    assert!(statuses[VECTOR_DB].detail.starts_with("healthy"));
    assert_eq!(HealthMonitor::overall_status(&statuses), "unhealthy");
}

#[tokio::test]
async fn snapshot_reflects_last_check_now_call() {
    let monitor = HealthMonitor::new(
        Arc::new(InMemoryVectorStore::new()),
        Arc::new(MockLlmClient::default()),
        5,
        Duration::from_millis(1),
    );

    assert!(monitor.snapshot().is_empty());
    monitor.check_now().await;
    assert_eq!(monitor.snapshot().len(), 2);
}

#[tokio::test]
async fn restart_budget_gives_up_after_max_restarts() {
    let monitor = Arc::new(HealthMonitor::new(
        Arc::new(InMemoryVectorStore::new()),
        Arc::new(AlwaysUnhealthyLlm),
        2,
        Duration::from_millis(1),
    ));

    monitor.check_now().await;
    monitor.attempt_restart(LLM_CLIENT).await;

    let snapshot = monitor.snapshot();
    assert!(!snapshot[LLM_CLIENT].healthy);
}
