//! `kbrag-server` entrypoint: wires the mock-backed `kbrag-core`
//! collaborators together and runs the stdio JSON-RPC loop (spec.md §5).
//!
//! Grounded in the teacher's `reflex-server::main` boot sequence
//! (global allocator, `tracing_subscriber::fmt` init, `Config::from_env`
//! + `validate`, a background lifecycle task started before serving,
//! graceful shutdown on Ctrl+C/SIGTERM) with the HTTP listener and
//! cloud-storage hydration swapped for a stdio read/write loop and an
//! in-process health ticker.

use std::sync::Arc;

use mimalloc::MiMalloc;
use tokio::signal;

use kbrag_core::config::Config;
use kbrag_core::health::HealthMonitor;
use kbrag_core::llm::MockLlmClient;
use kbrag_core::metrics::MetricsCollector;
use kbrag_core::vectorstore::InMemoryVectorStore;
use kbrag_core::{Agent, CollectionRouter, LLMClient, VectorStore, Vectorizer};
use kbrag_server::state::ServerState;
use kbrag_server::transport;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let config = Arc::new(config);

    tracing::info!(
        max_final_results = config.max_final_results,
        rpc_timeout_ms = config.rpc_timeout.as_millis() as u64,
        "kbrag-server starting"
    );

    let vector_store: Arc<dyn VectorStore> = Arc::new(InMemoryVectorStore::new());
    let llm: Arc<dyn LLMClient> = Arc::new(MockLlmClient::default());

    let router = Arc::new(CollectionRouter::new(
        Arc::clone(&vector_store),
        config.collection_names.clone(),
    ));
    let vectorizer = Arc::new(Vectorizer::new(
        Arc::clone(&llm),
        Arc::clone(&router),
        config.embed_concurrency,
    ));
    let agent = Arc::new(Agent::new(
        Arc::clone(&llm),
        Arc::clone(&router),
        Arc::clone(&vectorizer),
        config.max_final_results,
        config.relevance_threshold,
    ));
    let health = Arc::new(HealthMonitor::new(
        Arc::clone(&vector_store),
        Arc::clone(&llm),
        config.max_restarts,
        config.restart_delay,
    ));
    let metrics = Arc::new(MetricsCollector::new());

    health.start_ticker(config.health_interval);

    let state = ServerState::new(agent, vectorizer, Arc::clone(&health), metrics, config);

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    tokio::select! {
        result = transport::serve(state, stdin, stdout) => {
            result?;
            tracing::info!("stdin closed, shutting down");
        }
        _ = shutdown_signal() => {
            tracing::info!("received shutdown signal, shutting down");
        }
    }

    health.stop();
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
