//! Startup wiring for agentdesk
//!
//! Turns a validated `Config` into a ready embedder, knowledge store and
//! coordinator. Optional backends are only available when their cargo
//! feature is compiled in.

use crate::agents::{AnalysisAgent, MemoryAgent, ResearchAgent};
use crate::cli::{Config, EmbedderKind, StoreBackend};
use crate::coordinator::Coordinator;
use crate::errors::{AgentError, Result};
use crate::memory::{Embedder, HashingEmbedder, KnowledgeStore, LocalKnowledgeStore};
use crate::telemetry::TelemetryCollector;
use std::sync::Arc;

/// Embedder selected by `[embedding]`
pub fn build_embedder(config: &Config) -> Result<Arc<dyn Embedder>> {
    match config.embedding.kind {
        EmbedderKind::Hashing => Ok(Arc::new(HashingEmbedder::new(config.embedding.dimension)?)),
        #[cfg(feature = "semantic")]
        EmbedderKind::Nomic => {
            tracing::info!("loading nomic-embed-text");
            Ok(Arc::new(crate::memory::embedding::NomicEmbedder::load()?))
        }
        #[cfg(not(feature = "semantic"))]
        EmbedderKind::Nomic => Err(AgentError::ConfigError(
            "embedding kind 'nomic' requires the 'semantic' feature".to_string(),
        )),
    }
}

/// Knowledge store selected by `[memory]`
pub async fn build_store(config: &Config, embedder: Arc<dyn Embedder>) -> Result<Arc<dyn KnowledgeStore>> {
    match config.memory.backend {
        StoreBackend::Memory => {
            let store = match config.snapshot_path() {
                Some(path) => {
                    tracing::debug!(path = %path.display(), "opening knowledge snapshot");
                    LocalKnowledgeStore::open(embedder, path).await?
                }
                None => LocalKnowledgeStore::new(embedder),
            };
            Ok(Arc::new(store))
        }
        #[cfg(feature = "qdrant")]
        StoreBackend::Qdrant => {
            let store = crate::memory::QdrantKnowledgeStore::connect(
                &config.qdrant.url,
                &config.qdrant.collection,
                embedder,
            )
            .await?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "qdrant"))]
        StoreBackend::Qdrant => {
            let _ = embedder;
            Err(AgentError::ConfigError(
                "memory backend 'qdrant' requires the 'qdrant' feature".to_string(),
            ))
        }
    }
}

/// Coordinator with the standard agents over `store`. Every agent logs under
/// one `agentdesk` root span.
pub fn build_coordinator(
    config: &Config,
    store: Arc<dyn KnowledgeStore>,
    persist_override: Option<bool>,
    telemetry: TelemetryCollector,
) -> Result<Coordinator> {
    let root = tracing::info_span!("agentdesk");
    let agent_span = |name: &'static str| tracing::info_span!(parent: &root, "agent", name = name);

    let memory = MemoryAgent::new(store)
        .with_match_distance(config.memory.match_distance)
        .with_span(agent_span("memory"));

    let coordinator = Coordinator::new(Arc::new(memory), config.coordinator_config(persist_override))
        .with_agent(Arc::new(ResearchAgent::new().with_span(agent_span("research"))))?
        .with_agent(Arc::new(AnalysisAgent::new().with_span(agent_span("analysis"))))?
        .with_telemetry(telemetry)
        .with_span(tracing::info_span!(parent: &root, "coordinator"));
    Ok(coordinator)
}
