//! In-process knowledge store
//!
//! Keeps the knowledge collection, conversation log and agent-state log in
//! memory behind a `tokio::sync::RwLock`. With a snapshot path the store is
//! written to a JSON file after every append and reloaded (and re-embedded)
//! on open, so answers survive restarts.

use crate::errors::{AgentError, Result};
use crate::memory::embedding::{cosine_distance, Embedder};
use crate::memory::logs::InteractionLog;
use crate::memory::store::KnowledgeStore;
use crate::memory::types::{AgentStateRecord, AgentStatus, ConversationTurn, KnowledgeHit, KnowledgeRecord, Role};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

struct IndexedRecord {
    record: KnowledgeRecord,
    embedding: Vec<f32>,
}

#[derive(Default)]
struct StoreState {
    knowledge: Vec<IndexedRecord>,
    log: InteractionLog,
}

/// On-disk form of the store; embeddings are recomputed on load
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    knowledge: Vec<KnowledgeRecord>,
    #[serde(default)]
    log: InteractionLog,
}

pub struct LocalKnowledgeStore {
    embedder: Arc<dyn Embedder>,
    state: RwLock<StoreState>,
    snapshot_path: Option<PathBuf>,
}

impl LocalKnowledgeStore {
    /// Empty store without persistence
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            state: RwLock::new(StoreState::default()),
            snapshot_path: None,
        }
    }

    /// Store backed by a JSON snapshot at `path`, loading it if present
    pub async fn open(embedder: Arc<dyn Embedder>, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut state = StoreState::default();

        if tokio::fs::try_exists(&path).await? {
            let json = tokio::fs::read_to_string(&path).await?;
            let snapshot: Snapshot = serde_json::from_str(&json)?;

            for record in snapshot.knowledge {
                let embedding = embedder.embed_document(&record.content)?;
                state.knowledge.push(IndexedRecord { record, embedding });
            }
            state.log = snapshot.log;

            tracing::info!(
                path = %path.display(),
                documents = state.knowledge.len(),
                turns = state.log.history().len(),
                "knowledge snapshot loaded"
            );
        }

        Ok(Self {
            embedder,
            state: RwLock::new(state),
            snapshot_path: Some(path),
        })
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    /// Write the snapshot (no-op without a snapshot path). Writes to a
    /// temporary sibling then renames over the target.
    async fn persist(&self, knowledge: &[IndexedRecord], log: &InteractionLog) -> Result<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };

        let snapshot = Snapshot {
            knowledge: knowledge.iter().map(|r| r.record.clone()).collect(),
            log: log.clone(),
        };
        let json = serde_json::to_string_pretty(&snapshot)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[async_trait]
impl KnowledgeStore for LocalKnowledgeStore {
    async fn add_knowledge(
        &self,
        content: &str,
        topic: &str,
        source: &str,
        task_id: Uuid,
    ) -> Result<KnowledgeRecord> {
        if content.trim().is_empty() {
            return Err(AgentError::StoreError("cannot index an empty document".to_string()));
        }

        let embedding = self.embedder.embed_document(content)?;
        let record = KnowledgeRecord::new(content, topic, source, task_id);

        let mut state = self.state.write().await;
        state.knowledge.push(IndexedRecord {
            record: record.clone(),
            embedding,
        });
        // Nothing is committed unless the snapshot write succeeds
        if let Err(e) = self.persist(&state.knowledge, &state.log).await {
            state.knowledge.pop();
            return Err(e);
        }

        tracing::debug!(id = %record.id, topic = %record.topic, "knowledge added");
        Ok(record)
    }

    async fn search_knowledge(&self, query: &str, n_results: usize) -> Result<Vec<KnowledgeHit>> {
        let state = self.state.read().await;
        if state.knowledge.is_empty() || n_results == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed_query(query)?;
        let mut hits: Vec<KnowledgeHit> = state
            .knowledge
            .iter()
            .map(|indexed| KnowledgeHit {
                record: indexed.record.clone(),
                distance: cosine_distance(&query_embedding, &indexed.embedding),
            })
            .collect();

        // Stable sort keeps insertion order among equal distances
        hits.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));
        hits.truncate(n_results);
        Ok(hits)
    }

    async fn add_conversation_turn(&self, role: Role, content: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let mut log = state.log.clone();
        log.push_turn(role, content);
        self.persist(&state.knowledge, &log).await?;
        state.log = log;
        Ok(())
    }

    async fn conversation_history(&self) -> Result<Vec<ConversationTurn>> {
        Ok(self.state.read().await.log.history().to_vec())
    }

    async fn update_agent_state(
        &self,
        task_id: Uuid,
        agent_name: &str,
        status: AgentStatus,
        details: &str,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let mut log = state.log.clone();
        log.push_state(task_id, agent_name, status, details);
        self.persist(&state.knowledge, &log).await?;
        state.log = log;
        Ok(())
    }

    async fn agent_states(&self, task_id: Uuid) -> Result<Vec<AgentStateRecord>> {
        Ok(self.state.read().await.log.states(task_id))
    }

    async fn knowledge_count(&self) -> Result<usize> {
        Ok(self.state.read().await.knowledge.len())
    }
}
