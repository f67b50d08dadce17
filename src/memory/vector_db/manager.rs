//! Qdrant-backed knowledge store
//!
//! Knowledge lives in a Qdrant collection; the conversation and agent-state
//! logs stay in process.

use crate::errors::{AgentError, Result};
use crate::memory::embedding::Embedder;
use crate::memory::logs::InteractionLog;
use crate::memory::store::KnowledgeStore;
use crate::memory::types::{AgentStateRecord, AgentStatus, ConversationTurn, KnowledgeHit, KnowledgeRecord, Role};
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use qdrant_client::{
    client::QdrantClient,
    qdrant::{
        vectors_config::Config, with_payload_selector::SelectorOptions, CreateCollection, Distance,
        PointStruct, SearchPoints, Value as QdrantValue, VectorParams, VectorsConfig,
        WithPayloadSelector,
    },
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Knowledge collection in Qdrant (cosine), conversation and agent-state
/// logs in process
pub struct QdrantKnowledgeStore {
    client: QdrantClient,
    collection: String,
    embedder: Arc<dyn Embedder>,
    log: RwLock<InteractionLog>,
}

impl QdrantKnowledgeStore {
    /// Connect and make sure the collection exists with the embedder's
    /// dimension
    pub async fn connect(url: &str, collection: &str, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let client = QdrantClient::from_url(url)
            .build()
            .context("Failed to create Qdrant client")?;

        let store = Self {
            client,
            collection: collection.to_string(),
            embedder,
            log: RwLock::new(InteractionLog::new()),
        };
        store.ensure_collection().await?;

        tracing::info!(url, collection, "connected to qdrant");
        Ok(store)
    }

    async fn ensure_collection(&self) -> Result<()> {
        let collections = self
            .client
            .list_collections()
            .await
            .context("Failed to list collections")?;
        if collections.collections.iter().any(|c| c.name == self.collection) {
            return Ok(());
        }

        self.client
            .create_collection(&CreateCollection {
                collection_name: self.collection.clone(),
                vectors_config: Some(VectorsConfig {
                    config: Some(Config::Params(VectorParams {
                        size: self.embedder.dimension() as u64,
                        distance: Distance::Cosine.into(),
                        ..Default::default()
                    })),
                }),
                ..Default::default()
            })
            .await
            .with_context(|| format!("Failed to create collection: {}", self.collection))?;
        Ok(())
    }
}

fn record_payload(record: &KnowledgeRecord) -> HashMap<String, QdrantValue> {
    let mut payload = HashMap::new();
    payload.insert("document".to_string(), QdrantValue::from(record.content.clone()));
    payload.insert("topic".to_string(), QdrantValue::from(record.topic.clone()));
    payload.insert("source".to_string(), QdrantValue::from(record.source.clone()));
    payload.insert("task_id".to_string(), QdrantValue::from(record.task_id.to_string()));
    payload.insert("timestamp".to_string(), QdrantValue::from(record.timestamp.to_rfc3339()));
    payload
}

fn payload_string(payload: &HashMap<String, QdrantValue>, key: &str) -> Result<String> {
    use qdrant_client::qdrant::value::Kind;
    match payload.get(key).and_then(|v| v.kind.as_ref()) {
        Some(Kind::StringValue(s)) => Ok(s.clone()),
        _ => Err(AgentError::StoreError(format!("point payload missing '{}'", key))),
    }
}

fn point_uuid(point_id: &Option<qdrant_client::qdrant::PointId>) -> Result<Uuid> {
    use qdrant_client::qdrant::point_id::PointIdOptions;
    match point_id.as_ref().and_then(|id| id.point_id_options.as_ref()) {
        Some(PointIdOptions::Uuid(u)) => {
            Uuid::parse_str(u).map_err(|e| AgentError::StoreError(format!("bad point id: {}", e)))
        }
        _ => Err(AgentError::StoreError("point has no uuid id".to_string())),
    }
}

fn record_from_payload(id: Uuid, payload: &HashMap<String, QdrantValue>) -> Result<KnowledgeRecord> {
    let task_id = Uuid::parse_str(&payload_string(payload, "task_id")?)
        .map_err(|e| AgentError::StoreError(format!("bad task_id: {}", e)))?;
    let timestamp = DateTime::parse_from_rfc3339(&payload_string(payload, "timestamp")?)
        .map_err(|e| AgentError::StoreError(format!("bad timestamp: {}", e)))?
        .with_timezone(&Utc);

    Ok(KnowledgeRecord {
        id,
        content: payload_string(payload, "document")?,
        topic: payload_string(payload, "topic")?,
        source: payload_string(payload, "source")?,
        task_id,
        timestamp,
    })
}

#[async_trait]
impl KnowledgeStore for QdrantKnowledgeStore {
    async fn add_knowledge(
        &self,
        content: &str,
        topic: &str,
        source: &str,
        task_id: Uuid,
    ) -> Result<KnowledgeRecord> {
        let record = KnowledgeRecord::new(content, topic, source, task_id);
        let embedding = self.embedder.embed_document(content)?;
        let point = PointStruct::new(record.id.to_string(), embedding, record_payload(&record));

        self.client
            .upsert_points_blocking(&self.collection, None, vec![point], None)
            .await
            .context("Failed to upsert point")?;

        tracing::debug!(id = %record.id, topic = %record.topic, "knowledge added");
        Ok(record)
    }

    async fn search_knowledge(&self, query: &str, n_results: usize) -> Result<Vec<KnowledgeHit>> {
        if n_results == 0 {
            return Ok(Vec::new());
        }

        let vector = self.embedder.embed_query(query)?;
        let response = self
            .client
            .search_points(&SearchPoints {
                collection_name: self.collection.clone(),
                vector,
                limit: n_results as u64,
                with_payload: Some(WithPayloadSelector {
                    selector_options: Some(SelectorOptions::Enable(true)),
                }),
                ..Default::default()
            })
            .await
            .context("Failed to search points")?;

        // Qdrant reports cosine similarity; results are already ranked by it
        response
            .result
            .into_iter()
            .map(|point| {
                let id = point_uuid(&point.id)?;
                Ok(KnowledgeHit {
                    record: record_from_payload(id, &point.payload)?,
                    distance: (1.0 - point.score as f64).clamp(0.0, 2.0),
                })
            })
            .collect()
    }

    async fn add_conversation_turn(&self, role: Role, content: &str) -> Result<()> {
        self.log.write().await.push_turn(role, content);
        Ok(())
    }

    async fn conversation_history(&self) -> Result<Vec<ConversationTurn>> {
        Ok(self.log.read().await.history().to_vec())
    }

    async fn update_agent_state(
        &self,
        task_id: Uuid,
        agent_name: &str,
        status: AgentStatus,
        details: &str,
    ) -> Result<()> {
        self.log.write().await.push_state(task_id, agent_name, status, details);
        Ok(())
    }

    async fn agent_states(&self, task_id: Uuid) -> Result<Vec<AgentStateRecord>> {
        Ok(self.log.read().await.states(task_id))
    }

    async fn knowledge_count(&self) -> Result<usize> {
        let info = self
            .client
            .collection_info(&self.collection)
            .await
            .context("Failed to get collection info")?;
        Ok(info.result.and_then(|r| r.points_count).unwrap_or(0) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::embedding::HashingEmbedder;

    #[test]
    fn test_payload_round_trip() {
        let record = KnowledgeRecord::new("content", "topic", "synthesis", Uuid::new_v4());
        let payload = record_payload(&record);
        let parsed = record_from_payload(record.id, &payload).unwrap();
        assert_eq!(parsed.content, record.content);
        assert_eq!(parsed.task_id, record.task_id);
        assert_eq!(parsed.timestamp, record.timestamp);
    }

    #[test]
    fn test_missing_payload_field() {
        let payload = HashMap::new();
        assert!(record_from_payload(Uuid::new_v4(), &payload).is_err());
    }

    #[tokio::test]
    #[ignore] // requires a running Qdrant on localhost:6334
    async fn test_add_and_search() {
        let store = QdrantKnowledgeStore::connect(
            "http://localhost:6334",
            &format!("test_{}", Uuid::new_v4().simple()),
            Arc::new(HashingEmbedder::default()),
        )
        .await
        .unwrap();

        store
            .add_knowledge("Adam adapts the learning rate", "adam", "synthesis", Uuid::new_v4())
            .await
            .unwrap();
        let hits = store.search_knowledge("Adam adapts the learning rate", 1).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].distance < 1e-3);
    }
}
