//! Memory agent: adapter between tasks and the knowledge store
//!
//! Store faults never leave this agent. They are logged and reported as a
//! zero-confidence result so the query can still complete.

use crate::agents::{Agent, UNKNOWN_TASK_CONFIDENCE};
use crate::errors::Result;
use crate::memory::{KnowledgeStore, Role};
use crate::types::{AgentKind, AgentResult, Task};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{Instrument, Span};

/// Hits at or beyond this distance are not considered a match
pub const DEFAULT_MATCH_DISTANCE: f64 = 0.5;

const RECALL_CONFIDENCE: f64 = 0.8;
const NO_RECALL_CONFIDENCE: f64 = 0.3;
const NO_RECALL: &str = "I don't recall that discussion.";

pub struct MemoryAgent {
    store: Arc<dyn KnowledgeStore>,
    match_distance: f64,
    span: Span,
}

impl MemoryAgent {
    pub fn new(store: Arc<dyn KnowledgeStore>) -> Self {
        Self {
            store,
            match_distance: DEFAULT_MATCH_DISTANCE,
            span: tracing::info_span!("agent", name = "memory"),
        }
    }

    pub fn with_match_distance(mut self, match_distance: f64) -> Self {
        self.match_distance = match_distance;
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// The store this agent writes through
    pub fn store(&self) -> &Arc<dyn KnowledgeStore> {
        &self.store
    }

    async fn run(&self, task: &Task) -> Result<AgentResult> {
        match task {
            Task::SaveKnowledge {
                content,
                topic,
                source,
                task_id,
            } => {
                let record = self.store.add_knowledge(content, topic, source, *task_id).await?;
                tracing::debug!(id = %record.id, "knowledge saved");
                Ok(AgentResult::new("Knowledge saved.", 1.0))
            }
            Task::SaveConversation { role, content } => {
                self.store.add_conversation_turn(*role, content).await?;
                Ok(AgentResult::new("Conversation turn saved.", 1.0))
            }
            Task::SearchKnowledge { query } => self.search_knowledge(query).await,
            Task::SearchConversation { query } => self.search_conversation(query).await,
            other => Ok(AgentResult::new(
                format!("Unknown task for MemoryAgent: {}", other.name()),
                UNKNOWN_TASK_CONFIDENCE,
            )),
        }
    }

    /// Only the nearest hit is considered
    async fn search_knowledge(&self, query: &str) -> Result<AgentResult> {
        let hits = self.store.search_knowledge(query, 1).await?;
        match hits.first() {
            Some(hit) if hit.distance < self.match_distance => {
                tracing::debug!(distance = hit.distance, "knowledge match");
                Ok(AgentResult::new(hit.document(), 1.0 - hit.distance))
            }
            _ => Ok(AgentResult::empty(0.0)),
        }
    }

    /// Most recent turn sharing at least one word with the query
    async fn search_conversation(&self, query: &str) -> Result<AgentResult> {
        let query_words = word_set(query);
        let history = self.store.conversation_history().await?;

        let found = history
            .iter()
            .rev()
            .find(|turn| !word_set(&turn.content).is_disjoint(&query_words));

        Ok(match found {
            Some(turn) => AgentResult::new(
                format!("We previously discussed: '{}'", turn.content),
                RECALL_CONFIDENCE,
            ),
            None => AgentResult::new(NO_RECALL, NO_RECALL_CONFIDENCE),
        })
    }

    /// Convenience wrapper used by the coordinator's persisting phase
    pub async fn save_conversation(&self, role: Role, content: &str) -> AgentResult {
        self.execute_task(&Task::SaveConversation {
            role,
            content: content.to_string(),
        })
        .await
    }
}

fn word_set(text: &str) -> HashSet<String> {
    text.to_lowercase().split_whitespace().map(str::to_string).collect()
}

#[async_trait]
impl Agent for MemoryAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Memory
    }

    fn name(&self) -> &'static str {
        "MemoryAgent"
    }

    async fn execute_task(&self, task: &Task) -> AgentResult {
        let span = self.span.clone();
        async move {
            tracing::info!(task = %task, "executing task");
            match self.run(task).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!(task = %task.name(), error = %e, "memory task failed");
                    AgentResult::new(format!("Failed to execute memory task '{}'.", task.name()), 0.0)
                }
            }
        }
        .instrument(span)
        .await
    }
}
