//! Knowledge store capability
//!
//! The store exclusively owns every persisted record: the knowledge
//! collection, the conversation log and the agent-state log. Implementations
//! must be safe to share between tasks; concurrent appends may not corrupt
//! the logs or the collection.

use crate::errors::Result;
use crate::memory::types::{AgentStateRecord, AgentStatus, ConversationTurn, KnowledgeHit, KnowledgeRecord, Role};
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Add a document to the knowledge collection. Assigns id and timestamp.
    async fn add_knowledge(
        &self,
        content: &str,
        topic: &str,
        source: &str,
        task_id: Uuid,
    ) -> Result<KnowledgeRecord>;

    /// Nearest documents to `query`, ascending by distance. Empty when the
    /// collection is empty.
    async fn search_knowledge(&self, query: &str, n_results: usize) -> Result<Vec<KnowledgeHit>>;

    /// Append a timestamped conversation turn
    async fn add_conversation_turn(&self, role: Role, content: &str) -> Result<()>;

    /// Full conversation log, oldest first
    async fn conversation_history(&self) -> Result<Vec<ConversationTurn>>;

    /// Append an agent status entry under `task_id`
    async fn update_agent_state(
        &self,
        task_id: Uuid,
        agent_name: &str,
        status: AgentStatus,
        details: &str,
    ) -> Result<()>;

    /// Agent status entries recorded for `task_id`, in insertion order
    async fn agent_states(&self, task_id: Uuid) -> Result<Vec<AgentStateRecord>>;

    /// Number of documents in the knowledge collection
    async fn knowledge_count(&self) -> Result<usize>;
}
