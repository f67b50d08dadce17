//! Core data types for the knowledge store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::System => "system",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A synthesized answer saved for reuse. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeRecord {
    pub id: Uuid,
    pub content: String,
    pub topic: String,
    pub source: String,
    pub task_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

impl KnowledgeRecord {
    /// New record with a fresh id, stamped now
    pub fn new(content: &str, topic: &str, source: &str, task_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.to_string(),
            topic: topic.to_string(),
            source: source.to_string(),
            task_id,
            timestamp: Utc::now(),
        }
    }
}

/// One ranked result of a knowledge search
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeHit {
    pub record: KnowledgeRecord,
    /// Smaller is more similar; 0.0 for identical text
    pub distance: f64,
}

impl KnowledgeHit {
    pub fn document(&self) -> &str {
        &self.record.content
    }
}

/// Entry of the append-only conversation log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(role: Role, content: &str) -> Self {
        Self {
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Outcome of one agent's work on a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Completed,
    Failed,
    Skipped,
}

/// Observational record of an agent's status for a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStateRecord {
    pub task_id: Uuid,
    pub agent_name: String,
    pub status: AgentStatus,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knowledge_record_gets_fresh_id() {
        let task_id = Uuid::new_v4();
        let a = KnowledgeRecord::new("content", "topic", "synthesis", task_id);
        let b = KnowledgeRecord::new("content", "topic", "synthesis", task_id);
        assert_ne!(a.id, b.id);
        assert_eq!(a.task_id, b.task_id);
    }

    #[test]
    fn test_timestamps_serialize_as_iso8601_utc() {
        let turn = ConversationTurn::new(Role::User, "hello");
        let json = serde_json::to_value(&turn).unwrap();
        let ts = json["timestamp"].as_str().unwrap();
        assert!(ts.ends_with('Z'), "expected UTC timestamp, got {}", ts);
        assert_eq!(json["role"], "user");
    }
}
