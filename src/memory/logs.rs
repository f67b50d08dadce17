//! Append-only conversation and agent-state logs
//!
//! Shared by every store backend; the vector collection differs per backend
//! but these two logs are always kept in process.

use crate::memory::types::{AgentStateRecord, AgentStatus, ConversationTurn, Role};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InteractionLog {
    #[serde(default)]
    conversation: Vec<ConversationTurn>,
    #[serde(default)]
    agent_states: HashMap<Uuid, Vec<AgentStateRecord>>,
}

impl InteractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_turn(&mut self, role: Role, content: &str) {
        self.conversation.push(ConversationTurn::new(role, content));
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.conversation
    }

    pub fn push_state(&mut self, task_id: Uuid, agent_name: &str, status: AgentStatus, details: &str) {
        self.agent_states
            .entry(task_id)
            .or_insert_with(Vec::new)
            .push(AgentStateRecord {
                task_id,
                agent_name: agent_name.to_string(),
                status,
                details: details.to_string(),
                timestamp: Utc::now(),
            });
    }

    pub fn states(&self, task_id: Uuid) -> Vec<AgentStateRecord> {
        self.agent_states.get(&task_id).cloned().unwrap_or_default()
    }

    pub fn task_count(&self) -> usize {
        self.agent_states.len()
    }
}
