//! Typed task inputs
//!
//! Each variant carries exactly the arguments its task needs. Tasks serialize
//! with their wire names (`find_information`, `analyze_data`, ...) so plans
//! print the same way the step list is described to users.

use crate::memory::types::Role;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A unit of work addressed to one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "task", rename_all = "snake_case")]
pub enum Task {
    /// Look a topic up in the research knowledge base
    FindInformation { topic: String },

    /// Summarize text and note trade-offs; `data` is filled from the previous
    /// step's output when the step is chained
    AnalyzeData {
        #[serde(default)]
        data: Option<String>,
    },

    /// Persist a synthesized answer
    SaveKnowledge {
        content: String,
        topic: String,
        source: String,
        task_id: Uuid,
    },

    /// Append a turn to the conversation log
    SaveConversation { role: Role, content: String },

    /// Nearest-neighbour lookup over saved knowledge
    SearchKnowledge { query: String },

    /// Recall an earlier conversation turn
    SearchConversation { query: String },

    /// A task name no agent recognises
    Other { name: String },
}

impl Task {
    /// Wire name of the task
    pub fn name(&self) -> &str {
        match self {
            Task::FindInformation { .. } => "find_information",
            Task::AnalyzeData { .. } => "analyze_data",
            Task::SaveKnowledge { .. } => "save_knowledge",
            Task::SaveConversation { .. } => "save_conversation",
            Task::SearchKnowledge { .. } => "search_knowledge",
            Task::SearchConversation { .. } => "search_conversation",
            Task::Other { name } => name,
        }
    }

    /// Fill the task's data slot. Tasks without one are returned unchanged.
    pub fn with_data(self, data: Option<String>) -> Task {
        match self {
            Task::AnalyzeData { .. } => Task::AnalyzeData { data },
            other => other,
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_names() {
        assert_eq!(Task::FindInformation { topic: "x".into() }.name(), "find_information");
        assert_eq!(Task::AnalyzeData { data: None }.name(), "analyze_data");
        assert_eq!(Task::SearchConversation { query: "x".into() }.name(), "search_conversation");
        assert_eq!(Task::Other { name: "translate".into() }.name(), "translate");
    }

    #[test]
    fn test_with_data_only_touches_analyze() {
        let task = Task::AnalyzeData { data: None }.with_data(Some("text".into()));
        assert_eq!(task, Task::AnalyzeData { data: Some("text".into()) });

        let research = Task::FindInformation { topic: "adam".into() };
        assert_eq!(research.clone().with_data(Some("ignored".into())), research);
    }

    #[test]
    fn test_task_serializes_with_tag() {
        let json = serde_json::to_value(Task::FindInformation { topic: "Who is Ada?".into() }).unwrap();
        assert_eq!(json["task"], "find_information");
        assert_eq!(json["topic"], "Who is Ada?");
    }

    #[test]
    fn test_analyze_data_deserializes_without_data() {
        let task: Task = serde_json::from_str(r#"{"task":"analyze_data"}"#).unwrap();
        assert_eq!(task, Task::AnalyzeData { data: None });
    }
}
