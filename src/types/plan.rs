//! Plan steps and output chaining

use crate::types::{AgentKind, Task};
use serde::{Deserialize, Serialize};

/// Where a step's data slot is filled from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataRef {
    /// Content of the step that ran immediately before
    #[serde(rename = "last_output")]
    PreviousOutput,
}

/// One step of a plan: which agent runs which task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    pub agent: AgentKind,
    #[serde(flatten)]
    pub task: Task,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "data_key")]
    pub data_from: Option<DataRef>,
}

impl PlanStep {
    /// Step with fully specified inputs
    pub fn new(agent: AgentKind, task: Task) -> Self {
        Self {
            agent,
            task,
            data_from: None,
        }
    }

    /// Step whose data slot takes the previous step's output
    pub fn chained(agent: AgentKind, task: Task) -> Self {
        Self {
            agent,
            task,
            data_from: Some(DataRef::PreviousOutput),
        }
    }

    pub fn needs_previous_output(&self) -> bool {
        self.data_from == Some(DataRef::PreviousOutput)
    }

    /// Key under which the step's result is recorded in the query context
    pub fn context_key(&self) -> String {
        format!("{}_{}_result", self.agent, self.task.name())
    }

    /// Consume the step, substituting `last_output` into the data slot if the
    /// step is chained. The placeholder cannot survive this call.
    pub fn resolve(self, last_output: Option<&str>) -> (AgentKind, Task) {
        let task = match self.data_from {
            Some(DataRef::PreviousOutput) => self.task.with_data(last_output.map(str::to_string)),
            None => self.task,
        };
        (self.agent, task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_key() {
        let step = PlanStep::new(AgentKind::Research, Task::FindInformation { topic: "x".into() });
        assert_eq!(step.context_key(), "research_find_information_result");
    }

    #[test]
    fn test_resolve_substitutes_previous_output() {
        let step = PlanStep::chained(AgentKind::Analysis, Task::AnalyzeData { data: None });
        assert!(step.needs_previous_output());

        let (agent, task) = step.resolve(Some("Research text."));
        assert_eq!(agent, AgentKind::Analysis);
        assert_eq!(task, Task::AnalyzeData { data: Some("Research text.".into()) });
    }

    #[test]
    fn test_resolve_with_no_previous_output_leaves_data_empty() {
        let step = PlanStep::chained(AgentKind::Analysis, Task::AnalyzeData { data: Some("stale".into()) });
        let (_, task) = step.resolve(None);
        assert_eq!(task, Task::AnalyzeData { data: None });
    }

    #[test]
    fn test_unchained_step_keeps_its_data() {
        let step = PlanStep::new(AgentKind::Analysis, Task::AnalyzeData { data: Some("given".into()) });
        let (_, task) = step.resolve(Some("previous"));
        assert_eq!(task, Task::AnalyzeData { data: Some("given".into()) });
    }

    #[test]
    fn test_chained_step_serializes_placeholder() {
        let step = PlanStep::chained(AgentKind::Analysis, Task::AnalyzeData { data: None });
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["agent"], "analysis");
        assert_eq!(json["task"], "analyze_data");
        assert_eq!(json["data_key"], "last_output");
    }
}
