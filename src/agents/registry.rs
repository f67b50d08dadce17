//! Agent registry and the dispatch boundary

use crate::agents::Agent;
use crate::errors::{AgentError, Result};
use crate::types::{AgentKind, AgentResult, Task};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Maps each agent kind to the implementation serving it
#[derive(Default, Clone)]
pub struct AgentRegistry {
    agents: HashMap<AgentKind, Arc<dyn Agent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `agent` under its own kind, returning any agent it replaces
    pub fn register(&mut self, agent: Arc<dyn Agent>) -> Option<Arc<dyn Agent>> {
        self.agents.insert(agent.kind(), agent)
    }

    pub fn get(&self, kind: AgentKind) -> Option<&Arc<dyn Agent>> {
        self.agents.get(&kind)
    }

    /// Registered kinds, sorted
    pub fn kinds(&self) -> Vec<AgentKind> {
        let mut kinds: Vec<_> = self.agents.keys().copied().collect();
        kinds.sort();
        kinds
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Run `task` on the agent registered for `kind`, bounded by `deadline`.
    ///
    /// Errors:
    /// - `UnknownAgent` when nothing is registered for `kind`
    /// - `StepTimeout` when the agent does not finish in time
    /// - `Generic` when the agent panics
    pub async fn dispatch(&self, kind: AgentKind, task: Task, deadline: Duration) -> Result<AgentResult> {
        let agent = self
            .agents
            .get(&kind)
            .cloned()
            .ok_or_else(|| AgentError::UnknownAgent(kind.to_string()))?;

        let task_name = task.name().to_string();
        let handle = tokio::spawn(async move { agent.execute_task(&task).await });
        let abort = handle.abort_handle();

        match tokio::time::timeout(deadline, handle).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(join_err)) => Err(AgentError::Generic(format!(
                "{} agent failed on {}: {}",
                kind, task_name, join_err
            ))),
            Err(_) => {
                abort.abort();
                Err(AgentError::StepTimeout {
                    agent: kind,
                    task: task_name,
                    timeout_ms: deadline.as_millis() as u64,
                })
            }
        }
    }
}

impl std::fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRegistry").field("kinds", &self.kinds()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{AnalysisAgent, ResearchAgent};
    use async_trait::async_trait;

    struct SlowAgent;

    #[async_trait]
    impl Agent for SlowAgent {
        fn kind(&self) -> AgentKind {
            AgentKind::Analysis
        }
        fn name(&self) -> &'static str {
            "SlowAgent"
        }
        async fn execute_task(&self, _task: &Task) -> AgentResult {
            tokio::time::sleep(Duration::from_secs(60)).await;
            AgentResult::new("too late", 1.0)
        }
    }

    struct PanickingAgent;

    #[async_trait]
    impl Agent for PanickingAgent {
        fn kind(&self) -> AgentKind {
            AgentKind::Research
        }
        fn name(&self) -> &'static str {
            "PanickingAgent"
        }
        async fn execute_task(&self, _task: &Task) -> AgentResult {
            panic!("agent bug")
        }
    }

    fn find(topic: &str) -> Task {
        Task::FindInformation { topic: topic.into() }
    }

    #[tokio::test]
    async fn test_dispatch_to_registered_agent() {
        let mut registry = AgentRegistry::new();
        registry.register(Arc::new(ResearchAgent::new()));

        let result = registry
            .dispatch(AgentKind::Research, find("gradient descent"), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(result.confidence, 0.9);
    }

    #[tokio::test]
    async fn test_unregistered_kind_is_unknown_agent() {
        let mut registry = AgentRegistry::new();
        registry.register(Arc::new(ResearchAgent::new()));

        let err = registry
            .dispatch(AgentKind::Analysis, Task::AnalyzeData { data: None }, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::UnknownAgent(name) if name == "analysis"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_exceeded_is_step_timeout() {
        let mut registry = AgentRegistry::new();
        registry.register(Arc::new(SlowAgent));

        let err = registry
            .dispatch(AgentKind::Analysis, Task::AnalyzeData { data: None }, Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AgentError::StepTimeout { agent: AgentKind::Analysis, timeout_ms: 50, .. }
        ));
    }

    #[tokio::test]
    async fn test_panicking_agent_is_a_fault() {
        let mut registry = AgentRegistry::new();
        registry.register(Arc::new(PanickingAgent));

        let err = registry
            .dispatch(AgentKind::Research, find("x"), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Generic(_)));
    }

    #[test]
    fn test_register_replaces_same_kind() {
        let mut registry = AgentRegistry::new();
        assert!(registry.register(Arc::new(AnalysisAgent::new())).is_none());
        assert!(registry.register(Arc::new(AnalysisAgent::new())).is_some());
        assert_eq!(registry.kinds(), vec![AgentKind::Analysis]);
        assert_eq!(registry.len(), 1);
    }
}
