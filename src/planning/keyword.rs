//! Rule-based keyword planner
//!
//! Rules, in order:
//! 1. Recall keywords return a single conversation search and stop
//! 2. Research keywords add a lookup step
//! 3. Analysis keywords add an analysis step chained after a lookup
//!    (adding the lookup first if rule 2 did not)
//! 4. Anything else falls back to a lookup
//!
//! Matching is on the lowercased query; steps carry the original casing.

use crate::planning::Planner;
use crate::types::{AgentKind, PlanStep, Task};

/// Phrases signalling the user wants an earlier exchange recalled
pub const RECALL_KEYWORDS: [&str; 4] = ["remember", "previously", "earlier", "recall"];

/// Phrases signalling an information lookup
pub const RESEARCH_KEYWORDS: [&str; 4] = ["find", "research", "what are", "who is"];

/// Phrases signalling the looked-up text should be analyzed
pub const ANALYSIS_KEYWORDS: [&str; 5] = ["analyze", "compare", "summarize", "trade-offs", "efficiency"];

/// Default planner
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordPlanner;

impl KeywordPlanner {
    pub fn new() -> Self {
        Self
    }

    fn research_step(query: &str) -> PlanStep {
        PlanStep::new(
            AgentKind::Research,
            Task::FindInformation {
                topic: query.to_string(),
            },
        )
    }
}

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| haystack.contains(k))
}

impl Planner for KeywordPlanner {
    fn create_plan(&self, query: &str) -> Vec<PlanStep> {
        let lowered = query.to_lowercase();

        if contains_any(&lowered, &RECALL_KEYWORDS) {
            return vec![PlanStep::new(
                AgentKind::Memory,
                Task::SearchConversation {
                    query: query.to_string(),
                },
            )];
        }

        let mut plan = Vec::with_capacity(2);

        if contains_any(&lowered, &RESEARCH_KEYWORDS) {
            plan.push(Self::research_step(query));
        }

        if contains_any(&lowered, &ANALYSIS_KEYWORDS) {
            if plan.is_empty() {
                plan.push(Self::research_step(query));
            }
            plan.push(PlanStep::chained(AgentKind::Analysis, Task::AnalyzeData { data: None }));
        }

        if plan.is_empty() {
            plan.push(Self::research_step(query));
        }

        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(query: &str) -> Vec<PlanStep> {
        KeywordPlanner::new().create_plan(query)
    }

    #[test]
    fn test_recall_short_circuits() {
        let steps = plan("Do you remember what we said about transformers? Analyze and compare.");
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].agent, AgentKind::Memory);
        assert_eq!(
            steps[0].task,
            Task::SearchConversation {
                query: "Do you remember what we said about transformers? Analyze and compare.".to_string()
            }
        );
    }

    #[test]
    fn test_recall_is_case_insensitive() {
        let steps = plan("PREVIOUSLY you told me something");
        assert_eq!(steps[0].task.name(), "search_conversation");
    }

    #[test]
    fn test_research_only() {
        let steps = plan("Who is Geoffrey Hinton?");
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].agent, AgentKind::Research);
        assert_eq!(
            steps[0].task,
            Task::FindInformation {
                topic: "Who is Geoffrey Hinton?".to_string()
            }
        );
        assert!(!steps[0].needs_previous_output());
    }

    #[test]
    fn test_research_then_analysis() {
        let steps = plan("Find and compare reinforcement learning papers");
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].task.name(), "find_information");
        assert_eq!(steps[1].agent, AgentKind::Analysis);
        assert_eq!(steps[1].task.name(), "analyze_data");
        assert!(steps[1].needs_previous_output());
    }

    #[test]
    fn test_analysis_adds_missing_research_step() {
        let steps = plan("Analyze the trade-offs of transformer architectures");
        assert_eq!(steps.len(), 2);
        assert_eq!(
            steps[0].task,
            Task::FindInformation {
                topic: "Analyze the trade-offs of transformer architectures".to_string()
            }
        );
        assert!(steps[1].needs_previous_output());
    }

    #[test]
    fn test_fallback_is_research() {
        let steps = plan("What is the Adam optimizer?");
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].agent, AgentKind::Research);
        assert_eq!(
            steps[0].task,
            Task::FindInformation {
                topic: "What is the Adam optimizer?".to_string()
            }
        );
    }

    #[test]
    fn test_empty_query_falls_back() {
        let steps = plan("");
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].agent, AgentKind::Research);
    }

    #[test]
    fn test_deterministic() {
        let q = "Research and summarize gradient descent efficiency";
        assert_eq!(plan(q), plan(q));
    }
}
