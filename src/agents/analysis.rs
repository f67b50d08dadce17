//! Analysis agent: first-sentence summary plus canned trade-off notes

use crate::agents::{Agent, UNKNOWN_TASK_CONFIDENCE};
use crate::types::{AgentKind, AgentResult, Task};
use async_trait::async_trait;
use tracing::Span;

const ANALYSIS_CONFIDENCE: f64 = 0.85;
const NO_DATA_CONFIDENCE: f64 = 0.1;
const NO_DATA: &str = "No data provided for analysis.";

/// (trigger substring, trade-off sentence), first trigger found wins
const TRADE_OFFS: [(&str, &str); 2] = [
    (
        "computational complexity",
        "Higher accuracy often comes with greater computational cost.",
    ),
    (
        "sample efficiency",
        "Methods with high sample efficiency may be less stable.",
    ),
];

pub struct AnalysisAgent {
    span: Span,
}

impl AnalysisAgent {
    pub fn new() -> Self {
        Self {
            span: tracing::info_span!("agent", name = "analysis"),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    fn analyze(&self, data: Option<&str>) -> AgentResult {
        let data = match data {
            Some(d) if !d.is_empty() => d,
            _ => return AgentResult::new(NO_DATA, NO_DATA_CONFIDENCE),
        };

        let mut content = format!("Analysis Summary: {}", summarize(data));
        if let Some(trade_off) = identify_trade_off(data) {
            content.push_str("\nKey Trade-offs Identified: ");
            content.push_str(trade_off);
        }
        AgentResult::new(content, ANALYSIS_CONFIDENCE)
    }
}

impl Default for AnalysisAgent {
    fn default() -> Self {
        Self::new()
    }
}

/// Text before the first period, trimmed, with the period put back
pub fn summarize(text: &str) -> String {
    let first = text.split('.').next().unwrap_or_default().trim();
    format!("{}.", first)
}

/// Canned trade-off sentence for the first trigger phrase present
pub fn identify_trade_off(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    TRADE_OFFS
        .iter()
        .find(|(trigger, _)| lowered.contains(trigger))
        .map(|(_, sentence)| *sentence)
}

#[async_trait]
impl Agent for AnalysisAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Analysis
    }

    fn name(&self) -> &'static str {
        "AnalysisAgent"
    }

    async fn execute_task(&self, task: &Task) -> AgentResult {
        self.span.in_scope(|| {
            tracing::info!(task = %task, "executing task");
            match task {
                Task::AnalyzeData { data } => self.analyze(data.as_deref()),
                _ => AgentResult::new("Unknown task for AnalysisAgent.", UNKNOWN_TASK_CONFIDENCE),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(data: Option<&str>) -> Task {
        Task::AnalyzeData {
            data: data.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_empty_data() {
        let agent = AnalysisAgent::new();
        let expected = AgentResult::new("No data provided for analysis.", 0.1);
        assert_eq!(agent.execute_task(&analyze(Some(""))).await, expected);
        assert_eq!(agent.execute_task(&analyze(None)).await, expected);
    }

    #[tokio::test]
    async fn test_summary_and_complexity_trade_off() {
        let agent = AnalysisAgent::new();
        let data = "Transformers rely on attention. Their computational complexity is O(n^2 * d).";
        let result = agent.execute_task(&analyze(Some(data))).await;
        assert_eq!(result.confidence, 0.85);
        assert_eq!(
            result.text(),
            Some("Analysis Summary: Transformers rely on attention.\nKey Trade-offs Identified: Higher accuracy often comes with greater computational cost.")
        );
    }

    #[tokio::test]
    async fn test_sample_efficiency_trade_off() {
        let agent = AnalysisAgent::new();
        let data = "Recent RL papers focus on Sample Efficiency and safety. More text.";
        let result = agent.execute_task(&analyze(Some(data))).await;
        assert!(result
            .text()
            .unwrap()
            .ends_with("Key Trade-offs Identified: Methods with high sample efficiency may be less stable."));
    }

    #[tokio::test]
    async fn test_no_trade_off_line_without_trigger() {
        let agent = AnalysisAgent::new();
        let result = agent.execute_task(&analyze(Some("Plain text without triggers"))).await;
        assert_eq!(result.text(), Some("Analysis Summary: Plain text without triggers."));
    }

    #[tokio::test]
    async fn test_unknown_task_is_soft() {
        let agent = AnalysisAgent::new();
        let result = agent
            .execute_task(&Task::FindInformation { topic: "x".into() })
            .await;
        assert_eq!(result, AgentResult::new("Unknown task for AnalysisAgent.", 0.1));
    }

    #[test]
    fn test_summarize_trims() {
        assert_eq!(summarize("  first sentence  . second."), "first sentence.");
        assert_eq!(summarize("no period"), "no period.");
    }

    #[test]
    fn test_complexity_checked_before_sample_efficiency() {
        let text = "sample efficiency and computational complexity";
        assert_eq!(
            identify_trade_off(text),
            Some("Higher accuracy often comes with greater computational cost.")
        );
    }
}
