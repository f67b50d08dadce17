//! Research agent: lookup in a fixed topic knowledge base

use crate::agents::{Agent, UNKNOWN_TASK_CONFIDENCE};
use crate::types::{AgentKind, AgentResult, Task};
use async_trait::async_trait;
use tracing::Span;

const HIT_CONFIDENCE: f64 = 0.9;
const MISS_CONFIDENCE: f64 = 0.2;
const NOT_FOUND: &str = "Information not found.";

/// Built-in topics, checked in this order
const DEFAULT_KNOWLEDGE_BASE: [(&str, &str); 6] = [
    (
        "neural networks",
        "The main types of neural networks are Feedforward, Recurrent (RNNs), and Convolutional (CNNs).",
    ),
    (
        "transformer architectures",
        "Transformers, introduced in 'Attention Is All You Need', rely on self-attention mechanisms, avoiding recurrence. Key components are multi-head attention and positional encodings. Their computational complexity is O(n^2 * d).",
    ),
    (
        "reinforcement learning papers",
        "Recent RL papers focus on sample efficiency and safety. Key methodologies include model-based RL, offline RL, and hierarchical RL. Common challenges are sparse rewards and sim-to-real transfer.",
    ),
    (
        "machine learning optimization",
        "Common optimization techniques include Gradient Descent, Stochastic Gradient Descent (SGD), Adam (Adaptive Moment Estimation), and RMSprop. Adam is often most effective as a default due to its adaptive learning rate.",
    ),
    (
        "gradient descent",
        "An optimization algorithm used to minimize a function by iteratively moving in the direction of steepest descent.",
    ),
    (
        "adam optimizer",
        "An adaptive learning rate optimization algorithm that's been designed specifically for training deep neural networks.",
    ),
];

pub struct ResearchAgent {
    /// (topic key, canned text); order decides which key wins
    knowledge_base: Vec<(String, String)>,
    span: Span,
}

impl ResearchAgent {
    pub fn new() -> Self {
        Self::with_knowledge_base(
            DEFAULT_KNOWLEDGE_BASE
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    /// Agent over a custom knowledge base. Keys are lowercased.
    pub fn with_knowledge_base(entries: Vec<(String, String)>) -> Self {
        Self {
            knowledge_base: entries
                .into_iter()
                .map(|(key, text)| (key.to_lowercase(), text))
                .collect(),
            span: tracing::info_span!("agent", name = "research"),
        }
    }

    /// Use `span` as the parent context for this agent's logs
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// First entry whose key words all occur (as substrings) in the topic
    pub fn lookup(&self, topic: &str) -> Option<&str> {
        let topic = topic.to_lowercase();
        self.knowledge_base
            .iter()
            .find(|(key, _)| key.split_whitespace().all(|word| topic.contains(word)))
            .map(|(_, text)| text.as_str())
    }

    fn find_information(&self, topic: &str) -> AgentResult {
        match self.lookup(topic) {
            Some(text) => AgentResult::new(text, HIT_CONFIDENCE),
            None => AgentResult::new(NOT_FOUND, MISS_CONFIDENCE),
        }
    }
}

impl Default for ResearchAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for ResearchAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Research
    }

    fn name(&self) -> &'static str {
        "ResearchAgent"
    }

    async fn execute_task(&self, task: &Task) -> AgentResult {
        self.span.in_scope(|| {
            tracing::info!(task = %task, "executing task");
            match task {
                Task::FindInformation { topic } => self.find_information(topic),
                _ => AgentResult::new("Unknown task for ResearchAgent.", UNKNOWN_TASK_CONFIDENCE),
            }
        })
    }
}
