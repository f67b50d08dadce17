//! Worker agents
//!
//! Every agent exposes the same capability, `execute_task`, and reports
//! failure to satisfy a task as a low-confidence `AgentResult` rather than an
//! error. Fatal faults (no agent registered for a step, deadline exceeded,
//! agent panic) only arise at the registry's dispatch boundary.

pub mod research;
pub mod analysis;
pub mod memory;
pub mod registry;

use crate::types::{AgentKind, AgentResult, Task};
use async_trait::async_trait;

pub use analysis::AnalysisAgent;
pub use memory::MemoryAgent;
pub use registry::AgentRegistry;
pub use research::ResearchAgent;

/// Confidence reported for a task the agent does not recognise
pub const UNKNOWN_TASK_CONFIDENCE: f64 = 0.1;

#[async_trait]
pub trait Agent: Send + Sync {
    /// Which plan-step agent this implementation serves
    fn kind(&self) -> AgentKind;

    /// Human-readable agent name used in messages and logs
    fn name(&self) -> &'static str;

    /// Run a task. Never fails; misses are low-confidence results.
    async fn execute_task(&self, task: &Task) -> AgentResult;
}
