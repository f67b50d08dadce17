//! Type definitions module
//!
//! Core types shared by the planner, the worker agents and the coordinator.

pub mod agent;
pub mod task;
pub mod plan;

// Re-export commonly used types
pub use agent::{AgentKind, AgentResult};
pub use plan::{DataRef, PlanStep};
pub use task::Task;
