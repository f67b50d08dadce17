//! agentdesk - keyword-planned multi-agent assistant
//!
//! A coordinator answers each query by first consulting saved knowledge,
//! then planning a short sequence of agent steps from keywords, running the
//! steps in order, and saving the final answer for reuse.
//!
//! # Architecture
//!
//! - `planning`: query → ordered `PlanStep`s
//! - `agents`: research, analysis and memory workers behind one `Agent` trait
//! - `coordinator`: per-query state machine and control loop
//! - `memory`: knowledge store, embeddings and interaction logs
//! - `cli`, `repl`, `bootstrap`, `telemetry`: process entry and ambient plumbing

pub mod errors;
pub mod types;
pub mod memory;
pub mod planning;
pub mod agents;
pub mod coordinator;

// Re-export commonly used types
pub use errors::{AgentError, Result};
pub use coordinator::{Coordinator, CoordinatorConfig};

// Entry point and ambient plumbing
pub mod telemetry;
pub mod bootstrap;
pub mod cli;
pub mod repl;
