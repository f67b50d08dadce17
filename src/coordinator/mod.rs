//! Query coordination
//!
//! The coordinator owns the per-query lifecycle; the state machine makes
//! every phase change explicit and checkable.

pub mod state;
pub mod orchestrator;

pub use orchestrator::{Coordinator, CoordinatorConfig, APOLOGY, CACHE_PREFIX, NO_ANSWER, SYNTHESIS_SOURCE};
pub use state::{QueryEvent, QueryState};
