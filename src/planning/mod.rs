//! Query planning
//!
//! A planner maps a raw query to the ordered steps the coordinator runs.
//! Planning is pure: no I/O, and identical text yields an identical plan.

pub mod keyword;

use crate::types::PlanStep;

pub use keyword::KeywordPlanner;

/// Produces an ordered, sequentially executed step list for a query
pub trait Planner: Send + Sync {
    fn create_plan(&self, query: &str) -> Vec<PlanStep>;
}
