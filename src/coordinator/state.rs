//! Query lifecycle state machine
//!
//! Every query runs through the same deterministic machine:
//! - Cache hit: Idle → CacheCheck → Done
//! - Full run: Idle → CacheCheck → Planning → Executing(0..n) → Synthesizing
//!   → Persisting → Done
//! - Step failure: Executing(i) → Aborted
//! - Fault (store or runtime error): any in-flight state → Aborted
//!
//! `Done` and `Aborted` accept the next query, so one coordinator serves a
//! whole session.

use crate::errors::{AgentError, Result};
use serde::{Deserialize, Serialize};

/// Query processing states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryState {
    /// No query processed yet
    Idle,

    /// Looking the query up in saved knowledge
    CacheCheck,

    /// Building the step list
    Planning,

    /// Running step `step` of `total`
    Executing { step: usize, total: usize },

    /// Choosing the final answer
    Synthesizing,

    /// Writing answer and conversation back to the store
    Persisting,

    /// Answer returned (terminal for this query)
    Done,

    /// A step fault ended the query (terminal for this query)
    Aborted,
}

/// Events that drive transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryEvent {
    /// A query arrived and starts at the cache check
    QueryReceived,

    /// A prepared plan arrived and skips the cache check
    PlanSupplied,

    CacheHit,
    CacheMiss,

    /// Plan built with this many steps
    PlanReady { steps: usize },

    StepSucceeded,
    StepFailed,

    AnswerReady,
    Persisted,

    /// Unrecoverable fault, valid from any in-flight state
    Fault,
}

impl QueryState {
    /// Check if the current query has finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, QueryState::Done | QueryState::Aborted)
    }

    /// Whether a new query may start from this state
    pub fn accepts_query(&self) -> bool {
        matches!(self, QueryState::Idle | QueryState::Done | QueryState::Aborted)
    }

    /// Attempt a transition
    ///
    /// Valid transitions:
    /// 1. Idle | Done | Aborted → CacheCheck   (QueryReceived)
    /// 2. Idle | Done | Aborted → Planning     (PlanSupplied)
    /// 3. CacheCheck → Done                    (CacheHit)
    /// 4. CacheCheck → Planning                (CacheMiss)
    /// 5. Planning → Executing{0, n}           (PlanReady, n > 0)
    /// 6. Planning → Synthesizing              (PlanReady, n = 0)
    /// 7. Executing{i, n} → Executing{i+1, n}  (StepSucceeded, i+1 < n)
    /// 8. Executing{n-1, n} → Synthesizing     (StepSucceeded)
    /// 9. Executing → Aborted                  (StepFailed)
    /// 10. Synthesizing → Persisting           (AnswerReady)
    /// 11. Persisting → Done                   (Persisted)
    /// 12. any in-flight state → Aborted       (Fault)
    pub fn transition(&self, event: QueryEvent) -> Result<QueryState> {
        use QueryEvent::*;
        use QueryState::*;

        if event == Fault && !self.accepts_query() {
            return Ok(Aborted);
        }

        let next = match (*self, event) {
            (Idle | Done | Aborted, QueryReceived) => CacheCheck,
            (Idle | Done | Aborted, PlanSupplied) => Planning,

            (CacheCheck, CacheHit) => Done,
            (CacheCheck, CacheMiss) => Planning,

            (Planning, PlanReady { steps: 0 }) => Synthesizing,
            (Planning, PlanReady { steps }) => Executing { step: 0, total: steps },

            (Executing { step, total }, StepSucceeded) if step + 1 < total => Executing {
                step: step + 1,
                total,
            },
            (Executing { .. }, StepSucceeded) => Synthesizing,
            (Executing { .. }, StepFailed) => Aborted,

            (Synthesizing, AnswerReady) => Persisting,
            (Persisting, Persisted) => Done,

            (from, event) => {
                return Err(AgentError::InvalidTransition {
                    from: from.display_name().to_string(),
                    event: format!("{:?}", event),
                    reason: format!("No valid transition from {:?} on {:?}", from, event),
                });
            }
        };

        Ok(next)
    }

    /// Human-readable state name
    pub fn display_name(&self) -> &'static str {
        match self {
            QueryState::Idle => "Idle",
            QueryState::CacheCheck => "Checking memory",
            QueryState::Planning => "Planning",
            QueryState::Executing { .. } => "Executing steps",
            QueryState::Synthesizing => "Synthesizing",
            QueryState::Persisting => "Saving",
            QueryState::Done => "Completed",
            QueryState::Aborted => "Aborted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(mut state: QueryState, events: &[QueryEvent]) -> Result<QueryState> {
        for event in events {
            state = state.transition(*event)?;
        }
        Ok(state)
    }

    #[test]
    fn test_full_run() {
        use QueryEvent::*;
        let end = run(
            QueryState::Idle,
            &[
                QueryReceived,
                CacheMiss,
                PlanReady { steps: 2 },
                StepSucceeded,
                StepSucceeded,
                AnswerReady,
                Persisted,
            ],
        )
        .unwrap();
        assert_eq!(end, QueryState::Done);
    }

    #[test]
    fn test_executing_counts_steps() {
        let state = QueryState::Planning
            .transition(QueryEvent::PlanReady { steps: 2 })
            .unwrap();
        assert_eq!(state, QueryState::Executing { step: 0, total: 2 });

        let state = state.transition(QueryEvent::StepSucceeded).unwrap();
        assert_eq!(state, QueryState::Executing { step: 1, total: 2 });

        let state = state.transition(QueryEvent::StepSucceeded).unwrap();
        assert_eq!(state, QueryState::Synthesizing);
    }

    #[test]
    fn test_cache_hit_finishes_immediately() {
        let end = run(QueryState::Idle, &[QueryEvent::QueryReceived, QueryEvent::CacheHit]).unwrap();
        assert_eq!(end, QueryState::Done);
    }

    #[test]
    fn test_step_failure_aborts() {
        let state = QueryState::Executing { step: 1, total: 3 };
        assert_eq!(state.transition(QueryEvent::StepFailed).unwrap(), QueryState::Aborted);
    }

    #[test]
    fn test_empty_plan_skips_execution() {
        let state = QueryState::Planning
            .transition(QueryEvent::PlanReady { steps: 0 })
            .unwrap();
        assert_eq!(state, QueryState::Synthesizing);
    }

    #[test]
    fn test_terminal_states_accept_next_query() {
        for state in [QueryState::Done, QueryState::Aborted, QueryState::Idle] {
            assert!(state.accepts_query());
            assert_eq!(
                state.transition(QueryEvent::QueryReceived).unwrap(),
                QueryState::CacheCheck
            );
            assert_eq!(state.transition(QueryEvent::PlanSupplied).unwrap(), QueryState::Planning);
        }
        assert!(QueryState::Done.is_terminal());
        assert!(!QueryState::Persisting.is_terminal());
    }

    #[test]
    fn test_invalid_transitions() {
        // Cannot persist an aborted query
        let err = QueryState::Aborted.transition(QueryEvent::Persisted).unwrap_err();
        assert!(matches!(err, AgentError::InvalidTransition { .. }));

        // Cannot fail a step outside execution
        assert!(QueryState::Synthesizing.transition(QueryEvent::StepFailed).is_err());

        // A query in flight cannot be restarted
        assert!(QueryState::Planning.transition(QueryEvent::QueryReceived).is_err());
    }

    #[test]
    fn test_fault_from_any_in_flight_state() {
        for state in [
            QueryState::CacheCheck,
            QueryState::Planning,
            QueryState::Executing { step: 0, total: 1 },
            QueryState::Synthesizing,
            QueryState::Persisting,
        ] {
            assert_eq!(state.transition(QueryEvent::Fault).unwrap(), QueryState::Aborted);
        }
        assert!(QueryState::Done.transition(QueryEvent::Fault).is_err());
    }

    #[test]
    fn test_determinism() {
        let state = QueryState::CacheCheck;
        assert_eq!(
            state.transition(QueryEvent::CacheMiss).unwrap(),
            state.transition(QueryEvent::CacheMiss).unwrap()
        );
    }
}
