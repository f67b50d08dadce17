//! Error types for agentdesk
//!
//! Fatal faults raised at the agent dispatch boundary, plus the ambient
//! configuration, storage and I/O failures. Soft misses never travel through
//! this type; they are low-confidence `AgentResult`s.

use crate::types::AgentKind;
use thiserror::Error;

/// Main error type for the agentdesk pipeline
#[derive(Error, Debug)]
pub enum AgentError {
    /// A plan step targeted an agent that is not registered with the coordinator
    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    /// A step did not complete within its deadline
    #[error("Step {agent}/{task} timed out after {timeout_ms}ms")]
    StepTimeout {
        agent: AgentKind,
        task: String,
        timeout_ms: u64,
    },

    /// Query state machine transition errors
    #[error("Invalid state transition from {from} via {event}: {reason}")]
    InvalidTransition {
        from: String,
        event: String,
        reason: String,
    },

    /// Knowledge store errors
    #[error("Knowledge store error: {0}")]
    StoreError(String),

    /// Embedding errors
    #[error("Embedding error: {0}")]
    EmbeddingError(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic errors with context
    #[error("Agent error: {0}")]
    Generic(String),
}

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Convert anyhow errors to AgentError
impl From<anyhow::Error> for AgentError {
    fn from(err: anyhow::Error) -> Self {
        AgentError::Generic(format!("{:#}", err))
    }
}
