//! Agent identity and agent output

use crate::errors::AgentError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of worker agents a plan step can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Research,
    Analysis,
    Memory,
}

impl AgentKind {
    /// All agent kinds, in registration order
    pub const ALL: [AgentKind; 3] = [AgentKind::Research, AgentKind::Analysis, AgentKind::Memory];

    /// Name used in plans, logs and context keys
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::Research => "research",
            AgentKind::Analysis => "analysis",
            AgentKind::Memory => "memory",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "research" => Ok(AgentKind::Research),
            "analysis" => Ok(AgentKind::Analysis),
            "memory" => Ok(AgentKind::Memory),
            other => Err(AgentError::UnknownAgent(other.to_string())),
        }
    }
}

/// Output of a single agent invocation
///
/// `confidence` is self-reported by the agent and lies in `[0, 1]`. It is a
/// heuristic, not a calibrated probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResult {
    pub content: Option<String>,
    pub confidence: f64,
}

impl AgentResult {
    /// Result carrying text content
    pub fn new(content: impl Into<String>, confidence: f64) -> Self {
        Self {
            content: Some(content.into()),
            confidence,
        }
    }

    /// Result with no content (e.g. a knowledge search miss)
    pub fn empty(confidence: f64) -> Self {
        Self {
            content: None,
            confidence,
        }
    }

    /// Content as a string slice, if any
    pub fn text(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_kind_round_trips_through_str() {
        for kind in AgentKind::ALL {
            assert_eq!(kind.as_str().parse::<AgentKind>().unwrap(), kind);
        }
        assert_eq!(" Research ".parse::<AgentKind>().unwrap(), AgentKind::Research);
    }

    #[test]
    fn test_unknown_agent_name_is_rejected() {
        let err = "web_browser".parse::<AgentKind>().unwrap_err();
        assert!(matches!(err, AgentError::UnknownAgent(name) if name == "web_browser"));
    }

    #[test]
    fn test_agent_kind_serializes_lowercase() {
        let json = serde_json::to_string(&AgentKind::Analysis).unwrap();
        assert_eq!(json, "\"analysis\"");
    }

    #[test]
    fn test_empty_result_has_no_text() {
        let result = AgentResult::empty(0.0);
        assert!(result.text().is_none());
        assert_eq!(AgentResult::new("hi", 0.5).text(), Some("hi"));
    }
}
