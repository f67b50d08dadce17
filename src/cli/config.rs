//! Configuration management for agentdesk
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.agentdesk/config.toml

use crate::coordinator::CoordinatorConfig;
use crate::errors::{AgentError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Complete configuration for agentdesk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub coordinator: CoordinatorSection,
    pub memory: MemorySection,
    pub embedding: EmbeddingSection,
    pub qdrant: QdrantSection,
    pub logging: LoggingSection,
}

/// Query pipeline behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorSection {
    pub cache_threshold: f64,
    pub step_timeout_secs: u64,
    pub track_agent_state: bool,
}

/// Knowledge store backend and matching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemorySection {
    pub match_distance: f64,
    pub backend: StoreBackend,
    /// JSON snapshot of the local store; empty disables it
    pub snapshot_path: String,
    pub persist: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Qdrant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSection {
    pub kind: EmbedderKind,
    /// Bucket count of the hashing embedder
    pub dimension: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderKind {
    Hashing,
    Nomic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QdrantSection {
    pub url: String,
    pub collection: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
}

impl Default for CoordinatorSection {
    fn default() -> Self {
        Self {
            cache_threshold: 0.85,
            step_timeout_secs: 30,
            track_agent_state: true,
        }
    }
}

impl Default for MemorySection {
    fn default() -> Self {
        Self {
            match_distance: 0.5,
            backend: StoreBackend::Memory,
            snapshot_path: "~/.agentdesk/knowledge.json".to_string(),
            persist: true,
        }
    }
}

impl Default for EmbeddingSection {
    fn default() -> Self {
        Self {
            kind: EmbedderKind::Hashing,
            dimension: crate::memory::embedding::hashing::DEFAULT_DIMENSION,
        }
    }
}

impl Default for QdrantSection {
    fn default() -> Self {
        Self {
            url: "http://localhost:6334".to_string(),
            collection: "knowledge_base".to_string(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(config_path) => Self::load_from_file(&config_path),
            None => Self::load_default(),
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AgentError::ConfigError(format!("Failed to read config {}: {}", path.display(), e)))?;

        Self::from_toml(&contents)
    }

    /// Parse and validate a TOML document
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)
            .map_err(|e| AgentError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load from the standard location, or built-in defaults when absent
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(config_path) if config_path.exists() => Self::load_from_file(&config_path),
            _ => Ok(Config::default()),
        }
    }

    /// ~/.agentdesk/config.toml
    pub fn default_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("config.toml"))
    }

    /// ~/.agentdesk
    pub fn state_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".agentdesk"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let threshold = self.coordinator.cache_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(AgentError::ConfigError(format!(
                "cache_threshold must be in (0, 1], got {}",
                threshold
            )));
        }

        if self.coordinator.step_timeout_secs == 0 {
            return Err(AgentError::ConfigError(
                "step_timeout_secs must be greater than 0".to_string(),
            ));
        }

        let distance = self.memory.match_distance;
        if !(distance > 0.0 && distance <= 1.0) {
            return Err(AgentError::ConfigError(format!(
                "match_distance must be in (0, 1], got {}",
                distance
            )));
        }

        if self.embedding.kind == EmbedderKind::Hashing && self.embedding.dimension == 0 {
            return Err(AgentError::ConfigError(
                "embedding dimension must be greater than 0".to_string(),
            ));
        }

        if self.memory.backend == StoreBackend::Qdrant && self.qdrant.collection.trim().is_empty() {
            return Err(AgentError::ConfigError(
                "qdrant collection name must not be empty".to_string(),
            ));
        }

        match self.logging.level.to_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            other => {
                return Err(AgentError::ConfigError(format!("Invalid log level: {}", other)));
            }
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| AgentError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AgentError::ConfigError(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| AgentError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Pretty TOML rendering of the effective configuration
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| AgentError::ConfigError(format!("Failed to serialize config: {}", e)))
    }

    /// Coordinator settings; `persist_override` of `false` turns write-back off
    pub fn coordinator_config(&self, persist_override: Option<bool>) -> CoordinatorConfig {
        CoordinatorConfig {
            cache_threshold: self.coordinator.cache_threshold,
            step_timeout: Duration::from_secs(self.coordinator.step_timeout_secs),
            track_agent_state: self.coordinator.track_agent_state,
            persist: persist_override.unwrap_or(self.memory.persist),
        }
    }

    /// Expanded snapshot path, `None` when disabled
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        let raw = self.memory.snapshot_path.trim();
        if raw.is_empty() {
            None
        } else {
            Some(Self::expand_path(raw))
        }
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }
}
