//! CLI module for agentdesk
//!
//! Handles command-line argument parsing and configuration management.

pub mod config;
pub mod args;

pub use config::{Config, EmbedderKind, StoreBackend};
pub use args::{Args, Commands, Verbosity};
