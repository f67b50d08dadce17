//! Command-line argument parsing for agentdesk
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// agentdesk - answer questions with a team of cooperating agents
#[derive(Parser, Debug)]
#[command(name = "agentdesk")]
#[command(author = "Jerome (Kubashen) Naidoo")]
#[command(version)]
#[command(about = "Keyword-planned multi-agent assistant with a memory-backed answer cache", long_about = None)]
pub struct Args {
    /// Question to answer once, then exit
    #[arg(value_name = "QUERY")]
    pub query: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only print answers)
    #[arg(short, long)]
    pub quiet: bool,

    /// Do not write answers or conversation back to the store
    #[arg(long)]
    pub no_persist: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start interactive REPL mode (default)
    Start,

    /// Print the plan for a query as JSON without running it
    Plan {
        #[arg(value_name = "QUERY")]
        query: String,
    },

    /// Print the saved conversation log
    History {
        /// Only the last N turns
        #[arg(short = 'n', long)]
        last: Option<usize>,
    },

    /// Display current configuration
    Config,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Reject a one-shot query combined with a subcommand
    pub fn validate(&self) -> Result<(), String> {
        if self.command.is_some() && self.query.is_some() {
            return Err("Cannot specify a query with a subcommand.".to_string());
        }
        Ok(())
    }

    /// `Some(false)` when `--no-persist` was given, otherwise defer to config
    pub fn persist_override(&self) -> Option<bool> {
        if self.no_persist {
            Some(false)
        } else {
            None
        }
    }
}

impl Verbosity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }

    /// Check if should show the thinking spinner
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }

    /// Check if should show detailed events
    pub fn show_events(&self) -> bool {
        matches!(self, Verbosity::Verbose | Verbosity::VeryVerbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(parse(&["agentdesk", "-q"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["agentdesk"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["agentdesk", "-v"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["agentdesk", "-vv"]).verbosity(), Verbosity::VeryVerbose);
    }

    #[test]
    fn test_one_shot_query() {
        let args = parse(&["agentdesk", "What is the Adam optimizer?"]);
        assert_eq!(args.query.as_deref(), Some("What is the Adam optimizer?"));
        assert!(args.command.is_none());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_plan_subcommand() {
        let args = parse(&["agentdesk", "plan", "compare papers"]);
        assert_eq!(
            args.command,
            Some(Commands::Plan {
                query: "compare papers".to_string()
            })
        );
    }

    #[test]
    fn test_history_subcommand_with_limit() {
        let args = parse(&["agentdesk", "history", "-n", "4"]);
        assert_eq!(args.command, Some(Commands::History { last: Some(4) }));
    }

    #[test]
    fn test_no_persist_flag() {
        assert_eq!(parse(&["agentdesk", "--no-persist"]).persist_override(), Some(false));
        assert_eq!(parse(&["agentdesk"]).persist_override(), None);
    }

    #[test]
    fn test_validate_fail_both_query_and_command() {
        let args = Args {
            query: Some("test".to_string()),
            config: None,
            verbose: 0,
            quiet: false,
            no_persist: false,
            command: Some(Commands::Config),
        };
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_verbosity_methods() {
        assert!(!Verbosity::Quiet.show_progress());
        assert!(Verbosity::Normal.show_progress());
        assert!(!Verbosity::Normal.show_events());
        assert!(Verbosity::Verbose.show_events());
    }
}
