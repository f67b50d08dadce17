//! Interactive session
//!
//! Reads lines, routes slash commands, and sends everything else verbatim to
//! the coordinator. `exit` in any casing ends the loop; empty lines re-prompt.

pub mod commands;
pub mod display;
pub mod input;

use anyhow::Result;
use std::path::PathBuf;

use crate::cli::Verbosity;
use crate::coordinator::Coordinator;
use crate::repl::commands::{Command, DEFAULT_HISTORY_LIMIT};
pub use crate::repl::display::DisplayManager;
use crate::repl::input::{InputHandler, ReadOutcome};
use crate::telemetry::{TelemetryCollector, TelemetryDisplay};

/// What a line of input asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplAction {
    /// Blank line; prompt again
    Skip,
    Exit,
    Command(Command),
    Query(String),
}

/// Classify one line of input. Queries keep the line exactly as typed;
/// trimming only applies to the blank, exit and slash-command checks.
pub fn classify(line: &str) -> ReplAction {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        ReplAction::Skip
    } else if commands::is_exit_word(trimmed) {
        ReplAction::Exit
    } else if commands::is_command(trimmed) {
        match commands::parse(trimmed) {
            Command::Exit => ReplAction::Exit,
            command => ReplAction::Command(command),
        }
    } else {
        ReplAction::Query(line.to_string())
    }
}

/// REPL history location: ~/.agentdesk/history
pub fn default_history_path() -> Option<PathBuf> {
    crate::cli::Config::state_dir().map(|dir| dir.join("history"))
}

pub struct ReplSession {
    input: InputHandler,
    display: DisplayManager,
    telemetry: TelemetryCollector,
    verbosity: Verbosity,
}

impl ReplSession {
    pub fn new(telemetry: TelemetryCollector, verbosity: Verbosity) -> Result<Self> {
        let input = match default_history_path() {
            Some(path) => InputHandler::with_history(path)?,
            None => InputHandler::new()?,
        };
        Ok(Self {
            input,
            display: DisplayManager::new(verbosity.show_progress()),
            telemetry,
            verbosity,
        })
    }

    pub fn show_welcome(&self, version: &str, backend: &str) {
        if self.verbosity != Verbosity::Quiet {
            self.display.show_banner(version, backend);
        }
    }

    /// Run until `exit`, `/exit` or end of input
    pub async fn run(&mut self, coordinator: &mut Coordinator) -> Result<()> {
        loop {
            let line = match self.input.read_line()? {
                ReadOutcome::Line(line) => line,
                ReadOutcome::Interrupted => {
                    self.display.show_info("(interrupted; type 'exit' to quit)");
                    continue;
                }
                ReadOutcome::Eof => break,
            };

            match classify(&line) {
                ReplAction::Skip => continue,
                ReplAction::Exit => break,
                ReplAction::Command(command) => self.execute(command, coordinator).await?,
                ReplAction::Query(query) => {
                    self.display.start_thinking(&query);
                    let answer = coordinator.handle_query(&query).await;
                    self.display.show_answer(&answer);
                }
            }
        }

        if let Err(e) = self.input.save_history() {
            tracing::warn!(error = %e, "could not save REPL history");
        }
        TelemetryDisplay::new(self.telemetry.clone(), self.verbosity).display_summary();
        Ok(())
    }

    async fn execute(&mut self, command: Command, coordinator: &Coordinator) -> Result<()> {
        match command {
            Command::Help => println!("{}", commands::help_text()),
            Command::History { limit } => {
                match coordinator.memory().store().conversation_history().await {
                    Ok(turns) => println!(
                        "{}",
                        commands::render_history(&turns, limit.unwrap_or(DEFAULT_HISTORY_LIMIT))
                    ),
                    Err(e) => self.display.show_error(&e.to_string()),
                }
            }
            Command::Stats => {
                println!("{}", TelemetryDisplay::new(self.telemetry.clone(), self.verbosity).summary());
            }
            Command::Plan { query } => println!("{}", commands::render_plan(&coordinator.plan(&query))?),
            Command::Clear => self.display.clear_screen()?,
            Command::Exit => {}
            Command::Unknown { input } => {
                self.display.show_error(&format!("Unknown command: {}", input));
                self.display.show_info("Type /help for available commands");
            }
        }
        Ok(())
    }
}
