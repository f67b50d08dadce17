//! Display manager for the REPL terminal UI

use colored::*;
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::time::Duration;

/// Spinner refresh interval
const TICK: Duration = Duration::from_millis(100);

pub struct DisplayManager {
    spinner: Option<ProgressBar>,
    show_progress: bool,
}

impl DisplayManager {
    pub fn new(show_progress: bool) -> Self {
        DisplayManager {
            spinner: None,
            show_progress,
        }
    }

    /// Show welcome banner
    pub fn show_banner(&self, version: &str, backend: &str) {
        let width = 64;
        let rule = "=".repeat(width);
        println!("\n{}", rule.cyan());
        println!("{}", format!("  agentdesk {} - Interactive Assistant", version).bold().cyan());
        println!("{}", format!("  Agents: research, analysis, memory | Store: {}", backend).dimmed());
        println!("{}\n", rule.cyan());
        println!(
            "Type your question (or {} for commands, {} to quit)\n",
            "/help".green(),
            "exit".green()
        );
    }

    /// Start the thinking spinner
    pub fn start_thinking(&mut self, query: &str) {
        self.finish_thinking();
        if !self.show_progress {
            return;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} Thinking... {msg} ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(truncate(query, 48));
        pb.enable_steady_tick(TICK);
        self.spinner = Some(pb);
    }

    /// Stop and clear the spinner if running
    pub fn finish_thinking(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }

    pub fn show_answer(&mut self, answer: &str) {
        self.finish_thinking();
        println!("{} {}\n", "System:".bold().green(), answer);
    }

    pub fn show_error(&mut self, message: &str) {
        self.finish_thinking();
        eprintln!("{} {}", "Error:".bold().red(), message);
    }

    pub fn show_info(&self, message: &str) {
        println!("{}", message.yellow());
    }

    pub fn clear_screen(&self) -> io::Result<()> {
        execute!(io::stdout(), Clear(ClearType::All), cursor::MoveTo(0, 0))
    }

    pub fn is_thinking(&self) -> bool {
        self.spinner.is_some()
    }
}

/// Cut `text` to at most `max` characters, marking the cut with "..."
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
