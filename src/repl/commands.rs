//! Built-in REPL commands
//!
//! Parsing is separate from execution; rendering helpers return strings so
//! output can be checked without a terminal.

use crate::memory::ConversationTurn;
use crate::types::PlanStep;
use colored::*;

/// REPL command types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    History { limit: Option<usize> },
    Stats,
    Plan { query: String },
    Clear,
    Exit,
    Unknown { input: String },
}

pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Whether `input` is a slash command
pub fn is_command(input: &str) -> bool {
    input.trim_start().starts_with('/')
}

/// Bare `exit`, in any casing
pub fn is_exit_word(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("exit")
}

/// Parse a slash command
pub fn parse(input: &str) -> Command {
    let trimmed = input.trim();
    let Some(body) = trimmed.strip_prefix('/') else {
        return Command::Unknown {
            input: input.to_string(),
        };
    };

    let (name, rest) = match body.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (body, ""),
    };

    match name.to_lowercase().as_str() {
        "help" | "h" => Command::Help,
        "exit" | "quit" | "q" => Command::Exit,
        "history" => Command::History {
            limit: rest.parse().ok(),
        },
        "stats" => Command::Stats,
        "plan" if !rest.is_empty() => Command::Plan {
            query: rest.to_string(),
        },
        "clear" | "cls" => Command::Clear,
        _ => Command::Unknown {
            input: input.to_string(),
        },
    }
}

pub fn help_text() -> String {
    let commands = [
        ("/help, /h", "Show this help message"),
        ("/history [n]", "Show the last n conversation turns (default: 10)"),
        ("/stats", "Show query statistics for this session"),
        ("/plan <query>", "Show the plan for a query without running it"),
        ("/clear, /cls", "Clear screen"),
        ("/exit, /quit, exit", "Exit REPL"),
    ];

    let mut out = format!("\n{}\n{}\n", "Available Commands:".bold().cyan(), "=".repeat(60).cyan());
    for (cmd, desc) in commands {
        out.push_str(&format!("  {:<22} {}\n", cmd.green(), desc));
    }
    out.push_str(&format!("\n{}\n", "Usage:".bold()));
    out.push_str("  - Type your question directly (no / prefix)\n");
    out.push_str(&format!("  - Use {} for input history\n", "UP/DOWN arrows".cyan()));
    out
}

/// Last `limit` turns, oldest first
pub fn render_history(turns: &[ConversationTurn], limit: usize) -> String {
    if turns.is_empty() {
        return format!("{}", "No conversation yet.".yellow());
    }

    let start = turns.len().saturating_sub(limit);
    let shown = &turns[start..];
    let mut out = format!(
        "\n{}\n{}\n",
        format!("Conversation (last {}):", shown.len()).bold().cyan(),
        "=".repeat(60).cyan()
    );
    for turn in shown {
        let stamp = turn.timestamp.format("%H:%M:%S").to_string();
        out.push_str(&format!("  {} {:<6} {}\n", stamp.dimmed(), turn.role.as_str().cyan(), turn.content));
    }
    out
}

/// Numbered plan listing, followed by its JSON form
pub fn render_plan(steps: &[PlanStep]) -> crate::errors::Result<String> {
    let mut out = format!("\n{}\n", format!("Plan ({} steps):", steps.len()).bold().cyan());
    for (i, step) in steps.iter().enumerate() {
        let chained = if step.needs_previous_output() { " <- previous output" } else { "" };
        out.push_str(&format!("  {}. {} / {}{}\n", i + 1, step.agent, step.task.name(), chained.dimmed()));
    }
    out.push_str(&serde_json::to_string_pretty(steps)?);
    out.push('\n');
    Ok(out)
}
