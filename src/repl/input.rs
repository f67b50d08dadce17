//! Input handler for REPL using rustyline
//!
//! Line editing with persistent history.

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::history::History;
use rustyline::DefaultEditor;
use std::path::PathBuf;

pub const DEFAULT_PROMPT: &str = "agentdesk> ";

/// Outcome of reading one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Trimmed line, possibly empty
    Line(String),
    /// Ctrl-C; the current line is discarded
    Interrupted,
    /// Ctrl-D
    Eof,
}

/// Readline interface and command history
pub struct InputHandler {
    editor: DefaultEditor,
    history_path: Option<PathBuf>,
    prompt: String,
}

impl InputHandler {
    pub fn new() -> Result<Self> {
        Ok(InputHandler {
            editor: DefaultEditor::new()?,
            history_path: None,
            prompt: DEFAULT_PROMPT.to_string(),
        })
    }

    /// Create input handler with persistent history, loading it if present
    pub fn with_history(history_file: PathBuf) -> Result<Self> {
        let mut editor = DefaultEditor::new()?;

        if history_file.exists() {
            if let Err(e) = editor.load_history(&history_file) {
                tracing::warn!(path = %history_file.display(), error = %e, "could not load REPL history");
            }
        }

        Ok(InputHandler {
            editor,
            history_path: Some(history_file),
            prompt: DEFAULT_PROMPT.to_string(),
        })
    }

    pub fn set_prompt(&mut self, prompt: String) {
        self.prompt = prompt;
    }

    /// Read a line of input from the user
    pub fn read_line(&mut self) -> Result<ReadOutcome> {
        match self.editor.readline(&self.prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    let _ = self.editor.add_history_entry(trimmed);
                }
                Ok(ReadOutcome::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(err) => Err(anyhow::anyhow!("Readline error: {}", err)),
        }
    }

    /// Save history to disk, creating its directory if needed
    pub fn save_history(&mut self) -> Result<()> {
        if let Some(ref path) = self.history_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            self.editor.save_history(path)?;
        }
        Ok(())
    }

    pub fn clear_history(&mut self) {
        let _ = self.editor.history_mut().clear();
    }

    pub fn history_len(&self) -> usize {
        self.editor.history().len()
    }
}
