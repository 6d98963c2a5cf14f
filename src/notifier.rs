//! User-facing notifications
//!
//! Every flow outcome (validation rejection, failure or success) is
//! surfaced through a [`Notifier`]: a blocking alert, and a yes/no
//! confirmation for destructive bulk actions. The terminal
//! implementation prints colored messages and reads the answer with
//! `rustyline`; [`MemoryNotifier`] records everything for tests and
//! headless runs.

use colored::Colorize;
use rustyline::DefaultEditor;
use std::fmt;

/// Severity of an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    /// Neutral information
    Info,
    /// An operation completed
    Success,
    /// Input was rejected before any request
    Warning,
    /// An operation failed
    Error,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Success => write!(f, "OK"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Blocking user notification surface
pub trait Notifier {
    /// Show a message; returns once the user has been told
    fn alert(&mut self, kind: AlertKind, message: &str);

    /// Ask a yes/no question; `false` means declined
    fn confirm(&mut self, question: &str) -> bool;
}

/// Notifier that prints to the terminal
pub struct TerminalNotifier {
    editor: Option<DefaultEditor>,
}

impl TerminalNotifier {
    /// Create a terminal notifier
    ///
    /// Confirmation falls back to "declined" if no line editor can be
    /// attached to the terminal.
    pub fn new() -> Self {
        let editor = DefaultEditor::new()
            .map_err(|e| tracing::warn!("Confirmation prompts unavailable: {}", e))
            .ok();
        Self { editor }
    }
}

impl Default for TerminalNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for TerminalNotifier {
    fn alert(&mut self, kind: AlertKind, message: &str) {
        let tag = match kind {
            AlertKind::Info => format!("[{}]", kind).blue(),
            AlertKind::Success => format!("[{}]", kind).green(),
            AlertKind::Warning => format!("[{}]", kind).yellow(),
            AlertKind::Error => format!("[{}]", kind).red().bold(),
        };
        println!("{} {}\n", tag, message);
    }

    fn confirm(&mut self, question: &str) -> bool {
        let Some(editor) = self.editor.as_mut() else {
            return false;
        };
        match editor.readline(&format!("{} [y/N] ", question)) {
            Ok(answer) => is_yes(&answer),
            Err(e) => {
                tracing::debug!("Confirmation aborted: {}", e);
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Notifier that records alerts and answers confirmations from a script
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    /// Alerts in the order they were raised
    pub alerts: Vec<(AlertKind, String)>,
    /// Questions asked, in order
    pub questions: Vec<String>,
    /// Answer given to every confirmation
    pub answer: bool,
}

impl MemoryNotifier {
    /// Notifier that answers every confirmation with `answer`
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            ..Self::default()
        }
    }

    /// Most recent alert
    pub fn last(&self) -> Option<&(AlertKind, String)> {
        self.alerts.last()
    }
}

impl Notifier for MemoryNotifier {
    fn alert(&mut self, kind: AlertKind, message: &str) {
        self.alerts.push((kind, message.to_string()));
    }

    fn confirm(&mut self, question: &str) -> bool {
        self.questions.push(question.to_string());
        self.answer
    }
}
