//! Diagnostics shared across checker phases.
//!
//! The queue is the one piece of mutable state phases share: workers
//! finalizing distinct method bodies append to it concurrently, so the
//! append path is behind a lock.

use std::fmt;
use std::sync::Mutex;

/// The severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// Fatal error that fails the check.
    Error,
    /// Warning that does not fail the check.
    Warning,
    /// Informational note.
    Note,
}

impl Level {
    /// Returns the string representation of the level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Note => "note",
        }
    }

    /// Returns true if this level is an error.
    pub fn is_error(&self) -> bool {
        matches!(self, Level::Error)
    }
}

/// A diagnostic message.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// The severity level.
    pub level: Level,
    /// The main message.
    pub message: String,
}

impl Diagnostic {
    /// Creates a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }

    /// Creates a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level.as_str(), self.message)
    }
}

/// An append-only, thread-safe queue of diagnostics.
#[derive(Debug, Default)]
pub struct ErrorQueue {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl ErrorQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a diagnostic.
    pub fn push(&self, diagnostic: Diagnostic) {
        self.diagnostics.lock().unwrap().push(diagnostic);
    }

    /// Returns the number of queued diagnostics.
    pub fn len(&self) -> usize {
        self.diagnostics.lock().unwrap().len()
    }

    /// Returns true if nothing has been reported.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if any error-level diagnostic has been reported.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .lock()
            .unwrap()
            .iter()
            .any(|d| d.level.is_error())
    }

    /// Takes all queued diagnostics, leaving the queue empty.
    pub fn drain(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.lock().unwrap())
    }
}
