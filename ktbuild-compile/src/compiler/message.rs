//! Compiler messages and the collector that accumulates them.

use serde::Serialize;

/// Severity of a compiler message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Severity {
    Error,
    Warning,
    Info,
    /// Unstructured compiler output.
    Output,
}

impl Severity {
    /// Returns true if this is an error severity.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
            Severity::Output => write!(f, "output"),
        }
    }
}

/// Labels `kotlinc` puts in front of a message, and the severity each maps to.
const LABELS: &[(&str, Severity)] = &[
    ("error", Severity::Error),
    ("exception", Severity::Error),
    ("warning", Severity::Warning),
    ("info", Severity::Info),
    ("logging", Severity::Info),
];

/// A single message reported by the compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompilerMessage {
    pub severity: Severity,
    pub message: String,
    /// Source location, e.g. `src/Main.kt:3:5`.
    pub location: Option<String>,
}

impl CompilerMessage {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            location: None,
        }
    }

    /// Add a location to this message.
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Parse one line of `kotlinc` output.
    ///
    /// Recognizes `error: text` and `path:line:col: error: text`; anything
    /// else is kept verbatim as [`Severity::Output`].
    pub fn parse_line(line: &str) -> Self {
        for (label, severity) in LABELS {
            if let Some(message) = line
                .strip_prefix(label)
                .and_then(|rest| rest.strip_prefix(": "))
            {
                return Self::new(*severity, message);
            }
        }
        for (label, severity) in LABELS {
            let marker = format!(": {label}: ");
            if let Some(idx) = line.find(&marker) {
                let location = &line[..idx];
                let message = &line[idx + marker.len()..];
                return Self::new(*severity, message).at(location);
            }
        }
        Self::new(Severity::Output, line)
    }
}

impl std::fmt::Display for CompilerMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(loc) = &self.location {
            write!(f, "{}: ", loc)?;
        }
        match self.severity {
            Severity::Output => write!(f, "{}", self.message),
            severity => write!(f, "{}: {}", severity, self.message),
        }
    }
}

/// Accumulates compiler messages during one compiler invocation.
#[derive(Debug, Default)]
pub struct MessageCollector {
    messages: Vec<CompilerMessage>,
}

impl MessageCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, message: CompilerMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[CompilerMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|m| m.severity.is_error())
    }
}
