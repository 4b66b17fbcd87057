//! Structured diagnostic messages with severity, code, subject, and notes.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use crate::subject::Subject;
use serde::{Deserialize, Serialize};

/// A structured diagnostic message about the netlist or the solve.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The code identifying the kind of diagnostic.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// The netlist entity the diagnostic is about.
    pub subject: Subject,
    /// Explanatory footnotes (`note: ...`).
    pub notes: Vec<String>,
    /// Actionable suggestions (`help: ...`).
    pub help: Vec<String>,
}

impl Diagnostic {
    fn with_severity(
        severity: Severity,
        code: DiagnosticCode,
        message: impl Into<String>,
        subject: Subject,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            subject,
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// Creates a new error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>, subject: Subject) -> Self {
        Self::with_severity(Severity::Error, code, message, subject)
    }

    /// Creates a new warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>, subject: Subject) -> Self {
        Self::with_severity(Severity::Warning, code, message, subject)
    }

    /// Creates a new note diagnostic.
    pub fn note(code: DiagnosticCode, message: impl Into<String>, subject: Subject) -> Self {
        Self::with_severity(Severity::Note, code, message, subject)
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Adds a help message to this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_error() {
        let diag = Diagnostic::error(
            DiagnosticCode::UNANCHORED_GATES,
            "gates have no path to a fixed pin",
            Subject::Rows(vec![0, 1]),
        );
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.code.to_string(), "E201");
        assert_eq!(diag.subject, Subject::Rows(vec![0, 1]));
    }

    #[test]
    fn create_warning_and_note() {
        let warn = Diagnostic::warning(DiagnosticCode::EMPTY_NET, "net is empty", Subject::Net(4));
        assert_eq!(warn.severity, Severity::Warning);
        let note = Diagnostic::note(DiagnosticCode::SOLVER_REPORT, "converged", Subject::None);
        assert_eq!(note.severity, Severity::Note);
    }

    #[test]
    fn builder_methods() {
        let diag = Diagnostic::warning(DiagnosticCode::FLOATING_PIN, "floating pin", Subject::Pin(2))
            .with_note("net 6 has no gate members")
            .with_help("connect the pin to a gate or drop it");
        assert_eq!(diag.notes.len(), 1);
        assert_eq!(diag.help.len(), 1);
    }
}
