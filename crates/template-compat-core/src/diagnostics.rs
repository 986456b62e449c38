//! Non-fatal diagnostics reported by compiler passes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::source::SourceLocation;

/// Stable classification of a reported problem.
///
/// Serialized names are part of the JSON output contract of the CLI and must
/// not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum DiagnosticKind {
    /// `data=` on a call whose target is not a fixed template name.
    DataAttributeOnlyAllowedOnStaticCalls,
    /// A local binding whose name lacks the `$` sigil.
    MustBeDollarIdent,
    /// A `ve(...)` name that starts with the `$` sigil.
    MustBeConstant,
}

impl DiagnosticKind {
    pub fn message(self) -> &'static str {
        match self {
            DiagnosticKind::DataAttributeOnlyAllowedOnStaticCalls => {
                "The data attribute is only allowed on static calls."
            }
            DiagnosticKind::MustBeDollarIdent => "Name must begin with a '$'.",
            DiagnosticKind::MustBeConstant => "Expected constant identifier.",
        }
    }
}

/// A single reported problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub location: SourceLocation,
    pub kind: DiagnosticKind,
    /// Human-readable text, always `kind.message()`.
    pub message: String,
}

impl Diagnostic {
    pub fn new(location: SourceLocation, kind: DiagnosticKind) -> Self {
        Self {
            location,
            kind,
            message: kind.message().to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: error: {}", self.location, self.message)
    }
}

/// Sink for diagnostics. Passes report through this and keep going.
pub trait ErrorReporter {
    fn report(&mut self, location: &SourceLocation, kind: DiagnosticKind);
}

/// Reporter that keeps every diagnostic in report order.
#[derive(Debug, Default, Clone)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl ErrorReporter for DiagnosticCollector {
    fn report(&mut self, location: &SourceLocation, kind: DiagnosticKind) {
        tracing::trace!(%location, ?kind, "diagnostic reported");
        self.diagnostics.push(Diagnostic::new(location.clone(), kind));
    }
}
