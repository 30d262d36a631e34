//! Structured diagnostics reported during a compile

use oxc_span::Span;
use serde::Serialize;

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Hint,
    Info,
    Warning,
    Error,
}

/// What went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// An expression matched no classification rule and was treated as dynamic
    ClassificationAmbiguity,
    /// A construct the current target cannot express; the binding is omitted
    UnsupportedConstruct,
    /// A `$`-prefixed attribute namespace the compiler does not know
    UnknownNamespace,
    /// Children where the element cannot hold any
    InvalidChildren,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: DiagnosticSeverity,
    pub message: String,
    pub help: Option<String>,
    /// Start offset in the source
    pub start: u32,
    /// End offset in the source
    pub end: u32,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: DiagnosticSeverity::Warning,
            message: message.into(),
            help: None,
            start: span.start,
            end: span.end,
        }
    }

    pub fn hint(kind: DiagnosticKind, span: Span, message: impl Into<String>) -> Self {
        Self::new(kind, span, message).with_severity(DiagnosticSeverity::Hint)
    }

    pub fn warning(kind: DiagnosticKind, span: Span, message: impl Into<String>) -> Self {
        Self::new(kind, span, message)
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_severity(mut self, severity: DiagnosticSeverity) -> Self {
        self.severity = severity;
        self
    }
}

/// Receives diagnostics as the compiler produces them
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}
