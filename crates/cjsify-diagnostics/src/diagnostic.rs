//! Coded diagnostics and the collection type the CLI accumulates them in.

use crate::span::{Label, Span};
use serde::{Deserialize, Serialize};

/// How bad a diagnostic is. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Informational, hidden unless the user asks for everything
    Hint,
    /// The file rewrites, but probably not the way the author meant
    Warning,
    /// The file cannot be rewritten
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Hint => "hint",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostic codes, grouped by the stage that produces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    // Parsing (P0xx)
    /// Source text is not a valid module
    ParseError,

    // Module rewrite (M0xx)
    /// Default export and named exports in the same file
    ExportConflict,
    /// A user binding named `module`, `exports` or `require` was renamed
    ReservedBindingRenamed,

    // Configuration (C0xx)
    /// `cjsify.toml` could not be read or contains an invalid pattern
    InvalidConfig,

    // Internal (I0xx)
    /// Unexpected failure, such as an unreadable file
    InternalError,
}

impl DiagnosticCode {
    pub const ALL: &'static [DiagnosticCode] = &[
        Self::ParseError,
        Self::ExportConflict,
        Self::ReservedBindingRenamed,
        Self::InvalidConfig,
        Self::InternalError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParseError => "P001",
            Self::ExportConflict => "M001",
            Self::ReservedBindingRenamed => "M002",
            Self::InvalidConfig => "C001",
            Self::InternalError => "I001",
        }
    }

    /// Look a code up by its printed form, case-insensitively.
    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(code.trim()))
    }

    pub fn default_severity(&self) -> Severity {
        match self {
            Self::ParseError | Self::ExportConflict | Self::InvalidConfig | Self::InternalError => {
                Severity::Error
            }
            Self::ReservedBindingRenamed => Severity::Hint,
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A coded message with a primary location and optional related labels.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    /// Single-line message
    pub message: String,
    /// Optional help line shown under the snippet
    pub help: Option<String>,
    /// Primary location
    pub span: Span,
    /// Related locations
    pub labels: Vec<Label>,
}

impl Diagnostic {
    /// Start an error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code, Severity::Error, message)
    }

    /// Start a warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code, Severity::Warning, message)
    }

    /// Start a hint diagnostic.
    pub fn hint(code: DiagnosticCode, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code, Severity::Hint, message)
    }

    /// Diagnostic with the code's default severity.
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code, code.default_severity(), message)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    pub fn is_hint(&self) -> bool {
        self.severity == Severity::Hint
    }
}

/// Builder returned by the [`Diagnostic`] constructors.
pub struct DiagnosticBuilder {
    inner: Diagnostic,
}

impl DiagnosticBuilder {
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            inner: Diagnostic {
                code,
                severity,
                message: message.into(),
                help: None,
                span: Span::DUMMY,
                labels: Vec::new(),
            },
        }
    }

    /// Set the primary location.
    pub fn with_span(mut self, span: Span) -> Self {
        self.inner.span = span;
        self
    }

    /// Attach a secondary label. Dummy spans are ignored.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        if !span.is_dummy() {
            self.inner.labels.push(Label::secondary(span, message));
        }
        self
    }

    /// Set the help line.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.inner.help = Some(help.into());
        self
    }

    pub fn build(self) -> Diagnostic {
        self.inner
    }
}

/// Diagnostics of a whole run, in the order they were reported.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    pub items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.items.extend(diagnostics);
    }

    /// Whether anything blocks the rewrite.
    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|d| d.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.items.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.items.iter().filter(|d| d.is_warning()).count()
    }

    pub fn hint_count(&self) -> usize {
        self.items.iter().filter(|d| d.is_hint()).count()
    }

    /// Drop hints, keeping errors and warnings in order.
    pub fn without_hints(self) -> Self {
        Self {
            items: self.items.into_iter().filter(|d| !d.is_hint()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
