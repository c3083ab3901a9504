//! The `ParseError` struct and its constructors.

use vela_diagnostic::{Diagnostic, ErrorCode};
use vela_ir::Span;

/// Parse error with error code for rich diagnostics.
///
/// Errors abort the entry point that produced them; there is no local
/// recovery.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ParseError {
    pub(crate) code: ErrorCode,
    pub(crate) message: String,
    pub(crate) span: Span,
    /// Optional context for suggestions.
    pub(crate) context: Option<String>,
    /// Optional help messages.
    pub(crate) help: Vec<String>,
}

impl ParseError {
    /// Error code for searchability.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Location of the error.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Optional context.
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Create a new parse error.
    #[cold]
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        ParseError {
            code,
            message: message.into(),
            span,
            context: None,
            help: Vec::new(),
        }
    }

    /// Error for a construct the active dialect does not allow.
    #[cold]
    pub fn dialect_forbidden(dialect_name: &str, construct: &str, span: Span) -> Self {
        ParseError::new(
            ErrorCode::E1030,
            format!("{dialect_name} does not support {construct}"),
            span,
        )
    }

    /// Add context for better error messages.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a help message.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }

    /// Convert to a full `Diagnostic` for the sink.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.code, self.span, &self.message)
            .with_label(self.span, self.context.as_deref().unwrap_or("here"));
        for help in &self.help {
            diag = diag.with_note(help);
        }
        diag
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}: {}", self.code, self.span, self.message)
    }
}

impl std::error::Error for ParseError {}
