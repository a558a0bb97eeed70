//! Diagnostics produced by the parser
//!
//! Every `ERROR` or `MISSING` node comes with one [`SyntaxError`]. Besides the
//! coded message, an error may carry a hint and secondary spans, such as the
//! `(` that a missing `)` would have closed.

use rowan::{TextRange, TextSize};
use thiserror::Error;

use super::codes::ErrorCode;
use super::context::ParseContext;

/// A secondary span attached to a diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub message: String,
    pub range: TextRange,
}

/// One parse diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("error {code}: {message}")]
pub struct SyntaxError {
    pub message: String,
    /// Offending bytes, empty for a missing token
    pub range: TextRange,
    pub code: ErrorCode,
    /// What was found or expected instead
    pub hint: Option<String>,
    pub related: Vec<RelatedInfo>,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            range,
            code,
            hint: None,
            related: Vec::new(),
        }
    }

    pub fn builder(code: ErrorCode) -> SyntaxErrorBuilder {
        SyntaxErrorBuilder {
            error: Self::new(code.default_message(), TextRange::empty(TextSize::new(0)), code),
        }
    }
}

/// Builds a [`SyntaxError`], starting from the code's default message
pub struct SyntaxErrorBuilder {
    error: SyntaxError,
}

impl SyntaxErrorBuilder {
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.error.message = message.into();
        self
    }

    pub fn range(mut self, range: TextRange) -> Self {
        self.error.range = range;
        self
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.error.hint = Some(hint.into());
        self
    }

    pub fn related(mut self, message: impl Into<String>, range: TextRange) -> Self {
        self.error.related.push(RelatedInfo {
            message: message.into(),
            range,
        });
        self
    }

    pub fn build(self) -> SyntaxError {
        self.error
    }
}

/// "unexpected <found> in <construct>", hinting at what the construct expects
pub fn format_context_error(
    found: &str,
    range: TextRange,
    context: ParseContext,
    code: ErrorCode,
) -> SyntaxError {
    SyntaxError::builder(code)
        .message(format!("unexpected {found} {}", context.description()))
        .range(range)
        .hint(format!("expected {}", context.expected_description()))
        .build()
}
