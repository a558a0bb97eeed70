//! Error code definitions for parser diagnostics
//!
//! Error codes follow a naming convention: E{category}{number}
//! - E01xx: Lexical errors (invalid tokens)
//! - E02xx: Structural errors (delimiters, separators)
//! - E03xx: Clause errors (select list, FROM, GROUP BY, ...)
//! - E04xx: Expression errors
//! - E09xx: Generic/fallback errors

use std::fmt;

use crate::parser::SyntaxKind;

/// Error codes for parser diagnostics
///
/// Each error code represents a specific category of parse error,
/// enabling filtering, documentation, and IDE integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // E01xx: Lexical errors (invalid tokens)
    // =========================================================================
    /// Invalid or unexpected character in source
    E0101,
    /// Unterminated string or bytes literal
    E0102,
    /// Unterminated block comment
    E0103,
    /// Unterminated quoted identifier
    E0104,

    // =========================================================================
    // E02xx: Structural errors (delimiters, separators)
    // =========================================================================
    /// Missing semicolon between statements
    E0201,
    /// Unclosed parenthesis `(`
    E0202,
    /// Unclosed bracket `[` or angle bracket `<`
    E0203,
    /// Unexpected closing delimiter
    E0204,
    /// Missing comma in a list
    E0205,

    // =========================================================================
    // E03xx: Clause errors
    // =========================================================================
    /// Missing identifier or table name
    E0301,
    /// Missing keyword required by a clause
    E0302,
    /// Unexpected token inside a clause
    E0303,

    // =========================================================================
    // E04xx: Expression errors
    // =========================================================================
    /// Invalid expression
    E0401,
    /// Missing operand in expression
    E0402,
    /// Unclosed function call
    E0403,

    // =========================================================================
    // E09xx: Generic/fallback errors
    // =========================================================================
    /// Unexpected token in current context
    E0901,
    /// Expected a specific token
    E0902,
    /// Internal parser error
    E0999,
}

impl ErrorCode {
    /// Get the string representation of the error code (e.g., "E0201")
    pub fn as_str(&self) -> &'static str {
        match self {
            // Lexical
            Self::E0101 => "E0101",
            Self::E0102 => "E0102",
            Self::E0103 => "E0103",
            Self::E0104 => "E0104",
            // Structural
            Self::E0201 => "E0201",
            Self::E0202 => "E0202",
            Self::E0203 => "E0203",
            Self::E0204 => "E0204",
            Self::E0205 => "E0205",
            // Clause
            Self::E0301 => "E0301",
            Self::E0302 => "E0302",
            Self::E0303 => "E0303",
            // Expression
            Self::E0401 => "E0401",
            Self::E0402 => "E0402",
            Self::E0403 => "E0403",
            // Generic
            Self::E0901 => "E0901",
            Self::E0902 => "E0902",
            Self::E0999 => "E0999",
        }
    }

    /// Get a short description of the error category
    pub fn category_description(&self) -> &'static str {
        match self {
            Self::E0101 | Self::E0102 | Self::E0103 | Self::E0104 => "lexical error",
            Self::E0201 | Self::E0202 | Self::E0203 | Self::E0204 | Self::E0205 => {
                "structural error"
            }
            Self::E0301 | Self::E0302 | Self::E0303 => "clause error",
            Self::E0401 | Self::E0402 | Self::E0403 => "expression error",
            Self::E0901 | Self::E0902 | Self::E0999 => "syntax error",
        }
    }

    /// Get the default message template for this error code
    pub fn default_message(&self) -> &'static str {
        match self {
            // Lexical
            Self::E0101 => "invalid character",
            Self::E0102 => "unterminated string literal",
            Self::E0103 => "unterminated block comment",
            Self::E0104 => "unterminated quoted identifier",
            // Structural
            Self::E0201 => "missing semicolon",
            Self::E0202 => "unclosed parenthesis",
            Self::E0203 => "unclosed bracket",
            Self::E0204 => "unexpected closing delimiter",
            Self::E0205 => "missing comma",
            // Clause
            Self::E0301 => "missing identifier",
            Self::E0302 => "missing keyword",
            Self::E0303 => "unexpected token in clause",
            // Expression
            Self::E0401 => "invalid expression",
            Self::E0402 => "missing operand",
            Self::E0403 => "unclosed function call",
            // Generic
            Self::E0901 => "unexpected token",
            Self::E0902 => "expected token",
            Self::E0999 => "internal parser error",
        }
    }

    /// Check if this is a structural error (delimiter-related)
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::E0201 | Self::E0202 | Self::E0203 | Self::E0204 | Self::E0205
        )
    }

    /// Check if this is a recoverable error (parsing can continue)
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::E0999)
    }

    /// Classify an error token by the way it starts.
    pub fn for_lex_error(text: &str) -> Self {
        let quoted = text.trim_start_matches(|c: char| c.is_ascii_alphabetic());
        if text.starts_with("/*") {
            Self::E0103
        } else if text.starts_with('`') {
            Self::E0104
        } else if quoted.starts_with(['\'', '"']) {
            Self::E0102
        } else {
            Self::E0101
        }
    }

    /// Code for a token that had to be inserted to continue parsing.
    pub fn for_missing(kind: SyntaxKind) -> Self {
        match kind {
            SyntaxKind::SEMICOLON => Self::E0201,
            SyntaxKind::R_PAREN => Self::E0202,
            SyntaxKind::R_BRACKET | SyntaxKind::GT => Self::E0203,
            SyntaxKind::COMMA => Self::E0205,
            SyntaxKind::IDENT | SyntaxKind::QUOTED_IDENT => Self::E0301,
            SyntaxKind::NUMBER | SyntaxKind::STRING => Self::E0402,
            k if k.is_keyword() => Self::E0302,
            _ => Self::E0902,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
