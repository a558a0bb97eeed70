//! Parser error handling module
//!
//! This module provides the diagnostics attached to every parse result:
//! - Categorized error codes for filtering and documentation
//! - Context-aware error messages derived from the parser state
//! - Suggestions/hints for common mistakes
//! - Related span tracking (e.g., "opened here" for unclosed parentheses)

mod codes;
mod context;
mod error;

pub use codes::ErrorCode;
pub use context::ParseContext;
pub use error::{RelatedInfo, SyntaxError, SyntaxErrorBuilder, format_context_error};
