//! Foundation types for the BigQuery syntax toolkit.
//!
//! This module provides the positional primitives used throughout the parser:
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineCol`], [`LineIndex`] - Line/column conversion
//!
//! This module has NO dependencies on other crate modules.

mod span;

pub use span::{LineCol, LineIndex, TextRange, TextSize};

// Re-export text-size types for convenience
pub use text_size;
