//! Table-driven incremental parser for BigQuery SQL
//!
//! This module provides a lossless, incremental parser using:
//! - **logos** for fast lexing
//! - **rowan** for the CST (Concrete Syntax Tree)
//! - an LALR(1) table compiled at first use from a tree-sitter style grammar
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with SyntaxKind
//!     ↓
//! Engine (shift-reduce over ParseTable, bounded search on ambiguity)
//!     ↓               ↘ recovery: MISSING insertion / ERROR skipping
//! GreenNode tree (immutable, cheap to clone)
//!     ↓
//! syntax::Tree → Node / TreeCursor / Walk
//! ```
//!
//! ## Incremental Reparsing
//!
//! When text changes, the engine runs again over the new text. Whenever it is
//! about to shift a token that starts an old subtree which lies outside the
//! edit and was built in the same automaton state, the old green node is
//! pushed whole instead and lexing resumes after it.

#[allow(clippy::module_inception)]
mod parser;

pub mod errors;
pub mod grammar;
mod input;
pub mod keywords;
mod lexer;
mod options;
mod recovery;
pub(crate) mod syntax_kind;
pub mod table;

pub(crate) use parser::{Engine, green_id};

pub use errors::{ErrorCode, ParseContext, RelatedInfo, SyntaxError};
pub use lexer::{Lexer, LexerState, Token, literal_value, tokenize, tokenize_all};
pub use options::ParseOptions;
pub use parser::{NodeInfo, NodeInfoMap, Parse};
pub use syntax_kind::{
    BigQueryLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken, TERMINAL_COUNT,
};

/// Re-export rowan types for convenience
pub use rowan::{GreenNode, TextRange, TextSize};
