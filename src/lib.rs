//! # bigquery-syntax
//!
//! Incremental, error-tolerant concrete syntax trees for BigQuery SQL.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! language    → language() handle, Parser, batch parsing
//!   ↓
//! incremental → InputEdit, reuse of unaffected subtrees
//!   ↓
//! syntax      → Tree, Node, TreeCursor, Walk
//!   ↓
//! parser      → Logos lexer, grammar DSL, LALR table, shift-reduce engine
//!   ↓
//! base        → Primitives (TextRange, LineCol, LineIndex)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → syntax → incremental → language)
// ============================================================================

/// Foundation types: TextRange, LineCol, LineIndex
pub mod base;

/// Parser: Logos lexer, grammar table, shift-reduce engine, error recovery
pub mod parser;

/// Syntax: parsed trees and the node inspection API
pub mod syntax;

/// Incremental reparsing: edit descriptions and subtree reuse
pub mod incremental;

/// Language handle and parse entry points
pub mod language;

// Re-export commonly needed items
pub use parser::keywords;

pub use base::{LineCol, LineIndex, TextRange, TextSize};
pub use incremental::{EditError, InputEdit};
pub use language::{Language, Parser, language};
pub use parser::{ErrorCode, ParseOptions, RelatedInfo, SyntaxError, SyntaxKind};
pub use syntax::{Node, NodeId, Tree, TreeCursor, Walk};
