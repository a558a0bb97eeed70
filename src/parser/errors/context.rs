//! Parse context tracking for context-aware error messages
//!
//! The parser derives a context from the innermost construct it is building
//! when an error is detected, to generate more helpful messages and to pick
//! additional synchronization tokens for recovery.

use crate::parser::SyntaxKind;

/// Represents the current parsing context
///
/// Used to generate context-aware error messages and determine
/// appropriate recovery strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseContext {
    /// Between statements
    TopLevel,
    /// Inside a WITH clause or one of its common table expressions
    WithClause,
    /// Inside the select list
    SelectList,
    /// Inside a FROM clause, a join, or an UNNEST
    FromClause,
    /// Inside a WHERE, HAVING or QUALIFY filter
    Filter,
    /// Inside GROUP BY
    GroupBy,
    /// Inside ORDER BY
    OrderBy,
    /// Inside LIMIT/OFFSET
    Limit,
    /// Inside a window specification
    Window,
    /// Parsing an expression
    Expression,
    /// Parsing function call arguments
    ArgumentList,
    /// Parsing a type in CAST or a typed constructor
    TypeAnnotation,
    /// Inside a parenthesized query
    Subquery,
}

impl ParseContext {
    /// Context for the innermost node kind under construction
    pub fn for_kind(kind: SyntaxKind) -> Self {
        use SyntaxKind::*;
        match kind {
            WITH_CLAUSE | CTE => Self::WithClause,
            SELECT_CLAUSE | COLUMN | ALIAS | STAR_EXPRESSION | QUALIFIED_STAR | STAR_EXCEPT
            | STAR_REPLACE | REPLACE_ITEM => Self::SelectList,
            FROM_CLAUSE | TABLE_NAME | JOIN_EXPRESSION | ON_CLAUSE | USING_CLAUSE
            | UNNEST_EXPRESSION | WITH_OFFSET => Self::FromClause,
            WHERE_CLAUSE | HAVING_CLAUSE | QUALIFY_CLAUSE => Self::Filter,
            GROUP_BY_CLAUSE => Self::GroupBy,
            ORDER_BY_CLAUSE | ORDER_ITEM => Self::OrderBy,
            LIMIT_CLAUSE => Self::Limit,
            WINDOW_CLAUSE | NAMED_WINDOW | OVER_CLAUSE | PARTITION_BY_CLAUSE | FRAME_CLAUSE
            | FRAME_BOUND => Self::Window,
            FUNCTION_CALL | WINDOW_FUNCTION | STRUCT_LITERAL | ARRAY_LITERAL => {
                Self::ArgumentList
            }
            TYPE | STRUCT_TYPE_FIELD => Self::TypeAnnotation,
            QUERY | SUBQUERY | SELECT | SET_OPERATION | ARRAY_SUBQUERY | EXISTS_EXPRESSION => {
                Self::Subquery
            }
            STATEMENT | SOURCE_FILE => Self::TopLevel,
            _ => Self::Expression,
        }
    }

    /// Get a human-readable description of this context for error messages
    pub fn description(&self) -> &'static str {
        match self {
            Self::TopLevel => "at top level",
            Self::WithClause => "in WITH clause",
            Self::SelectList => "in select list",
            Self::FromClause => "in FROM clause",
            Self::Filter => "in filter condition",
            Self::GroupBy => "in GROUP BY clause",
            Self::OrderBy => "in ORDER BY clause",
            Self::Limit => "in LIMIT clause",
            Self::Window => "in window specification",
            Self::Expression => "in expression",
            Self::ArgumentList => "in argument list",
            Self::TypeAnnotation => "in type",
            Self::Subquery => "in subquery",
        }
    }

    /// Get a description of what tokens are expected in this context
    pub fn expected_description(&self) -> &'static str {
        match self {
            Self::TopLevel => "a query or ';'",
            Self::WithClause => "a named subquery (name AS (query))",
            Self::SelectList => "a column, '*' or an aliased expression",
            Self::FromClause => "a table name, subquery, UNNEST or join",
            Self::Filter => "a boolean condition",
            Self::GroupBy => "a grouping expression",
            Self::OrderBy => "an ordering expression with optional ASC/DESC",
            Self::Limit => "a row count",
            Self::Window => "PARTITION BY, ORDER BY or a window frame",
            Self::Expression => "an expression (literal, column, or operator)",
            Self::ArgumentList => "an argument",
            Self::TypeAnnotation => "a type name",
            Self::Subquery => "a query",
        }
    }

    /// Get the recovery tokens appropriate for this context
    pub fn recovery_tokens(&self) -> &'static [SyntaxKind] {
        match self {
            Self::TopLevel | Self::WithClause | Self::Limit => &[SyntaxKind::SEMICOLON],
            Self::SelectList | Self::GroupBy | Self::OrderBy => {
                &[SyntaxKind::COMMA, SyntaxKind::SEMICOLON]
            }
            Self::FromClause => &[
                SyntaxKind::COMMA,
                SyntaxKind::JOIN_KW,
                SyntaxKind::ON_KW,
                SyntaxKind::SEMICOLON,
            ],
            Self::Filter => &[SyntaxKind::AND_KW, SyntaxKind::OR_KW, SyntaxKind::SEMICOLON],
            Self::Window | Self::Expression | Self::ArgumentList | Self::Subquery => {
                &[SyntaxKind::R_PAREN, SyntaxKind::SEMICOLON]
            }
            Self::TypeAnnotation => &[SyntaxKind::GT, SyntaxKind::SHR, SyntaxKind::R_PAREN],
        }
    }
}
