//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all possible token and node kinds in the syntax tree.
//! Token kinds come first and double as the terminal symbols of the grammar,
//! node kinds follow and name the visible rules of the BigQuery grammar.

use once_cell::sync::Lazy;

/// All syntax kinds (tokens and nodes) of the BigQuery dialect
///
/// Tokens are leaf nodes (identifiers, keywords, punctuation).
/// Nodes are composite (statements, clauses, expressions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace and comments - preserved but not semantically meaningful)
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,       // -- comment or # comment
    BLOCK_COMMENT,      // /* comment */

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,              // identifier
    QUOTED_IDENT,       // `project.dataset.table`
    NUMBER,             // 42, 1.5e3, 0x1F
    STRING,             // 'hello', """multi""", r'raw'
    BYTES,              // b'bytes'
    PARAMETER,          // @name
    SYSTEM_VARIABLE,    // @@name

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_PAREN,            // (
    R_PAREN,            // )
    L_BRACKET,          // [
    R_BRACKET,          // ]
    COMMA,              // ,
    DOT,                // .
    SEMICOLON,          // ;
    STAR,               // *
    EQ,                 // =
    NEQ,                // != or <>
    LT,                 // <
    GT,                 // >
    LT_EQ,              // <=
    GT_EQ,              // >=
    SHL,                // <<
    SHR,                // >> (split into two > when closing type brackets)
    PLUS,               // +
    MINUS,              // -
    SLASH,              // /
    PIPE_PIPE,          // ||
    PIPE,               // |
    AMP,                // &
    CARET,              // ^
    TILDE,              // ~
    QUESTION,           // ? (positional parameter)

    // =========================================================================
    // RESERVED KEYWORDS
    // =========================================================================
    ALL_KW,
    AND_KW,
    ARRAY_KW,
    AS_KW,
    ASC_KW,
    BETWEEN_KW,
    BY_KW,
    CASE_KW,
    CAST_KW,
    CROSS_KW,
    CURRENT_KW,
    DESC_KW,
    DISTINCT_KW,
    ELSE_KW,
    END_KW,
    EXCEPT_KW,
    EXISTS_KW,
    EXTRACT_KW,
    FALSE_KW,
    FOLLOWING_KW,
    FROM_KW,
    FULL_KW,
    GROUP_KW,
    HAVING_KW,
    IGNORE_KW,
    IN_KW,
    INNER_KW,
    INTERSECT_KW,
    INTERVAL_KW,
    IS_KW,
    JOIN_KW,
    LEFT_KW,
    LIKE_KW,
    LIMIT_KW,
    NOT_KW,
    NULL_KW,
    NULLS_KW,
    ON_KW,
    OR_KW,
    ORDER_KW,
    OUTER_KW,
    OVER_KW,
    PARTITION_KW,
    PRECEDING_KW,
    QUALIFY_KW,
    RANGE_KW,
    RECURSIVE_KW,
    RESPECT_KW,
    RIGHT_KW,
    ROWS_KW,
    SELECT_KW,
    STRUCT_KW,
    THEN_KW,
    TO_KW,
    TRUE_KW,
    UNBOUNDED_KW,
    UNION_KW,
    UNNEST_KW,
    USING_KW,
    WHEN_KW,
    WHERE_KW,
    WINDOW_KW,
    WITH_KW,

    // =========================================================================
    // NON-RESERVED KEYWORDS (read as identifiers where the keyword cannot occur)
    // =========================================================================
    BIGNUMERIC_KW,
    DATE_KW,
    DATETIME_KW,
    FIRST_KW,
    JSON_KW,
    LAST_KW,
    NUMERIC_KW,
    OFFSET_KW,
    REPLACE_KW,
    ROW_KW,
    SAFE_CAST_KW,
    TIME_KW,
    TIMESTAMP_KW,
    VALUE_KW,

    // =========================================================================
    // SPECIAL TOKENS
    // =========================================================================
    ERROR_TOKEN,        // unrecognized or unterminated input
    EOF,                // end of input, never stored in a tree

    // =========================================================================
    // NODES - Statements and queries
    // =========================================================================
    SOURCE_FILE,
    STATEMENT,
    QUERY,
    SELECT,
    SET_OPERATION,
    SUBQUERY,
    WITH_CLAUSE,
    CTE,

    // =========================================================================
    // NODES - Clauses
    // =========================================================================
    SELECT_CLAUSE,
    COLUMN,
    ALIAS,
    STAR_EXPRESSION,
    QUALIFIED_STAR,
    STAR_EXCEPT,
    STAR_REPLACE,
    REPLACE_ITEM,
    FROM_CLAUSE,
    TABLE_NAME,
    JOIN_EXPRESSION,
    ON_CLAUSE,
    USING_CLAUSE,
    UNNEST_EXPRESSION,
    WITH_OFFSET,
    WHERE_CLAUSE,
    GROUP_BY_CLAUSE,
    HAVING_CLAUSE,
    QUALIFY_CLAUSE,
    WINDOW_CLAUSE,
    NAMED_WINDOW,
    ORDER_BY_CLAUSE,
    ORDER_ITEM,
    LIMIT_CLAUSE,

    // =========================================================================
    // NODES - Expressions
    // =========================================================================
    BINARY_EXPRESSION,
    UNARY_EXPRESSION,
    PARENTHESIZED_EXPRESSION,
    IN_EXPRESSION,
    BETWEEN_EXPRESSION,
    IS_EXPRESSION,
    EXISTS_EXPRESSION,
    CASE_EXPRESSION,
    WHEN_CLAUSE,
    ELSE_CLAUSE,
    CAST_EXPRESSION,
    EXTRACT_EXPRESSION,
    TYPE,
    STRUCT_TYPE_FIELD,
    FUNCTION_CALL,
    WINDOW_FUNCTION,
    OVER_CLAUSE,
    PARTITION_BY_CLAUSE,
    FRAME_CLAUSE,
    FRAME_BOUND,
    FIELD_ACCESS,
    SUBSCRIPT_EXPRESSION,
    ARRAY_LITERAL,
    ARRAY_SUBQUERY,
    STRUCT_LITERAL,
    TYPED_LITERAL,
    INTERVAL_LITERAL,
    BOOLEAN_LITERAL,

    // Special
    ERROR,
    MISSING,

    #[doc(hidden)]
    __LAST,
}

/// Number of token kinds, which is also the number of grammar terminals.
pub const TERMINAL_COUNT: usize = SyntaxKind::EOF as usize + 1;

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::LINE_COMMENT | Self::BLOCK_COMMENT)
    }

    /// Check if this is a keyword, reserved or not
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::ALL_KW as u16) && (self as u16) <= (Self::VALUE_KW as u16)
    }

    /// Check if this is a keyword that may also be read as an identifier
    pub fn is_contextual_keyword(self) -> bool {
        (self as u16) >= (Self::BIGNUMERIC_KW as u16) && (self as u16) <= (Self::VALUE_KW as u16)
    }

    /// Check if this is a punctuation token
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::L_PAREN as u16) && (self as u16) <= (Self::QUESTION as u16)
    }

    /// Check if this is a literal or identifier token
    pub fn is_literal(self) -> bool {
        (self as u16) >= (Self::IDENT as u16) && (self as u16) <= (Self::SYSTEM_VARIABLE as u16)
    }

    /// Check if this kind is a token (leaf) kind
    pub fn is_token(self) -> bool {
        (self as usize) < TERMINAL_COUNT
    }

    /// Check if this kind is a composite node kind
    pub fn is_node(self) -> bool {
        !self.is_token() && self != Self::__LAST
    }

    /// Check if this is an `ERROR` or `MISSING` node
    pub fn is_error_or_missing(self) -> bool {
        matches!(self, Self::ERROR | Self::MISSING)
    }

    /// Lowercase name of the kind, e.g. `select_clause`
    pub fn name(self) -> &'static str {
        static NAMES: Lazy<Vec<String>> = Lazy::new(|| {
            (0..SyntaxKind::COUNT as u16)
                .filter_map(SyntaxKind::from_raw)
                .map(|kind| format!("{kind:?}").to_ascii_lowercase())
                .collect()
        });
        NAMES.get(self as usize).map_or("", String::as_str)
    }

    /// Number of kinds
    pub const COUNT: usize = Self::__LAST as usize;

    /// Convert a raw kind id, rejecting ids outside the enum
    pub fn from_raw(raw: u16) -> Option<Self> {
        (raw < Self::__LAST as u16).then(|| rowan::SyntaxKind(raw).into())
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BigQueryLanguage {}

impl rowan::Language for BigQueryLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<BigQueryLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<BigQueryLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<BigQueryLanguage>;
