//! BigQuery query grammar
//!
//! Visible rules are named after the node kind they produce. Hidden rules
//! (`_expression`, `_identifier`, ...) only group alternatives.

use super::{
    GrammarBuilder, GrammarError, Grammar, comma_sep1, opt, prec_left, prec_right, repeat, repeat1,
};
use crate::parser::SyntaxKind::*;
use crate::{choice, seq};

/// Name of the start rule
pub const ROOT: &str = "source_file";

/// Binding strength of operators, loosest first
mod prec {
    pub const SET_OPERATION: i32 = 1;
    pub const OR: i32 = 1;
    pub const AND: i32 = 2;
    pub const NOT: i32 = 3;
    pub const COMPARISON: i32 = 4;
    pub const BIT_OR: i32 = 5;
    pub const BIT_XOR: i32 = 6;
    pub const BIT_AND: i32 = 7;
    pub const SHIFT: i32 = 8;
    pub const ADDITIVE: i32 = 9;
    pub const MULTIPLICATIVE: i32 = 10;
    pub const UNARY: i32 = 11;
    pub const POSTFIX: i32 = 13;
}

/// Build the BigQuery grammar
pub fn grammar() -> Result<Grammar, GrammarError> {
    let mut g = GrammarBuilder::new();
    statements(&mut g);
    select_list(&mut g);
    from_clause(&mut g);
    clauses(&mut g);
    windows(&mut g);
    expressions(&mut g);
    types(&mut g);
    g.build(ROOT)
}

fn statements(g: &mut GrammarBuilder) {
    g.hidden(
        ROOT,
        seq![opt(STATEMENT), repeat(seq![SEMICOLON, opt(STATEMENT)])],
    );
    g.node(STATEMENT, "_query");
    g.node(QUERY, "_query");
    g.hidden(
        "_query",
        seq![
            opt(WITH_CLAUSE),
            "_query_body",
            opt(ORDER_BY_CLAUSE),
            opt(LIMIT_CLAUSE)
        ],
    );
    g.hidden("_query_body", choice!["_select", SET_OPERATION, SUBQUERY]);
    g.hidden(
        "_select",
        seq![
            SELECT_CLAUSE,
            opt(FROM_CLAUSE),
            opt(WHERE_CLAUSE),
            opt(GROUP_BY_CLAUSE),
            opt(HAVING_CLAUSE),
            opt(QUALIFY_CLAUSE),
            opt(WINDOW_CLAUSE)
        ],
    );
    g.node(SELECT, "_select");
    g.node(
        SET_OPERATION,
        prec_left(
            prec::SET_OPERATION,
            seq![
                "_set_operand",
                choice![
                    seq![UNION_KW, choice![ALL_KW, DISTINCT_KW]],
                    seq![INTERSECT_KW, DISTINCT_KW],
                    seq![EXCEPT_KW, DISTINCT_KW],
                ],
                "_set_operand"
            ],
        ),
    );
    g.hidden("_set_operand", choice![SELECT, SET_OPERATION, SUBQUERY]);
    g.node(SUBQUERY, seq![L_PAREN, QUERY, R_PAREN]);
    g.node(WITH_CLAUSE, seq![WITH_KW, opt(RECURSIVE_KW), comma_sep1(CTE)]);
    g.node(CTE, seq!["_identifier", AS_KW, L_PAREN, QUERY, R_PAREN]);
}

fn select_list(g: &mut GrammarBuilder) {
    g.node(
        SELECT_CLAUSE,
        seq![
            SELECT_KW,
            opt(seq![AS_KW, choice![STRUCT_KW, VALUE_KW]]),
            opt(choice![DISTINCT_KW, ALL_KW]),
            comma_sep1(COLUMN)
        ],
    );
    g.node(
        COLUMN,
        choice![seq!["_expression", opt(ALIAS)], STAR_EXPRESSION, QUALIFIED_STAR],
    );
    g.node(ALIAS, seq![opt(AS_KW), "_identifier"]);
    g.node(
        STAR_EXPRESSION,
        seq![STAR, opt(STAR_EXCEPT), opt(STAR_REPLACE)],
    );
    g.node(
        QUALIFIED_STAR,
        seq!["_expression", DOT, STAR, opt(STAR_EXCEPT), opt(STAR_REPLACE)],
    );
    g.node(
        STAR_EXCEPT,
        seq![EXCEPT_KW, L_PAREN, comma_sep1("_identifier"), R_PAREN],
    );
    g.node(
        STAR_REPLACE,
        seq![REPLACE_KW, L_PAREN, comma_sep1(REPLACE_ITEM), R_PAREN],
    );
    g.node(REPLACE_ITEM, seq!["_expression", AS_KW, "_identifier"]);
}

fn from_clause(g: &mut GrammarBuilder) {
    g.node(FROM_CLAUSE, seq![FROM_KW, comma_sep1("_from_item")]);
    g.hidden("_from_item", choice![JOIN_EXPRESSION, "_table_primary"]);
    g.hidden(
        "_table_primary",
        choice![
            seq![TABLE_NAME, opt(ALIAS)],
            seq![SUBQUERY, opt(ALIAS)],
            seq![UNNEST_EXPRESSION, opt(ALIAS), opt(WITH_OFFSET)],
        ],
    );
    g.node(
        TABLE_NAME,
        seq![
            "_identifier",
            opt(seq![DOT, "_identifier", opt(seq![DOT, "_identifier"])])
        ],
    );
    g.node(
        JOIN_EXPRESSION,
        seq![
            "_from_item",
            "_join_operator",
            "_table_primary",
            opt(choice![ON_CLAUSE, USING_CLAUSE])
        ],
    );
    g.hidden(
        "_join_operator",
        seq![
            opt(choice![
                INNER_KW,
                CROSS_KW,
                seq![choice![LEFT_KW, RIGHT_KW, FULL_KW], opt(OUTER_KW)],
            ]),
            JOIN_KW
        ],
    );
    g.node(ON_CLAUSE, seq![ON_KW, "_expression"]);
    g.node(
        USING_CLAUSE,
        seq![USING_KW, L_PAREN, comma_sep1("_identifier"), R_PAREN],
    );
    g.node(
        UNNEST_EXPRESSION,
        seq![UNNEST_KW, L_PAREN, "_expression", R_PAREN],
    );
    g.node(WITH_OFFSET, seq![WITH_KW, OFFSET_KW, opt(ALIAS)]);
}

fn clauses(g: &mut GrammarBuilder) {
    g.node(WHERE_CLAUSE, seq![WHERE_KW, "_expression"]);
    g.node(
        GROUP_BY_CLAUSE,
        seq![GROUP_KW, BY_KW, comma_sep1("_expression")],
    );
    g.node(HAVING_CLAUSE, seq![HAVING_KW, "_expression"]);
    g.node(QUALIFY_CLAUSE, seq![QUALIFY_KW, "_expression"]);
    g.node(ORDER_BY_CLAUSE, seq![ORDER_KW, BY_KW, comma_sep1(ORDER_ITEM)]);
    g.node(
        ORDER_ITEM,
        seq![
            "_expression",
            opt(choice![ASC_KW, DESC_KW]),
            opt(seq![NULLS_KW, choice![FIRST_KW, LAST_KW]])
        ],
    );
    g.node(
        LIMIT_CLAUSE,
        seq![LIMIT_KW, "_limit_value", opt(seq![OFFSET_KW, "_limit_value"])],
    );
    g.hidden("_limit_value", choice![NUMBER, PARAMETER, QUESTION]);
}

fn windows(g: &mut GrammarBuilder) {
    g.node(WINDOW_CLAUSE, seq![WINDOW_KW, comma_sep1(NAMED_WINDOW)]);
    g.node(
        NAMED_WINDOW,
        seq![
            "_identifier",
            AS_KW,
            choice![
                "_identifier",
                seq![L_PAREN, "_window_specification", R_PAREN]
            ]
        ],
    );
    g.node(
        OVER_CLAUSE,
        seq![
            OVER_KW,
            choice![
                "_identifier",
                seq![L_PAREN, "_window_specification", R_PAREN]
            ]
        ],
    );
    g.hidden(
        "_window_specification",
        seq![
            opt("_identifier"),
            opt(PARTITION_BY_CLAUSE),
            opt(ORDER_BY_CLAUSE),
            opt(FRAME_CLAUSE)
        ],
    );
    g.node(
        PARTITION_BY_CLAUSE,
        seq![PARTITION_KW, BY_KW, comma_sep1("_expression")],
    );
    g.node(
        FRAME_CLAUSE,
        seq![
            choice![ROWS_KW, RANGE_KW],
            choice![seq![BETWEEN_KW, FRAME_BOUND, AND_KW, FRAME_BOUND], FRAME_BOUND]
        ],
    );
    g.node(
        FRAME_BOUND,
        choice![
            seq![UNBOUNDED_KW, choice![PRECEDING_KW, FOLLOWING_KW]],
            seq![CURRENT_KW, ROW_KW],
            seq!["_expression", choice![PRECEDING_KW, FOLLOWING_KW]],
        ],
    );
}

fn expressions(g: &mut GrammarBuilder) {
    g.hidden(
        "_expression",
        choice![
            BINARY_EXPRESSION,
            UNARY_EXPRESSION,
            PARENTHESIZED_EXPRESSION,
            IN_EXPRESSION,
            BETWEEN_EXPRESSION,
            IS_EXPRESSION,
            EXISTS_EXPRESSION,
            CASE_EXPRESSION,
            CAST_EXPRESSION,
            EXTRACT_EXPRESSION,
            FUNCTION_CALL,
            WINDOW_FUNCTION,
            FIELD_ACCESS,
            SUBSCRIPT_EXPRESSION,
            SUBQUERY,
            ARRAY_LITERAL,
            ARRAY_SUBQUERY,
            STRUCT_LITERAL,
            TYPED_LITERAL,
            INTERVAL_LITERAL,
            BOOLEAN_LITERAL,
            "_identifier",
            NUMBER,
            STRING,
            BYTES,
            NULL_KW,
            PARAMETER,
            SYSTEM_VARIABLE,
            QUESTION,
        ],
    );
    g.hidden("_identifier", choice![IDENT, QUOTED_IDENT]);

    g.node(
        BINARY_EXPRESSION,
        choice![
            prec_left(prec::OR, seq!["_expression", OR_KW, "_expression"]),
            prec_left(prec::AND, seq!["_expression", AND_KW, "_expression"]),
            prec_left(
                prec::COMPARISON,
                seq![
                    "_expression",
                    choice![EQ, NEQ, LT, GT, LT_EQ, GT_EQ, LIKE_KW, seq![NOT_KW, LIKE_KW]],
                    "_expression"
                ],
            ),
            prec_left(prec::BIT_OR, seq!["_expression", PIPE, "_expression"]),
            prec_left(prec::BIT_XOR, seq!["_expression", CARET, "_expression"]),
            prec_left(prec::BIT_AND, seq!["_expression", AMP, "_expression"]),
            prec_left(prec::SHIFT, seq!["_expression", choice![SHL, SHR], "_expression"]),
            prec_left(
                prec::ADDITIVE,
                seq!["_expression", choice![PLUS, MINUS], "_expression"],
            ),
            prec_left(
                prec::MULTIPLICATIVE,
                seq!["_expression", choice![STAR, SLASH, PIPE_PIPE], "_expression"],
            ),
        ],
    );
    g.node(
        UNARY_EXPRESSION,
        choice![
            prec_right(prec::NOT, seq![NOT_KW, "_expression"]),
            prec_right(prec::UNARY, seq![choice![MINUS, PLUS, TILDE], "_expression"]),
        ],
    );
    g.node(
        PARENTHESIZED_EXPRESSION,
        seq![L_PAREN, "_expression", R_PAREN],
    );
    g.node(
        IN_EXPRESSION,
        prec_left(
            prec::COMPARISON,
            seq![
                "_expression",
                opt(NOT_KW),
                IN_KW,
                choice![
                    seq![L_PAREN, comma_sep1("_expression"), R_PAREN],
                    SUBQUERY,
                    UNNEST_EXPRESSION,
                ]
            ],
        ),
    );
    g.node(
        BETWEEN_EXPRESSION,
        prec_left(
            prec::COMPARISON,
            seq![
                "_expression",
                opt(NOT_KW),
                BETWEEN_KW,
                "_expression",
                AND_KW,
                "_expression"
            ],
        ),
    );
    g.node(
        IS_EXPRESSION,
        prec_left(
            prec::COMPARISON,
            seq![
                "_expression",
                IS_KW,
                opt(NOT_KW),
                choice![NULL_KW, TRUE_KW, FALSE_KW]
            ],
        ),
    );
    g.node(EXISTS_EXPRESSION, seq![EXISTS_KW, SUBQUERY]);
    g.node(
        CASE_EXPRESSION,
        seq![
            CASE_KW,
            opt("_expression"),
            repeat1(WHEN_CLAUSE),
            opt(ELSE_CLAUSE),
            END_KW
        ],
    );
    g.node(
        WHEN_CLAUSE,
        seq![WHEN_KW, "_expression", THEN_KW, "_expression"],
    );
    g.node(ELSE_CLAUSE, seq![ELSE_KW, "_expression"]);
    g.node(
        CAST_EXPRESSION,
        seq![
            choice![CAST_KW, SAFE_CAST_KW],
            L_PAREN,
            "_expression",
            AS_KW,
            TYPE,
            R_PAREN
        ],
    );
    g.node(
        EXTRACT_EXPRESSION,
        seq![
            EXTRACT_KW,
            L_PAREN,
            "_identifier",
            FROM_KW,
            "_expression",
            R_PAREN
        ],
    );

    g.node(
        FUNCTION_CALL,
        seq![
            choice!["_identifier", FIELD_ACCESS],
            L_PAREN,
            opt("_arguments"),
            R_PAREN
        ],
    );
    g.hidden(
        "_arguments",
        choice![
            STAR,
            seq![
                opt(DISTINCT_KW),
                comma_sep1("_expression"),
                opt(seq![choice![IGNORE_KW, RESPECT_KW], NULLS_KW]),
                opt(ORDER_BY_CLAUSE),
                opt(LIMIT_CLAUSE)
            ],
        ],
    );
    g.node(WINDOW_FUNCTION, seq![FUNCTION_CALL, OVER_CLAUSE]);
    g.node(
        FIELD_ACCESS,
        prec_left(prec::POSTFIX, seq!["_expression", DOT, "_identifier"]),
    );
    g.node(
        SUBSCRIPT_EXPRESSION,
        prec_left(
            prec::POSTFIX,
            seq!["_expression", L_BRACKET, "_expression", R_BRACKET],
        ),
    );

    g.node(
        ARRAY_LITERAL,
        seq![
            opt(seq![ARRAY_KW, opt(seq![LT, TYPE, GT])]),
            L_BRACKET,
            opt(comma_sep1("_expression")),
            R_BRACKET
        ],
    );
    g.node(ARRAY_SUBQUERY, seq![ARRAY_KW, SUBQUERY]);
    g.node(
        STRUCT_LITERAL,
        choice![
            seq![
                STRUCT_KW,
                opt(seq![LT, comma_sep1(STRUCT_TYPE_FIELD), GT]),
                L_PAREN,
                opt(comma_sep1("_struct_field")),
                R_PAREN
            ],
            seq![
                L_PAREN,
                "_expression",
                COMMA,
                comma_sep1("_expression"),
                R_PAREN
            ],
        ],
    );
    g.hidden("_struct_field", seq!["_expression", opt(ALIAS)]);
    g.node(
        TYPED_LITERAL,
        seq![
            choice![
                DATE_KW,
                DATETIME_KW,
                TIME_KW,
                TIMESTAMP_KW,
                NUMERIC_KW,
                BIGNUMERIC_KW,
                JSON_KW
            ],
            STRING
        ],
    );
    g.node(
        INTERVAL_LITERAL,
        seq![
            INTERVAL_KW,
            "_expression",
            "_identifier",
            opt(seq![TO_KW, "_identifier"])
        ],
    );
    g.node(BOOLEAN_LITERAL, choice![TRUE_KW, FALSE_KW]);
}

fn types(g: &mut GrammarBuilder) {
    g.node(
        TYPE,
        choice![
            seq![
                "_identifier",
                opt(seq![L_PAREN, comma_sep1(NUMBER), R_PAREN])
            ],
            seq![ARRAY_KW, LT, TYPE, GT],
            seq![STRUCT_KW, LT, comma_sep1(STRUCT_TYPE_FIELD), GT],
        ],
    );
    g.node(STRUCT_TYPE_FIELD, seq![opt("_identifier"), TYPE]);
}
