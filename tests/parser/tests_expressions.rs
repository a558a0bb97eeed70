//! Expression parser tests: operators, precedence and special forms

#![allow(clippy::unwrap_used)]

use bqsyntax::SyntaxKind;
use rstest::rstest;

use crate::helpers::{assert_parses, find};

/// Sexp of the single column expression of `SELECT <expr>`
fn column_sexp(expr: &str) -> String {
    let tree = assert_parses(&format!("SELECT {expr}"));
    let column = find(&tree, SyntaxKind::COLUMN).unwrap();
    column.named_child(0).unwrap().to_sexp()
}

#[rstest]
#[case("1 + 2 * 3")]
#[case("-a")]
#[case("NOT a AND b OR c")]
#[case("a || 'suffix'")]
#[case("a & 1 | b ^ 2")]
#[case("a << 2")]
#[case("a >> 1 + 2")]
#[case("1 << 2 & b")]
#[case("a IN (1, 2, 3)")]
#[case("a NOT IN (SELECT b FROM t)")]
#[case("a BETWEEN 1 AND 10")]
#[case("a IS NOT NULL")]
#[case("a LIKE 'x%'")]
#[case("a NOT LIKE 'x%'")]
#[case("EXISTS (SELECT 1)")]
#[case("CASE WHEN a > 1 THEN 'big' ELSE 'small' END")]
#[case("CASE a WHEN 1 THEN 'one' WHEN 2 THEN 'two' END")]
#[case("CAST(a AS INT64)")]
#[case("SAFE_CAST(a AS NUMERIC)")]
#[case("CAST(a AS ARRAY<STRING>)")]
#[case("CAST(a AS ARRAY<STRUCT<x INT64>>)")]
#[case("CAST(a AS ARRAY<STRUCT<x INT64>>) >> 1")]
#[case("ARRAY<STRUCT<x INT64, y STRING>>[]")]
#[case("EXTRACT(YEAR FROM ts)")]
#[case("COUNT(*)")]
#[case("COUNT(DISTINCT a)")]
#[case("ARRAY_AGG(a IGNORE NULLS ORDER BY b LIMIT 10)")]
#[case("ROW_NUMBER() OVER (PARTITION BY a ORDER BY b)")]
#[case("SUM(a) OVER (ORDER BY b ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW)")]
#[case("SUM(a) OVER w")]
#[case("t.a.b")]
#[case("arr[OFFSET(0)]")]
#[case("ARRAY[1, 2, 3]")]
#[case("ARRAY<INT64>[]")]
#[case("ARRAY(SELECT 1)")]
#[case("STRUCT(1 AS a, 'x' AS b)")]
#[case("STRUCT<a INT64, b STRING>(1, 'x')")]
#[case("(1, 'x')")]
#[case("DATE '2024-01-01'")]
#[case("TIMESTAMP '2024-01-01 00:00:00 UTC'")]
#[case("INTERVAL 1 DAY")]
#[case("TRUE AND FALSE")]
#[case("NULL")]
#[case("@param + ?")]
#[case("@@session.time_zone")]
#[case("b'bytes'")]
fn test_valid_expressions(#[case] expr: &str) {
    assert_parses(&format!("SELECT {expr}"));
}

#[test]
fn test_multiplication_binds_tighter() {
    assert_eq!(
        column_sexp("1 + 2 * 3"),
        "(binary_expression (number) (binary_expression (number) (number)))"
    );
}

#[test]
fn test_subtraction_is_left_associative() {
    assert_eq!(
        column_sexp("a - b - c"),
        "(binary_expression (binary_expression (ident) (ident)) (ident))"
    );
}

#[test]
fn test_and_binds_tighter_than_or() {
    assert_eq!(
        column_sexp("a OR b AND c"),
        "(binary_expression (ident) (binary_expression (ident) (ident)))"
    );
}

#[test]
fn test_shift_binds_between_bitwise_and_additive() {
    assert_eq!(
        column_sexp("a << 1 + 2"),
        "(binary_expression (ident) (binary_expression (number) (number)))"
    );
    assert_eq!(
        column_sexp("a & b >> 1"),
        "(binary_expression (ident) (binary_expression (ident) (number)))"
    );
    assert_eq!(
        column_sexp("a >> b << c"),
        "(binary_expression (binary_expression (ident) (ident)) (ident))"
    );
}

#[test]
fn test_nested_type_brackets_close_separately() {
    let tree = assert_parses("SELECT CAST(a AS ARRAY<STRUCT<x INT64>>)");
    let closers: Vec<_> = tree
        .walk()
        .filter(|node| node.kind() == SyntaxKind::GT)
        .collect();
    assert_eq!(closers.len(), 2);
    assert_eq!(closers[0].byte_range(), 37..38);
    assert_eq!(closers[1].byte_range(), 38..39);

    let inner = closers[0].parent().unwrap();
    let outer = closers[1].parent().unwrap();
    assert_eq!(inner.kind(), SyntaxKind::TYPE);
    assert_eq!(outer.kind(), SyntaxKind::TYPE);
    assert_eq!(inner.parent(), Some(outer));
}

#[test]
fn test_not_binds_looser_than_comparison() {
    assert_eq!(
        column_sexp("NOT a = b"),
        "(unary_expression (binary_expression (ident) (ident)))"
    );
}

#[test]
fn test_unary_minus_binds_tighter_than_multiplication() {
    assert_eq!(
        column_sexp("-a * b"),
        "(binary_expression (unary_expression (ident)) (ident))"
    );
}

#[test]
fn test_parentheses_override_precedence() {
    assert_eq!(
        column_sexp("(1 + 2) * 3"),
        "(binary_expression (parenthesized_expression (binary_expression (number) (number))) \
         (number))"
    );
}

#[test]
fn test_field_access_chain() {
    assert_eq!(
        column_sexp("a.b.c"),
        "(field_access (field_access (ident) (ident)) (ident))"
    );
}

#[test]
fn test_window_function() {
    let tree = assert_parses("SELECT RANK() OVER (PARTITION BY a ORDER BY b DESC) FROM t");
    let window = find(&tree, SyntaxKind::WINDOW_FUNCTION).unwrap();
    assert_eq!(window.named_child(0).unwrap().kind(), SyntaxKind::FUNCTION_CALL);
    let over = window.named_child(1).unwrap();
    assert_eq!(over.kind(), SyntaxKind::OVER_CLAUSE);
    assert!(find(&tree, SyntaxKind::PARTITION_BY_CLAUSE).is_some());
}

#[test]
fn test_typed_literal_and_date_column() {
    let tree = assert_parses("SELECT DATE '2024-01-01', date FROM t");
    let literal = find(&tree, SyntaxKind::TYPED_LITERAL).unwrap();
    assert_eq!(literal.text(), "DATE '2024-01-01'");
    let idents: Vec<String> = tree
        .walk()
        .filter(|node| node.kind() == SyntaxKind::IDENT)
        .map(|node| node.text())
        .collect();
    assert_eq!(idents, vec!["date", "t"]);
}
