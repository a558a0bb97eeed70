//! Error recovery: missing-token insertion and skipping into ERROR nodes

#![allow(clippy::unwrap_used)]

use bqsyntax::{ErrorCode, SyntaxKind, TextRange, TextSize, language};
use rstest::rstest;

use crate::helpers::{assert_lossless, count, find};

#[test]
fn test_missing_table_name() {
    let tree = language().parse("SELECT a FROM");
    assert!(tree.has_error());
    assert_lossless(&tree, "SELECT a FROM");

    let from = find(&tree, SyntaxKind::FROM_CLAUSE).unwrap();
    let missing = from.walk().find(|node| node.is_missing()).unwrap();
    assert_eq!(missing.child(0).unwrap().kind(), SyntaxKind::IDENT);
    assert_eq!(missing.byte_range(), 13..13);

    let select = find(&tree, SyntaxKind::SELECT_CLAUSE).unwrap();
    assert!(!select.has_error());

    assert_eq!(tree.errors().len(), 1);
    assert_eq!(tree.errors()[0].code, ErrorCode::E0301);
}

#[test]
fn test_missing_closing_paren() {
    let tree = language().parse("SELECT (1 + 2");
    assert_lossless(&tree, "SELECT (1 + 2");
    let missing = find(&tree, SyntaxKind::MISSING).unwrap();
    assert_eq!(missing.child(0).unwrap().kind(), SyntaxKind::R_PAREN);
    assert_eq!(
        missing.parent().unwrap().kind(),
        SyntaxKind::PARENTHESIZED_EXPRESSION
    );
    assert_eq!(tree.errors()[0].code, ErrorCode::E0202);
}

#[test]
fn test_missing_closer_points_at_opener() {
    let tree = language().parse("SELECT f(a, (1 + 2)");
    let error = &tree.errors()[0];
    assert_eq!(error.code, ErrorCode::E0202);
    assert_eq!(error.related.len(), 1);
    assert_eq!(error.related[0].message, "'(' opened here");
    assert_eq!(
        error.related[0].range,
        TextRange::new(TextSize::new(8), TextSize::new(9))
    );

    let tree = language().parse("SELECT a FROM t WHERE b");
    assert!(tree.errors().is_empty());
    let tree = language().parse("SELECT a FROM");
    assert!(tree.errors()[0].related.is_empty());
}

#[test]
fn test_missing_where_condition() {
    let tree = language().parse("SELECT a FROM t WHERE");
    let clause = find(&tree, SyntaxKind::WHERE_CLAUSE).unwrap();
    assert!(clause.has_error());
    assert_eq!(count(&tree, SyntaxKind::ERROR), 0);
    assert!(!find(&tree, SyntaxKind::FROM_CLAUSE).unwrap().has_error());
}

#[test]
fn test_invalid_character_is_skipped() {
    let text = "SELECT a FROM t $ WHERE b";
    let tree = language().parse(text);
    assert_lossless(&tree, text);

    let error = find(&tree, SyntaxKind::ERROR).unwrap();
    assert_eq!(error.text(), "$");
    assert_eq!(tree.errors()[0].code, ErrorCode::E0101);
    assert_eq!(tree.errors()[0].range, error.text_range());

    let clause = find(&tree, SyntaxKind::WHERE_CLAUSE).unwrap();
    assert!(!clause.has_error());
}

#[test]
fn test_unterminated_string() {
    let text = "SELECT 'abc";
    let tree = language().parse(text);
    assert_lossless(&tree, text);
    assert!(tree.has_error());
    assert!(count(&tree, SyntaxKind::ERROR) >= 1);
    assert_eq!(tree.errors()[0].code, ErrorCode::E0102);
}

#[test]
fn test_recovery_continues_with_next_statement() {
    let text = "SELECT FROM WHERE; SELECT b FROM u";
    let tree = language().parse(text);
    assert_lossless(&tree, text);
    assert!(tree.has_error());

    let last = tree
        .root_node()
        .named_children()
        .filter(|node| node.kind() == SyntaxKind::STATEMENT)
        .last()
        .unwrap();
    assert_eq!(last.text(), "SELECT b FROM u");
    assert!(!last.has_error());
}

#[rstest]
#[case("SELECT")]
#[case("FROM t")]
#[case(")))")]
#[case("SELECT a,, b FROM t")]
#[case("SELECT a FROM t WHERE (a = 1")]
#[case("SELECT CASE WHEN a THEN b")]
#[case("SELECT * FROM t JOIN")]
#[case("WITH x AS SELECT 1")]
#[case("SELECT a FROM t GROUP a")]
#[case("SELECT 1 UNION SELECT 2")]
#[case("SELECT `unterminated FROM t")]
#[case("SELECT /* open comment")]
#[case("'''")]
fn test_broken_input_still_yields_total_tree(#[case] text: &str) {
    let tree = language().parse(text);
    assert_lossless(&tree, text);
    assert!(tree.has_error(), "{}", tree.to_sexp());
    assert_eq!(tree.root_node().byte_range(), 0..text.len());
}

#[test]
fn test_every_diagnostic_has_a_message_and_code() {
    let tree = language().parse("SELECT a FROM t WHERE AND ) ; SELECT (");
    assert!(!tree.errors().is_empty());
    for error in tree.errors() {
        assert!(!error.message.is_empty());
        assert!(error.code.as_str().starts_with('E'));
        assert!(usize::from(error.range.end()) <= tree.text().len());
    }
}
