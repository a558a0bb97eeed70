//! Query-level parser tests: statements, clauses, set operations and joins

#![allow(clippy::unwrap_used)]

use bqsyntax::{SyntaxKind, language};
use rstest::rstest;

use crate::helpers::{assert_parses, count, find};

#[rstest]
#[case("SELECT 1")]
#[case("select a from t")]
#[case("SELECT a, b FROM t")]
#[case("SELECT * FROM `project.dataset.table`")]
#[case("SELECT * FROM project.dataset.table")]
#[case("SELECT DISTINCT a FROM t")]
#[case("SELECT AS STRUCT a, b FROM t")]
#[case("SELECT a AS x, b y FROM t AS u")]
#[case("SELECT a FROM t WHERE b = 1")]
#[case("SELECT a, COUNT(*) FROM t GROUP BY a HAVING COUNT(*) > 1")]
#[case("SELECT a FROM t ORDER BY a DESC, b ASC NULLS LAST")]
#[case("SELECT a FROM t LIMIT 10 OFFSET 5")]
#[case("SELECT a FROM t QUALIFY b > 0")]
#[case("WITH x AS (SELECT 1 AS a) SELECT a FROM x")]
#[case("WITH x AS (SELECT 1), y AS (SELECT 2) SELECT * FROM x, y")]
#[case("SELECT a FROM t UNION ALL SELECT b FROM u")]
#[case("SELECT a FROM t INTERSECT DISTINCT SELECT a FROM u")]
#[case("SELECT a FROM t EXCEPT DISTINCT SELECT a FROM u")]
#[case("SELECT a FROM t JOIN u ON t.id = u.id")]
#[case("SELECT a FROM t AS x LEFT OUTER JOIN u AS y ON x.id = y.id")]
#[case("SELECT a FROM t INNER JOIN u USING (id)")]
#[case("SELECT a FROM t CROSS JOIN u")]
#[case("SELECT a FROM (SELECT 1 AS a) AS sub")]
#[case("SELECT x FROM UNNEST([1, 2, 3]) AS x")]
#[case("SELECT a FROM t;")]
#[case("SELECT a FROM t; SELECT b FROM u")]
#[case("-- leading comment\nSELECT a /* inline */ FROM t # trailing")]
fn test_valid_queries(#[case] input: &str) {
    assert_parses(input);
}

#[test]
fn test_select_with_two_columns() {
    let tree = assert_parses("SELECT a, b FROM t");
    let root = tree.root_node();
    let statement = root.named_child(0).unwrap();
    assert_eq!(statement.kind(), SyntaxKind::STATEMENT);

    let select = statement.named_child(0).unwrap();
    assert_eq!(select.kind(), SyntaxKind::SELECT_CLAUSE);
    let columns: Vec<String> = select
        .named_children()
        .filter(|node| node.kind() == SyntaxKind::COLUMN)
        .map(|node| node.text())
        .collect();
    assert_eq!(columns, vec!["a", "b"]);

    let from = statement.named_child(1).unwrap();
    assert_eq!(from.kind(), SyntaxKind::FROM_CLAUSE);
    let table = from.named_child(0).unwrap();
    assert_eq!(table.kind(), SyntaxKind::TABLE_NAME);
    assert_eq!(table.text(), "t");
    assert_eq!(count(&tree, SyntaxKind::ERROR), 0);
    assert_eq!(count(&tree, SyntaxKind::MISSING), 0);
}

#[test]
fn test_empty_input() {
    let tree = language().parse("");
    let root = tree.root_node();
    assert_eq!(root.kind(), SyntaxKind::SOURCE_FILE);
    assert_eq!(root.child_count(), 0);
    assert_eq!(root.byte_range(), 0..0);
    assert!(!tree.has_error());
}

#[test]
fn test_whitespace_only_input() {
    let tree = assert_parses("  \n -- nothing here\n");
    assert_eq!(tree.root_node().named_child_count(), 0);
}

#[test]
fn test_statements_are_separated_by_semicolons() {
    let tree = assert_parses("SELECT 1; SELECT 2;; SELECT 3");
    assert_eq!(count(&tree, SyntaxKind::STATEMENT), 3);
    assert_eq!(count(&tree, SyntaxKind::SEMICOLON), 3);
}

#[test]
fn test_set_operation_is_left_associative() {
    let tree = assert_parses("SELECT 1 UNION ALL SELECT 2 UNION DISTINCT SELECT 3");
    let outer = find(&tree, SyntaxKind::SET_OPERATION).unwrap();
    let first = outer.named_child(0).unwrap();
    assert_eq!(first.kind(), SyntaxKind::SET_OPERATION);
    assert_eq!(first.text(), "SELECT 1 UNION ALL SELECT 2");
    assert_eq!(outer.named_child(1).unwrap().kind(), SyntaxKind::SELECT);
}

#[test]
fn test_with_clause_and_ctes() {
    let tree = assert_parses("WITH a AS (SELECT 1), b AS (SELECT 2) SELECT * FROM a");
    assert_eq!(count(&tree, SyntaxKind::CTE), 2);
    let with = find(&tree, SyntaxKind::WITH_CLAUSE).unwrap();
    assert_eq!(with.parent().unwrap().kind(), SyntaxKind::STATEMENT);
}

#[test]
fn test_join_nests_to_the_left() {
    let tree = assert_parses("SELECT * FROM a JOIN b ON a.x = b.x JOIN c ON b.y = c.y");
    let outer = find(&tree, SyntaxKind::JOIN_EXPRESSION).unwrap();
    let inner = outer.named_child(0).unwrap();
    assert_eq!(inner.kind(), SyntaxKind::JOIN_EXPRESSION);
    assert_eq!(count(&tree, SyntaxKind::ON_CLAUSE), 2);
}

#[test]
fn test_table_path() {
    let tree = assert_parses("SELECT * FROM project.dataset.events AS e");
    let table = find(&tree, SyntaxKind::TABLE_NAME).unwrap();
    assert_eq!(table.text(), "project.dataset.events");
    let alias = find(&tree, SyntaxKind::ALIAS).unwrap();
    assert_eq!(alias.text(), "AS e");
}

#[test]
fn test_non_reserved_keywords_as_names() {
    let tree = assert_parses("SELECT date, offset, value FROM first");
    let columns = count(&tree, SyntaxKind::COLUMN);
    assert_eq!(columns, 3);
    assert_eq!(find(&tree, SyntaxKind::TABLE_NAME).unwrap().text(), "first");
}

#[test]
fn test_sexp_of_simple_query() {
    let tree = assert_parses("SELECT a FROM t WHERE b");
    assert_eq!(
        tree.to_sexp(),
        "(source_file (statement (select_clause (column (ident))) \
         (from_clause (table_name (ident))) (where_clause (ident))))"
    );
}
