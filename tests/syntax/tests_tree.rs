//! Tree inspection: cursors, walks, positions and changed ranges

#![allow(clippy::unwrap_used)]

use bqsyntax::{InputEdit, LineCol, Parser, SyntaxKind, TextRange, TextSize, language};

use crate::helpers::{assert_parses, find};

#[test]
fn test_cursor_visits_statement_children() {
    let tree = assert_parses("SELECT a FROM t WHERE b");
    let statement = tree.root_node().named_child(0).unwrap();
    let mut cursor = statement.cursor();

    assert!(cursor.goto_first_child());
    let mut kinds = vec![cursor.node().kind()];
    while cursor.goto_next_sibling() {
        kinds.push(cursor.node().kind());
    }
    let named: Vec<_> = kinds
        .into_iter()
        .filter(|kind| !kind.is_trivia())
        .collect();
    assert_eq!(
        named,
        vec![
            SyntaxKind::SELECT_CLAUSE,
            SyntaxKind::FROM_CLAUSE,
            SyntaxKind::WHERE_CLAUSE
        ]
    );

    assert!(cursor.goto_parent());
    assert_eq!(cursor.node(), statement);
    assert!(!cursor.goto_parent());
}

#[test]
fn test_goto_first_child_for_byte() {
    let tree = assert_parses("SELECT a FROM t WHERE b");
    let mut cursor = tree.root_node().named_child(0).unwrap().cursor();
    let index = cursor.goto_first_child_for_byte(10).unwrap();
    assert_eq!(cursor.node().kind(), SyntaxKind::FROM_CLAUSE);
    assert_eq!(cursor.node().byte_range(), 9..15);
    assert!(index > 0);
    assert!(cursor.goto_first_child_for_byte(100).is_none());
}

#[test]
fn test_walk_is_preorder_and_lossless() {
    let text = "SELECT a, b FROM t";
    let tree = assert_parses(text);
    let mut last_start = 0;
    for node in tree.walk() {
        assert!(node.start_byte() >= last_start);
        last_start = node.start_byte();
    }
    let first = tree.walk().next().unwrap();
    assert_eq!(first.kind(), SyntaxKind::SOURCE_FILE);
}

#[test]
fn test_positions_across_lines() {
    let text = "SELECT a\nFROM t\nWHERE b";
    let tree = assert_parses(text);
    let clause = find(&tree, SyntaxKind::WHERE_CLAUSE).unwrap();
    assert_eq!(clause.start_position(), LineCol::new(2, 0));
    assert_eq!(clause.end_position(), LineCol::new(2, 7));

    let index = tree.line_index();
    assert_eq!(index.line_col(TextSize::new(9)), LineCol::new(1, 0));
    assert_eq!(index.offset(LineCol::new(1, 5)), Some(TextSize::new(14)));
}

#[test]
fn test_descendant_for_byte_range_finds_smallest_node() {
    let tree = assert_parses("SELECT a FROM dataset.events");
    let root = tree.root_node();

    let ident = root.descendant_for_byte_range(22, 24).unwrap();
    assert_eq!(ident.kind(), SyntaxKind::IDENT);
    assert_eq!(ident.text(), "events");

    let table = root.descendant_for_byte_range(14, 28).unwrap();
    assert_eq!(table.kind(), SyntaxKind::TABLE_NAME);

    assert!(root.descendant_for_byte_range(10, 5).is_none());
    assert!(root.descendant_for_byte_range(0, 100).is_none());
}

#[test]
fn test_siblings_and_parent() {
    let tree = assert_parses("SELECT a FROM t");
    let from = find(&tree, SyntaxKind::FROM_CLAUSE).unwrap();
    let before = from.prev_sibling().unwrap();
    assert!(before.kind().is_trivia());
    assert_eq!(before.prev_sibling().unwrap().kind(), SyntaxKind::SELECT_CLAUSE);
    assert!(from.next_sibling().is_none());
    assert_eq!(from.parent().unwrap().kind(), SyntaxKind::STATEMENT);
}

#[test]
fn test_named_and_anonymous_nodes() {
    let tree = assert_parses("SELECT a FROM t");
    let from = find(&tree, SyntaxKind::FROM_CLAUSE).unwrap();
    let keyword = from.child(0).unwrap();
    assert_eq!(keyword.kind(), SyntaxKind::FROM_KW);
    assert!(!keyword.is_named());
    assert!(from.is_named());
    assert_eq!(from.named_child_count(), 1);
}

#[test]
fn test_changed_ranges_for_identifier_edit() {
    let old_text = "SELECT a FROM t WHERE x = 1";
    let old = language().parse(old_text);
    let (edit, new_text) = InputEdit::replace(old_text, 26..27, "42").unwrap();
    let new = Parser::new(language())
        .parse(&new_text, Some(&old), Some(&edit))
        .unwrap();

    assert_eq!(
        new.changed_ranges(&old),
        vec![TextRange::new(TextSize::new(26), TextSize::new(28))]
    );
}

#[test]
fn test_changed_ranges_for_added_clause() {
    let old = language().parse("SELECT a FROM t");
    let new = language().parse("SELECT a FROM t WHERE b");
    let ranges = new.changed_ranges(&old);
    assert_eq!(ranges.len(), 1);
    assert!(ranges[0].contains_range(TextRange::new(TextSize::new(16), TextSize::new(23))));
}

#[test]
fn test_parse_batch_keeps_order() {
    let texts = ["SELECT 1", "SELECT a FROM", "SELECT b FROM u"];
    let trees = language().parse_batch(&texts);
    assert_eq!(trees.len(), 3);
    for (tree, text) in trees.iter().zip(texts) {
        assert_eq!(tree.text(), text);
    }
    assert!(!trees[0].has_error());
    assert!(trees[1].has_error());
    assert!(!trees[2].has_error());
}

#[test]
fn test_symbol_table_lookup() {
    let lang = language();
    let id = lang.symbol_for_name("where_clause").unwrap();
    assert_eq!(lang.symbol_name(id), Some("where_clause"));
    assert_eq!(lang.symbol_for_name("WHERE_CLAUSE"), Some(id));
    assert!(lang.symbol_for_name("no_such_symbol").is_none());
    assert!(lang.symbol_count() > usize::from(id));
    assert!(lang.state_count() > 0);
}
