//! Property-based tests: totality, determinism and incremental equivalence

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::ops::Range;

use bqsyntax::{InputEdit, NodeId, Parser, SyntaxKind, Tree, language};
use proptest::prelude::*;

use crate::helpers::{dump, find};

/// Pieces that combine into plausible, and often broken, queries
const FRAGMENTS: &[&str] = &[
    "SELECT", "a", "b", "t.c", ",", "FROM", "t", "u", "WHERE", "=", "<", "1", "2.5", "'s'",
    "(", ")", "+", "*", "AND", "OR", "NOT", ";", "JOIN", "ON", "AS", "GROUP BY", "ORDER BY",
    "LIMIT", "UNION ALL", "WITH", "CASE", "WHEN", "THEN", "END", "[", "]", "--c\n", "/* x */",
    "`q`", "DATE", "$",
];

fn fragment_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(FRAGMENTS)
}

fn query_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment_strategy(), 0..24).prop_map(|parts| parts.join(" "))
}

/// A query followed by an edit inside it: start, deleted length and inserted text
fn edited_query_strategy() -> impl Strategy<Value = (String, usize, usize, String)> {
    (
        query_strategy(),
        any::<usize>(),
        any::<usize>(),
        prop::collection::vec(fragment_strategy(), 0..3),
    )
        .prop_map(|(text, start, len, inserted)| {
            let start = start % (text.len() + 1);
            let len = len % (text.len() - start + 1);
            (text, start, len, inserted.join(" "))
        })
}

/// Edits as seeds, resolved against whatever text they end up applying to
fn edit_seeds_strategy() -> impl Strategy<Value = Vec<(usize, usize, String)>> {
    let inserted =
        prop::collection::vec(fragment_strategy(), 0..3).prop_map(|parts| parts.join(" "));
    prop::collection::vec((any::<usize>(), any::<usize>(), inserted), 2..=3)
}

/// Column names that are never keywords
const COLUMNS: &[&str] = &["a", "b", "c1", "col", "x_y"];

fn column_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(COLUMNS)
}

/// Kind and range of every composite node, by identity
fn nodes_by_id(tree: &Tree) -> HashMap<NodeId, (SyntaxKind, Range<usize>)> {
    tree.walk()
        .filter(|node| node.kind().is_node())
        .map(|node| (node.id(), (node.kind(), node.byte_range())))
        .collect()
}

/// Apply one seeded edit to `tree` incrementally, checking it against a full parse.
fn apply_seed(
    tree: &Tree,
    (start, len, inserted): (usize, usize, String),
) -> Result<Tree, TestCaseError> {
    let text = tree.text();
    let start = start % (text.len() + 1);
    let len = len % (text.len() - start + 1);
    let (edit, new_text) = InputEdit::replace(text, start..start + len, &inserted)
        .map_err(|err| TestCaseError::fail(err.to_string()))?;
    let next = Parser::new(language())
        .parse(&new_text, Some(tree), Some(&edit))
        .map_err(|err| TestCaseError::fail(err.to_string()))?;
    prop_assert_eq!(dump(&next), dump(&language().parse(&new_text)));

    // Shared nodes come from outside the edit and only move by its delta.
    let old = nodes_by_id(tree);
    let mut shared = 0;
    for (id, (kind, range)) in nodes_by_id(&next) {
        let Some((old_kind, old_range)) = old.get(&id) else {
            continue;
        };
        shared += 1;
        prop_assert_eq!(kind, *old_kind);
        let before = range.end <= edit.start_byte && range == *old_range;
        let after = range.start >= edit.new_end_byte
            && range.start - edit.new_end_byte + edit.old_end_byte == old_range.start
            && range.len() == old_range.len();
        prop_assert!(before || after, "{:?} moved from {:?} to {:?}", kind, old_range, range);
    }
    prop_assert_eq!(shared > 0, next.reused_count() > 0);
    Ok(next)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_parse_is_total_and_lossless(text in "[ -~\n\t]{0,64}") {
        let tree = language().parse(&text);
        let leaves: String = tree
            .walk()
            .filter(|node| node.child_count() == 0)
            .map(|node| node.text())
            .collect();
        prop_assert_eq!(leaves, text.clone());
        prop_assert_eq!(tree.root_node().byte_range(), 0..text.len());
    }

    #[test]
    fn prop_parse_is_deterministic(text in query_strategy()) {
        let first = language().parse(&text);
        let second = language().parse(&text);
        prop_assert_eq!(dump(&first), dump(&second));
        prop_assert_eq!(first.errors(), second.errors());
    }

    #[test]
    fn prop_error_flag_matches_diagnostics(text in query_strategy()) {
        let tree = language().parse(&text);
        let flagged = tree.walk().any(|node| node.is_error() || node.is_missing());
        if flagged {
            prop_assert!(tree.has_error());
        }
    }

    #[test]
    fn prop_incremental_matches_full_parse(
        (text, start, len, inserted) in edited_query_strategy()
    ) {
        let old = language().parse(&text);
        let (edit, new_text) = InputEdit::replace(&text, start..start + len, &inserted)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        let incremental = Parser::new(language())
            .parse(&new_text, Some(&old), Some(&edit))
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        let full = language().parse(&new_text);
        prop_assert_eq!(dump(&incremental), dump(&full));
    }

    #[test]
    fn prop_chained_edits_match_full_parse(
        text in query_strategy(),
        seeds in edit_seeds_strategy(),
    ) {
        let mut tree = language().parse(&text);
        for seed in seeds {
            tree = apply_seed(&tree, seed)?;
        }
    }

    #[test]
    fn prop_clause_survives_chained_insertions(
        columns in prop::collection::vec(column_strategy(), 1..4),
        added in prop::collection::vec(column_strategy(), 2..=3),
    ) {
        let text = format!("SELECT {} FROM t WHERE x = 1", columns.join(", "));
        let mut tree = language().parse(&text);
        let from = find(&tree, SyntaxKind::FROM_CLAUSE).unwrap().id();
        for column in added {
            let at = tree.text().find(" FROM").unwrap();
            let (edit, new_text) =
                InputEdit::replace(tree.text(), at..at, &format!(", {column}")).unwrap();
            tree = Parser::new(language())
                .parse(&new_text, Some(&tree), Some(&edit))
                .unwrap();
            prop_assert!(!tree.has_error());
            prop_assert_eq!(find(&tree, SyntaxKind::FROM_CLAUSE).unwrap().id(), from);
        }
    }
}
