//! Shared helpers for the integration tests

#![allow(dead_code)]

use bqsyntax::{Node, SyntaxKind, Tree, language};

/// Parse `text` and assert that the tree is error-free and lossless.
pub fn assert_parses(text: &str) -> Tree {
    let tree = language().parse(text);
    assert!(
        !tree.has_error(),
        "Failed to parse: {:?}\nInput: {}\nTree: {}",
        tree.errors(),
        text,
        tree.to_sexp()
    );
    assert_lossless(&tree, text);
    tree
}

/// Assert that the leaves of `tree` reproduce `text` byte for byte.
pub fn assert_lossless(tree: &Tree, text: &str) {
    let leaves: String = tree
        .walk()
        .filter(|node| node.child_count() == 0)
        .map(|node| node.text())
        .collect();
    assert_eq!(leaves, text, "leaves do not reproduce the input");
    assert_eq!(tree.root_node().byte_range(), 0..text.len());
}

/// First node of `kind` in pre-order
pub fn find(tree: &Tree, kind: SyntaxKind) -> Option<Node> {
    tree.walk().find(|node| node.kind() == kind)
}

/// Number of nodes of `kind`
pub fn count(tree: &Tree, kind: SyntaxKind) -> usize {
    tree.walk().filter(|node| node.kind() == kind).count()
}

/// Full debug rendering of the tree: kinds, ranges and token texts
pub fn dump(tree: &Tree) -> String {
    format!("{:#?}", tree.syntax())
}
