//! Parsed trees
//!
//! A [`Tree`] owns the green tree of one parse together with the source text
//! and the diagnostics. It is immutable, cheap to clone and can be shared
//! between threads; [`Node`] views are created on demand from it.

use std::sync::Arc;

use rowan::{GreenNode, NodeOrToken, TextRange};

use super::node::Node;
use crate::base::LineIndex;
use crate::parser::{NodeInfoMap, Parse, SyntaxElement, SyntaxError, SyntaxNode, green_id};

/// The result of parsing one text
#[derive(Debug, Clone)]
pub struct Tree {
    green: GreenNode,
    text: Arc<str>,
    lines: Arc<LineIndex>,
    errors: Arc<[SyntaxError]>,
    node_info: Arc<NodeInfoMap>,
    reused: usize,
}

impl Tree {
    pub(crate) fn new(parse: Parse, text: &str, lines: LineIndex) -> Self {
        Self {
            green: parse.green,
            text: Arc::from(text),
            lines: Arc::new(lines),
            errors: parse.errors.into(),
            node_info: Arc::new(parse.node_info),
            reused: parse.reused,
        }
    }

    pub fn root_node(&self) -> Node {
        Node::new(self.syntax().into(), self.lines.clone())
    }

    /// The rowan root, for callers that want the raw CST
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.lines
    }

    /// Diagnostics recorded while parsing
    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    /// Whether parsing reported any syntax error
    pub fn has_error(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Number of subtrees taken over from the previous tree
    pub fn reused_count(&self) -> usize {
        self.reused
    }

    pub(crate) fn node_info(&self) -> &NodeInfoMap {
        &self.node_info
    }

    pub fn walk(&self) -> super::Walk {
        self.root_node().walk()
    }

    pub fn to_sexp(&self) -> String {
        self.root_node().to_sexp()
    }

    /// Ranges of this tree whose structure or text differs from `old`.
    ///
    /// Subtrees that are equal in both trees are skipped, wherever they
    /// ended up; the result is sorted and free of overlaps.
    pub fn changed_ranges(&self, old: &Tree) -> Vec<TextRange> {
        let mut ranges = Vec::new();
        diff(&old.syntax(), &self.syntax(), &mut ranges);
        ranges.sort_by_key(|range| (range.start(), range.end()));

        let mut merged: Vec<TextRange> = Vec::with_capacity(ranges.len());
        for range in ranges {
            match merged.last_mut() {
                Some(last) if range.start() <= last.end() => *last = last.cover(range),
                _ => merged.push(range),
            }
        }
        merged
    }
}

fn diff(old: &SyntaxNode, new: &SyntaxNode, out: &mut Vec<TextRange>) {
    if old.kind() != new.kind() {
        out.push(new.text_range());
        return;
    }
    let old_children: Vec<SyntaxElement> = old.children_with_tokens().collect();
    let new_children: Vec<SyntaxElement> = new.children_with_tokens().collect();

    let prefix = old_children
        .iter()
        .zip(&new_children)
        .take_while(|(a, b)| same(a, b))
        .count();
    let suffix = old_children[prefix..]
        .iter()
        .rev()
        .zip(new_children[prefix..].iter().rev())
        .take_while(|(a, b)| same(a, b))
        .count();
    let old_changed = &old_children[prefix..old_children.len() - suffix];
    let new_changed = &new_children[prefix..new_children.len() - suffix];

    match (old_changed, new_changed) {
        ([], []) => {}
        ([NodeOrToken::Node(a)], [NodeOrToken::Node(b)]) if a.kind() == b.kind() => {
            diff(a, b, out);
        }
        (_, [first, .., last]) => out.push(first.text_range().cover(last.text_range())),
        (_, [only]) => out.push(only.text_range()),
        (_, []) => {
            // Only removals: mark the point where the old children were.
            let at = new_children
                .get(prefix)
                .map_or(new.text_range().end(), |next| next.text_range().start());
            out.push(TextRange::empty(at));
        }
    }
}

/// Structural equality, short-cut by green identity
fn same(a: &SyntaxElement, b: &SyntaxElement) -> bool {
    match (a, b) {
        (NodeOrToken::Token(a), NodeOrToken::Token(b)) => {
            a.kind() == b.kind() && a.text() == b.text()
        }
        (NodeOrToken::Node(a), NodeOrToken::Node(b)) => {
            if green_id(&a.green()) == green_id(&b.green()) {
                return true;
            }
            a.kind() == b.kind()
                && a.text_range().len() == b.text_range().len()
                && a.children_with_tokens().count() == b.children_with_tokens().count()
                && a
                    .children_with_tokens()
                    .zip(b.children_with_tokens())
                    .all(|(x, y)| same(&x, &y))
        }
        _ => false,
    }
}
