//! Read-only view of one element of a tree

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Range;
use std::sync::Arc;

use rowan::{NodeOrToken, TextRange, TextSize};

use super::cursor::{TreeCursor, Walk};
use crate::base::{LineCol, LineIndex};
use crate::parser::{SyntaxElement, SyntaxKind, SyntaxNode, green_id};

/// Identity of a node, stable across incremental reparses that reuse it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

/// A node or token of a [`Tree`](super::Tree).
///
/// Every element is a node here, as in tree-sitter: tokens are leaves with
/// no children. Children include trivia, so the children of a node always
/// cover it without gaps.
#[derive(Clone)]
pub struct Node {
    element: SyntaxElement,
    lines: Arc<LineIndex>,
}

impl Node {
    pub(crate) fn new(element: SyntaxElement, lines: Arc<LineIndex>) -> Self {
        Self { element, lines }
    }

    fn wrap(&self, element: SyntaxElement) -> Self {
        Self::new(element, self.lines.clone())
    }

    pub fn kind(&self) -> SyntaxKind {
        self.element.kind()
    }

    /// Numeric symbol id, as used by [`Language::symbol_name`](crate::Language::symbol_name)
    pub fn kind_id(&self) -> u16 {
        self.kind() as u16
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind().name()
    }

    /// Composite nodes and literal tokens are named; keywords, punctuation
    /// and trivia are not.
    pub fn is_named(&self) -> bool {
        let kind = self.kind();
        kind.is_node() || kind.is_literal()
    }

    /// Whitespace or a comment
    pub fn is_extra(&self) -> bool {
        self.kind().is_trivia()
    }

    pub fn is_error(&self) -> bool {
        self.kind() == SyntaxKind::ERROR
    }

    pub fn is_missing(&self) -> bool {
        self.kind() == SyntaxKind::MISSING
    }

    /// Whether this node is, or contains, an `ERROR` or `MISSING` node
    pub fn has_error(&self) -> bool {
        match &self.element {
            NodeOrToken::Node(node) => {
                node.kind().is_error_or_missing()
                    || node
                        .descendants()
                        .any(|inner| inner.kind().is_error_or_missing())
            }
            NodeOrToken::Token(_) => false,
        }
    }

    pub fn text_range(&self) -> TextRange {
        self.element.text_range()
    }

    pub fn byte_range(&self) -> Range<usize> {
        let range = self.text_range();
        range.start().into()..range.end().into()
    }

    pub fn start_byte(&self) -> usize {
        self.text_range().start().into()
    }

    pub fn end_byte(&self) -> usize {
        self.text_range().end().into()
    }

    pub fn start_position(&self) -> LineCol {
        self.lines.line_col(self.text_range().start())
    }

    pub fn end_position(&self) -> LineCol {
        self.lines.line_col(self.text_range().end())
    }

    /// Source text covered by this node
    pub fn text(&self) -> String {
        match &self.element {
            NodeOrToken::Node(node) => node.text().to_string(),
            NodeOrToken::Token(token) => token.text().to_string(),
        }
    }

    pub fn id(&self) -> NodeId {
        match &self.element {
            NodeOrToken::Node(node) => NodeId(green_id(&node.green())),
            NodeOrToken::Token(token) => NodeId(std::ptr::from_ref(token.green()) as usize),
        }
    }

    /// Key of this node in node info maps
    pub(crate) fn green_id(&self) -> usize {
        self.id().0
    }

    fn as_node(&self) -> Option<&SyntaxNode> {
        self.element.as_node()
    }

    pub fn child_count(&self) -> usize {
        self.as_node()
            .map_or(0, |node| node.children_with_tokens().count())
    }

    pub fn child(&self, index: usize) -> Option<Node> {
        self.as_node()?
            .children_with_tokens()
            .nth(index)
            .map(|element| self.wrap(element))
    }

    pub fn children(&self) -> impl Iterator<Item = Node> + '_ {
        self.as_node()
            .into_iter()
            .flat_map(|node| node.children_with_tokens())
            .map(|element| self.wrap(element))
    }

    pub fn named_children(&self) -> impl Iterator<Item = Node> + '_ {
        self.children().filter(Node::is_named)
    }

    pub fn named_child(&self, index: usize) -> Option<Node> {
        self.named_children().nth(index)
    }

    pub fn named_child_count(&self) -> usize {
        self.named_children().count()
    }

    pub fn parent(&self) -> Option<Node> {
        self.element
            .parent()
            .map(|parent| self.wrap(parent.into()))
    }

    pub fn next_sibling(&self) -> Option<Node> {
        self.element
            .next_sibling_or_token()
            .map(|element| self.wrap(element))
    }

    pub fn prev_sibling(&self) -> Option<Node> {
        self.element
            .prev_sibling_or_token()
            .map(|element| self.wrap(element))
    }

    /// Smallest node or token that covers `start..end`.
    ///
    /// `None` when the range is inverted or not inside this node.
    pub fn descendant_for_byte_range(&self, start: usize, end: usize) -> Option<Node> {
        if start > end {
            return None;
        }
        let range = TextRange::new(
            TextSize::try_from(start).ok()?,
            TextSize::try_from(end).ok()?,
        );
        if !self.text_range().contains_range(range) {
            return None;
        }
        match &self.element {
            NodeOrToken::Node(node) => Some(self.wrap(node.covering_element(range))),
            NodeOrToken::Token(_) => Some(self.clone()),
        }
    }

    pub fn walk(&self) -> Walk {
        Walk::new(self.cursor())
    }

    pub fn cursor(&self) -> TreeCursor {
        TreeCursor::new(self.clone())
    }

    /// S-expression of the named structure, e.g.
    /// `(statement (select_clause (column (ident))))`
    pub fn to_sexp(&self) -> String {
        let mut out = String::new();
        write_sexp(self, &mut out);
        out
    }
}

fn write_sexp(node: &Node, out: &mut String) {
    if node.is_missing() {
        let missing = node
            .child(0)
            .map_or("", |token| token.kind_name());
        out.push_str("(MISSING ");
        out.push_str(missing);
        out.push(')');
        return;
    }
    out.push('(');
    out.push_str(if node.is_error() { "ERROR" } else { node.kind_name() });
    for child in node.children() {
        if child.is_named() || (node.is_error() && !child.is_extra()) {
            out.push(' ');
            write_sexp(&child, out);
        }
    }
    out.push(')');
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.element == other.element
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.element.hash(state);
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:?}", self.kind_name(), self.text_range())
    }
}
