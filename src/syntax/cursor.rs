//! Stateful traversal without recursion

use std::iter::FusedIterator;

use super::node::Node;

/// A cursor confined to the subtree it was created on
#[derive(Debug, Clone)]
pub struct TreeCursor {
    root: Node,
    current: Node,
    depth: usize,
}

impl TreeCursor {
    pub fn new(root: Node) -> Self {
        Self {
            current: root.clone(),
            root,
            depth: 0,
        }
    }

    pub fn node(&self) -> Node {
        self.current.clone()
    }

    /// Levels below the node the cursor was created on
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn goto_first_child(&mut self) -> bool {
        match self.current.child(0) {
            Some(child) => {
                self.current = child;
                self.depth += 1;
                true
            }
            None => false,
        }
    }

    pub fn goto_next_sibling(&mut self) -> bool {
        if self.depth == 0 {
            return false;
        }
        match self.current.next_sibling() {
            Some(sibling) => {
                self.current = sibling;
                true
            }
            None => false,
        }
    }

    pub fn goto_prev_sibling(&mut self) -> bool {
        if self.depth == 0 {
            return false;
        }
        match self.current.prev_sibling() {
            Some(sibling) => {
                self.current = sibling;
                true
            }
            None => false,
        }
    }

    pub fn goto_parent(&mut self) -> bool {
        if self.depth == 0 {
            return false;
        }
        match self.current.parent() {
            Some(parent) => {
                self.current = parent;
                self.depth -= 1;
                true
            }
            None => false,
        }
    }

    /// Move to the first child that ends after `byte`, returning its index.
    pub fn goto_first_child_for_byte(&mut self, byte: usize) -> Option<usize> {
        let (index, child) = self
            .current
            .children()
            .enumerate()
            .find(|(_, child)| child.end_byte() > byte)?;
        self.current = child;
        self.depth += 1;
        Some(index)
    }

    /// Go back to the node the cursor was created on.
    pub fn reset(&mut self) {
        self.current = self.root.clone();
        self.depth = 0;
    }
}

/// Lazy pre-order walk over a node and all of its descendants
#[derive(Debug, Clone)]
pub struct Walk {
    cursor: TreeCursor,
    done: bool,
}

impl Walk {
    pub(crate) fn new(cursor: TreeCursor) -> Self {
        Self {
            cursor,
            done: false,
        }
    }

    /// Start over from the first node.
    pub fn restart(&mut self) {
        self.cursor.reset();
        self.done = false;
    }
}

impl Iterator for Walk {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        if self.done {
            return None;
        }
        let node = self.cursor.node();
        if !self.cursor.goto_first_child() {
            while !self.cursor.goto_next_sibling() {
                if !self.cursor.goto_parent() {
                    self.done = true;
                    break;
                }
            }
        }
        Some(node)
    }
}

impl FusedIterator for Walk {}
