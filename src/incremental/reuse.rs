//! Lookup of old subtrees the parser may take over

use rowan::{GreenNode, TextSize};

use super::InputEdit;
use crate::parser::table::{ParseTable, StateId};
use crate::parser::{NodeInfo, NodeInfoMap, SyntaxKind, SyntaxNode, green_id};

/// An old subtree that fits the parser's current position and state
#[derive(Debug, Clone)]
pub(crate) struct Reusable {
    pub green: GreenNode,
    pub kind: SyntaxKind,
    pub len: TextSize,
    pub info: NodeInfo,
    /// Infos of the nodes inside `green`, which keep their identity
    pub nested: Vec<(usize, NodeInfo)>,
}

/// The previous tree together with the edit applied since
pub(crate) struct Reuse<'o> {
    root: SyntaxNode,
    info: &'o NodeInfoMap,
    edit: &'o InputEdit,
}

impl<'o> Reuse<'o> {
    pub fn new(root: GreenNode, info: &'o NodeInfoMap, edit: &'o InputEdit) -> Self {
        Self {
            root: SyntaxNode::new_root(root),
            info,
            edit,
        }
    }

    /// Offset in the old text of the byte at `offset` in the new text.
    ///
    /// `None` inside the replaced range.
    pub fn old_offset(&self, offset: TextSize) -> Option<TextSize> {
        let offset = usize::from(offset);
        let old = if offset < self.edit.start_byte {
            offset
        } else if offset >= self.edit.new_end_byte {
            offset - self.edit.new_end_byte + self.edit.old_end_byte
        } else {
            return None;
        };
        Some(TextSize::new(old as u32))
    }

    /// The outermost old node starting at `position` that can be pushed in `state`.
    pub fn find(&self, position: TextSize, state: StateId, table: &ParseTable) -> Option<Reusable> {
        let old = self.old_offset(position)?;
        let token = self.root.token_at_offset(old).right_biased()?;
        if token.text_range().start() != old {
            return None;
        }
        let candidates: Vec<SyntaxNode> = token
            .parent_ancestors()
            .take_while(|node| node.parent().is_some() && node.text_range().start() == old)
            .collect();
        candidates
            .iter()
            .rev()
            .find_map(|node| self.check(node, state, table))
    }

    fn check(&self, node: &SyntaxNode, state: StateId, table: &ParseTable) -> Option<Reusable> {
        let kind = node.kind();
        let range = node.text_range();
        if kind.is_error_or_missing() || range.is_empty() {
            return None;
        }
        let green = node.green().into_owned();
        let info = *self.info.get(&green_id(&green))?;
        if !info.reusable || info.state != state {
            return None;
        }
        table.goto_kind(state, kind)?;

        let start = usize::from(range.start());
        let before = start + usize::from(info.lookahead) <= self.edit.start_byte;
        let after = start >= self.edit.old_end_byte;
        if !(before || after) {
            return None;
        }

        let nested = node
            .descendants()
            .skip(1)
            .filter_map(|inner| {
                let id = green_id(&inner.green());
                self.info.get(&id).map(|&info| (id, info))
            })
            .collect();
        Some(Reusable {
            green,
            kind,
            len: range.len(),
            info,
            nested,
        })
    }
}
