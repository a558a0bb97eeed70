//! Parse tables
//!
//! A [`ParseTable`] is the dense LALR(1) action/goto table for a [`Grammar`].
//! Action cells that precedence could not resolve keep every remaining
//! action; the engine forks on those at runtime.

mod lalr;

pub use lalr::TerminalSet;

use super::SyntaxKind;
use super::grammar::{Grammar, NonTerminal, ProductionId};
use super::syntax_kind::TERMINAL_COUNT;

pub type StateId = u32;

const NO_GOTO: StateId = StateId::MAX;

/// A parser action for a (state, lookahead) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Shift(StateId),
    Reduce(ProductionId),
    Accept,
}

/// Dense action and goto tables
#[derive(Debug)]
pub struct ParseTable {
    grammar: Grammar,
    state_count: usize,
    /// `(offset, len)` into `actions` for every `(state, terminal)`
    cells: Vec<(u32, u16)>,
    actions: Vec<Action>,
    gotos: Vec<StateId>,
    contexts: Vec<Option<SyntaxKind>>,
    conflicts: usize,
}

impl ParseTable {
    /// Build the LALR(1) table for `grammar`.
    pub fn build(grammar: Grammar) -> Self {
        let automaton = lalr::build(&grammar);

        let mut cells = Vec::with_capacity(automaton.cells.len());
        let mut actions = Vec::new();
        for cell in automaton.cells {
            cells.push((actions.len() as u32, cell.len() as u16));
            actions.extend(cell);
        }

        tracing::debug!(
            states = automaton.state_count,
            actions = actions.len(),
            conflicts = automaton.conflicts,
            "built parse table"
        );

        Self {
            grammar,
            state_count: automaton.state_count,
            cells,
            actions,
            gotos: automaton.gotos,
            contexts: automaton.contexts,
            conflicts: automaton.conflicts,
        }
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn state_count(&self) -> usize {
        self.state_count
    }

    /// Number of action cells left with more than one action
    pub fn conflict_count(&self) -> usize {
        self.conflicts
    }

    /// Actions for `state` on `terminal`, shift first
    pub fn actions(&self, state: StateId, terminal: SyntaxKind) -> &[Action] {
        if !terminal.is_token() || state as usize >= self.state_count {
            return &[];
        }
        let (offset, len) = self.cells[state as usize * TERMINAL_COUNT + terminal as usize];
        &self.actions[offset as usize..offset as usize + len as usize]
    }

    pub fn has_action(&self, state: StateId, terminal: SyntaxKind) -> bool {
        !self.actions(state, terminal).is_empty()
    }

    /// Target of the goto on `nonterminal` from `state`
    pub fn goto(&self, state: StateId, nonterminal: NonTerminal) -> Option<StateId> {
        let index = state as usize * self.grammar.nonterminal_count() + nonterminal as usize;
        self.gotos
            .get(index)
            .copied()
            .filter(|&target| target != NO_GOTO)
    }

    /// Goto target for reusing a node of `kind` in `state`
    pub fn goto_kind(&self, state: StateId, kind: SyntaxKind) -> Option<StateId> {
        self.goto(state, self.grammar.nonterminal_for_kind(kind)?)
    }

    /// Innermost visible construct the state is in the middle of
    pub fn state_context(&self, state: StateId) -> Option<SyntaxKind> {
        self.contexts.get(state as usize).copied().flatten()
    }

    /// Terminals with at least one action in `state`
    pub fn expected(&self, state: StateId) -> impl Iterator<Item = SyntaxKind> + '_ {
        (0..TERMINAL_COUNT as u16)
            .filter_map(SyntaxKind::from_raw)
            .filter(move |&kind| self.has_action(state, kind))
    }
}
