//! Table-driven shift-reduce parser for BigQuery
//!
//! Builds a rowan GreenNode tree from tokens.
//! Ambiguous cells are decided by simulating every candidate over a bounded
//! window of upcoming tokens; failures are handed to error recovery, so the
//! result is always a lossless CST.

use rowan::{GreenNode, GreenNodeData, GreenToken, NodeOrToken, TextSize};
use rustc_hash::FxHashMap;

use super::input::TokenSource;
use super::grammar::ProductionId;
use super::table::{Action, ParseTable, StateId};
use super::{ParseOptions, SyntaxError, SyntaxKind};
use crate::base::LineIndex;
use crate::incremental::Reuse;

pub(crate) type GreenElement = NodeOrToken<GreenNode, GreenToken>;

/// How a node was built, recorded for incremental reuse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeInfo {
    /// State on top of the stack when the node's first token was shifted
    pub state: StateId,
    /// Bytes from the node start up to the furthest byte examined while building it
    pub lookahead: TextSize,
    /// Free of errors and of decisions taken by the ambiguity search
    pub reusable: bool,
}

/// Node infos keyed by green node identity
pub type NodeInfoMap = FxHashMap<usize, NodeInfo>;

/// Identity of a green node: the address of its shared data
pub(crate) fn green_id(node: &GreenNodeData) -> usize {
    node as *const GreenNodeData as usize
}

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
    pub(crate) node_info: NodeInfoMap,
    /// Subtrees taken over from the previous tree
    pub reused: usize,
    /// Work spent simulating ahead of the parse
    pub(crate) search_work: usize,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A stack slot: the automaton state and the elements built so far
#[derive(Debug, Clone)]
pub(crate) struct StackEntry {
    pub state: StateId,
    /// Trivia in front of the first element
    pub leading: Vec<GreenElement>,
    pub elements: Vec<GreenElement>,
    pub start: TextSize,
    pub end: TextSize,
    pub fragile: bool,
    pub has_error: bool,
    /// ERROR entries sit between grammar symbols and are not counted by reductions
    pub extra: bool,
}

impl StackEntry {
    fn bottom() -> Self {
        Self {
            state: 0,
            leading: Vec::new(),
            elements: Vec::new(),
            start: TextSize::new(0),
            end: TextSize::new(0),
            fragile: false,
            has_error: false,
            extra: false,
        }
    }

    /// Concatenate `children`, keeping leading trivia outside of the result.
    pub fn from_children(state: StateId, children: Vec<StackEntry>, at: TextSize) -> Self {
        let mut entry = Self {
            state,
            start: at,
            end: at,
            ..Self::bottom()
        };
        for child in children {
            entry.fragile |= child.fragile;
            entry.has_error |= child.has_error;
            if entry.elements.is_empty() {
                entry.leading.extend(child.leading);
                if !child.elements.is_empty() {
                    entry.start = child.start;
                }
            } else {
                entry.elements.extend(child.leading);
            }
            if !child.elements.is_empty() {
                entry.end = child.end;
            }
            entry.elements.extend(child.elements);
        }
        entry
    }

    /// Wrap the elements into a single node of `kind`.
    fn wrap(&mut self, kind: SyntaxKind) -> GreenNode {
        let node = GreenNode::new(kind.into(), std::mem::take(&mut self.elements));
        self.elements.push(node.clone().into());
        node
    }
}

/// First action for `kind`, falling back to the identifier reading of a
/// non-reserved keyword
pub(super) fn first_action(table: &ParseTable, state: StateId, kind: SyntaxKind) -> Option<Action> {
    table.actions(state, kind).first().copied().or_else(|| {
        kind.is_contextual_keyword()
            .then(|| table.actions(state, SyntaxKind::IDENT).first().copied())
            .flatten()
    })
}

/// The grammar-symbol states of the stack, as a simulation sees them.
///
/// Pops walk down the real stack without copying it and pushes go to a
/// private overlay, so a simulation costs the same however deep the
/// parser is.
pub(super) struct SimStack<'s> {
    entries: &'s [StackEntry],
    /// Entries of `entries` below the overlay
    kept: usize,
    pushed: Vec<StateId>,
    /// Stack entries visited plus automaton steps taken
    pub work: usize,
}

impl<'s> SimStack<'s> {
    pub fn new(entries: &'s [StackEntry]) -> Self {
        Self::popped(entries, 0)
    }

    /// The stack without its top `depth` entries, ERROR entries included
    pub fn popped(entries: &'s [StackEntry], depth: usize) -> Self {
        Self {
            entries,
            kept: entries.len().saturating_sub(depth),
            pushed: Vec::new(),
            work: 0,
        }
    }

    pub fn last(&mut self) -> Option<StateId> {
        if let Some(&state) = self.pushed.last() {
            return Some(state);
        }
        self.below(self.kept).map(|index| self.entries[index].state)
    }

    pub fn push(&mut self, state: StateId) {
        self.pushed.push(state);
    }

    /// Remove `count` grammar symbols; `false` when there are fewer.
    pub fn pop(&mut self, count: usize) -> bool {
        let overlay = count.min(self.pushed.len());
        self.pushed.truncate(self.pushed.len() - overlay);
        for _ in overlay..count {
            match self.below(self.kept) {
                Some(index) => self.kept = index,
                None => return false,
            }
        }
        true
    }

    /// Index of the topmost non-ERROR entry below `end`
    fn below(&mut self, end: usize) -> Option<usize> {
        let mut index = end;
        while index > 0 {
            index -= 1;
            self.work += 1;
            if !self.entries[index].extra {
                return Some(index);
            }
        }
        None
    }
}

/// Runs the automaton ahead of the parse without building anything
pub(super) struct Simulator<'e, 'a> {
    table: &'a ParseTable,
    input: &'e mut TokenSource<'a>,
    budget: usize,
}

impl Simulator<'_, '_> {
    pub fn peek(&mut self, n: usize) -> SyntaxKind {
        self.input.peek(n).kind
    }

    pub fn first_action(&self, state: StateId, kind: SyntaxKind) -> Option<Action> {
        first_action(self.table, state, kind)
    }

    /// Whether `state` can go on with `kind`, a `>>` possibly read as two `>`
    pub fn accepts(&self, state: StateId, kind: SyntaxKind) -> bool {
        self.first_action(state, kind).is_some()
            || (kind == SyntaxKind::SHR && self.first_action(state, SyntaxKind::GT).is_some())
    }

    /// Run the automaton on `stack`, reading input from token `from` on.
    ///
    /// `forced` replaces the first action, `injected` is read before the
    /// buffered input. Returns the number of tokens consumed, or `usize::MAX`
    /// when the input is accepted.
    pub fn run(
        &mut self,
        stack: &mut SimStack<'_>,
        mut forced: Option<Action>,
        injected: Option<SyntaxKind>,
        from: usize,
        limit: usize,
    ) -> usize {
        let mut consumed = 0;
        let mut steps = 0;
        // Halves of a split `>>` still to shift
        let mut halves = 0;
        while consumed < limit && steps < self.budget {
            steps += 1;
            stack.work += 1;
            let kind = match (injected, consumed) {
                _ if halves > 0 => SyntaxKind::GT,
                (Some(kind), 0) => kind,
                (Some(_), n) => self.peek(from + n - 1),
                (None, n) => self.peek(from + n),
            };
            let Some(state) = stack.last() else {
                break;
            };
            let action = match forced.take().or_else(|| self.first_action(state, kind)) {
                Some(action) => action,
                None if kind == SyntaxKind::SHR => {
                    let Some(action) = self.first_action(state, SyntaxKind::GT) else {
                        break;
                    };
                    halves = 2;
                    action
                }
                None => break,
            };
            match action {
                Action::Shift(next) => {
                    stack.push(next);
                    halves = match halves {
                        2 => 1,
                        _ => {
                            consumed += 1;
                            0
                        }
                    };
                }
                Action::Reduce(id) => {
                    let production = self.table.grammar().production(id);
                    if !stack.pop(production.rhs.len()) {
                        break;
                    }
                    let Some(next) = stack
                        .last()
                        .and_then(|top| self.table.goto(top, production.lhs))
                    else {
                        break;
                    };
                    stack.push(next);
                }
                Action::Accept => return usize::MAX,
            }
        }
        consumed
    }
}

/// Bookkeeping that bounds recovery work at one input position
#[derive(Debug, Default)]
pub(super) struct RecoveryState {
    pub position: Option<TextSize>,
    pub insertions: usize,
    pub popped: bool,
    pub attempts: usize,
}

/// The parser state
pub(crate) struct Engine<'a> {
    pub(super) table: &'a ParseTable,
    pub(super) options: &'a ParseOptions,
    pub(super) input: TokenSource<'a>,
    pub(super) lines: &'a LineIndex,
    pub(super) stack: Vec<StackEntry>,
    pub(super) errors: Vec<SyntaxError>,
    /// Missing token queued by recovery, consumed in place of real input
    pub(super) injected: Option<SyntaxKind>,
    pub(super) recovery: RecoveryState,
    /// Entries built until the next shift depend on an ambiguity decision
    fork_pending: bool,
    node_info: NodeInfoMap,
    reuse: Option<Reuse<'a>>,
    reused: usize,
    /// Stack entries and automaton steps spent by lookahead simulations
    pub(super) search_work: usize,
}

impl<'a> Engine<'a> {
    pub fn new(
        table: &'a ParseTable,
        options: &'a ParseOptions,
        text: &'a str,
        lines: &'a LineIndex,
        reuse: Option<Reuse<'a>>,
    ) -> Self {
        Self {
            table,
            options,
            input: TokenSource::new(text),
            lines,
            stack: vec![StackEntry::bottom()],
            errors: Vec::new(),
            injected: None,
            recovery: RecoveryState::default(),
            fork_pending: false,
            node_info: NodeInfoMap::default(),
            reuse,
            reused: 0,
            search_work: 0,
        }
    }

    pub fn parse(mut self) -> Parse {
        loop {
            let kind = self.input.peek(0).kind;
            let lookahead = self.injected.unwrap_or(kind);
            let state = self.top_state();
            let candidates = self.candidates(state, lookahead);

            let (reading, action) = match candidates.as_slice() {
                [] if self.injected.is_none()
                    && kind == SyntaxKind::SHR
                    && self.table.has_action(state, SyntaxKind::GT) =>
                {
                    self.input.split_shift_right();
                    continue;
                }
                [] => {
                    if !self.recover() {
                        return self.finish();
                    }
                    continue;
                }
                [single] => *single,
                _ => {
                    self.fork_pending = true;
                    self.choose(&candidates)
                }
            };
            tracing::trace!(state, ?reading, ?action, "step");

            match action {
                Action::Accept => return self.finish(),
                Action::Shift(next) => {
                    let reusable = candidates.len() == 1
                        && self.injected.is_none()
                        && !self.fork_pending;
                    if !(reusable && self.try_reuse(state)) {
                        self.shift(reading, next);
                    }
                }
                Action::Reduce(production) => {
                    if !self.reduce(production) && !self.recover() {
                        return self.finish();
                    }
                }
            }
        }
    }

    pub(super) fn top_state(&self) -> StateId {
        self.stack.last().map_or(0, |entry| entry.state)
    }

    /// Every action for `kind`, plus the identifier reading of a non-reserved keyword.
    fn candidates(&self, state: StateId, kind: SyntaxKind) -> Vec<(SyntaxKind, Action)> {
        let mut candidates: Vec<_> = self
            .table
            .actions(state, kind)
            .iter()
            .map(|&action| (kind, action))
            .collect();
        if kind.is_contextual_keyword() {
            candidates.extend(
                self.table
                    .actions(state, SyntaxKind::IDENT)
                    .iter()
                    .map(|&action| (SyntaxKind::IDENT, action)),
            );
        }
        candidates
    }

    /// Pick the candidate that consumes the most tokens; ties go to the first.
    fn choose(&mut self, candidates: &[(SyntaxKind, Action)]) -> (SyntaxKind, Action) {
        let window = self.options.ambiguity_lookahead;
        let (mut simulator, entries) = self.simulator();
        let mut work = 0;
        let mut best = 0;
        let mut best_score = None;
        for (index, &(_, action)) in candidates.iter().enumerate() {
            let mut stack = SimStack::new(entries);
            let score = simulator.run(&mut stack, Some(action), None, 0, window);
            work += stack.work;
            if best_score.is_none_or(|current| score > current) {
                best = index;
                best_score = Some(score);
            }
        }
        self.search_work += work;
        tracing::trace!(candidates = candidates.len(), chosen = best, "resolved ambiguity");
        candidates[best]
    }

    /// A simulator over the input together with the stack to start it from
    pub(super) fn simulator(&mut self) -> (Simulator<'_, 'a>, &[StackEntry]) {
        let simulator = Simulator {
            table: self.table,
            input: &mut self.input,
            budget: self.options.simulation_steps(),
        };
        (simulator, &self.stack)
    }

    fn shift(&mut self, kind: SyntaxKind, next: StateId) {
        let fragile = std::mem::take(&mut self.fork_pending);
        if self.injected.take().is_some() {
            let at = self.input.peek(0).full_start;
            let token = GreenToken::new(kind.into(), "");
            let missing = GreenNode::new(SyntaxKind::MISSING.into(), [token.into()]);
            self.stack.push(StackEntry {
                state: next,
                elements: vec![missing.into()],
                start: at,
                end: at,
                fragile,
                has_error: true,
                ..StackEntry::bottom()
            });
            return;
        }

        let lexeme = self.input.bump();
        let leading = self.input.trivia(&lexeme);
        let token = GreenToken::new(kind.into(), lexeme.text(self.input.text()));
        self.stack.push(StackEntry {
            state: next,
            leading,
            elements: vec![token.into()],
            start: lexeme.range.start(),
            end: lexeme.range.end(),
            fragile,
            ..StackEntry::bottom()
        });
    }

    /// Reduce by `id`. Trailing ERROR entries stay on top of the new entry.
    ///
    /// Returns `false`, leaving the stack untouched, when the stack does not
    /// hold the production's right-hand side.
    fn reduce(&mut self, id: ProductionId) -> bool {
        let production = self.table.grammar().production(id);
        let (lhs, mut remaining) = (production.lhs, production.rhs.len());

        let trailing = self
            .stack
            .iter()
            .rev()
            .take_while(|entry| entry.extra)
            .count();
        let mut split = self.stack.len() - trailing;
        while remaining > 0 {
            if split <= 1 {
                return false;
            }
            split -= 1;
            if !self.stack[split].extra {
                remaining -= 1;
            }
        }
        let base = self.stack[split - 1].state;
        let Some(next) = self.table.goto(base, lhs) else {
            return false;
        };

        let extras = self.stack.split_off(self.stack.len() - trailing);
        let children = self.stack.split_off(split);
        let at = self.input.peek(0).full_start;
        let mut entry = StackEntry::from_children(next, children, at);
        entry.fragile |= self.fork_pending;

        if let Some(kind) = self.table.grammar().visible_kind(lhs) {
            let node = entry.wrap(kind);
            let lookahead = self
                .input
                .examined()
                .checked_sub(entry.start)
                .unwrap_or_default();
            self.node_info.insert(
                green_id(&node),
                NodeInfo {
                    state: base,
                    lookahead,
                    reusable: !entry.has_error && !entry.fragile,
                },
            );
        }

        self.stack.push(entry);
        for mut extra in extras {
            extra.state = next;
            self.stack.push(extra);
        }
        true
    }

    /// Push a subtree of the previous tree in place of re-parsing it.
    fn try_reuse(&mut self, state: StateId) -> bool {
        let position = self.input.peek(0).range.start();
        let Some(reusable) = self
            .reuse
            .as_ref()
            .and_then(|reuse| reuse.find(position, state, self.table))
        else {
            return false;
        };
        let Some(next) = self.table.goto_kind(state, reusable.kind) else {
            return false;
        };

        let lexeme = self.input.bump();
        let leading = self.input.trivia(&lexeme);
        let end = position + reusable.len;
        self.stack.push(StackEntry {
            state: next,
            leading,
            elements: vec![reusable.green.clone().into()],
            start: position,
            end,
            ..StackEntry::bottom()
        });
        self.input.reset(end, self.lines);
        self.input.mark_examined(position + reusable.info.lookahead);
        self.node_info.insert(green_id(&reusable.green), reusable.info);
        self.node_info.extend(reusable.nested);
        self.reused += 1;
        tracing::trace!(kind = ?reusable.kind, ?position, "reused subtree");
        true
    }

    /// Build the root from everything on the stack.
    ///
    /// Input left over after an aborted parse goes into a final ERROR node.
    pub(super) fn finish(mut self) -> Parse {
        let mut children = Vec::new();
        for entry in self.stack.drain(..) {
            children.extend(entry.leading);
            children.extend(entry.elements);
        }

        let mut rest = Vec::new();
        while self.input.peek(0).kind != SyntaxKind::EOF {
            let lexeme = self.input.bump();
            rest.extend(self.input.trivia(&lexeme));
            let text = lexeme.text(self.input.text());
            rest.push(GreenToken::new(lexeme.kind.into(), text).into());
        }
        if !rest.is_empty() {
            children.push(GreenNode::new(SyntaxKind::ERROR.into(), rest).into());
        }
        let eof = self.input.bump();
        children.extend(self.input.trivia(&eof));

        if self.reuse.is_some() {
            tracing::debug!(reused = self.reused, "incremental parse finished");
        }
        tracing::debug!(
            search_work = self.search_work,
            errors = self.errors.len(),
            "parse finished"
        );
        Parse {
            green: GreenNode::new(SyntaxKind::SOURCE_FILE.into(), children),
            errors: self.errors,
            node_info: self.node_info,
            reused: self.reused,
            search_work: self.search_work,
        }
    }
}
