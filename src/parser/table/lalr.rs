//! LALR(1) automaton construction
//!
//! States are built from LR(1) kernels, merging kernels that share the same
//! core. A merged state whose lookaheads grow is queued again so the new
//! lookaheads reach its successors.

use std::collections::VecDeque;

use indexmap::IndexMap;
use indexmap::map::Entry;
use rustc_hash::FxHashMap;

use super::{Action, StateId};
use crate::parser::SyntaxKind;
use crate::parser::grammar::{Assoc, Grammar, NonTerminal, ProductionId, Symbol};
use crate::parser::syntax_kind::TERMINAL_COUNT;

const _: () = assert!(TERMINAL_COUNT <= 256);

/// Bit set over terminal kinds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TerminalSet([u64; 4]);

impl TerminalSet {
    pub fn insert(&mut self, kind: SyntaxKind) -> bool {
        let (word, bit) = Self::locate(kind as usize);
        let fresh = self.0[word] & bit == 0;
        self.0[word] |= bit;
        fresh
    }

    pub fn contains(&self, kind: SyntaxKind) -> bool {
        let (word, bit) = Self::locate(kind as usize);
        self.0[word] & bit != 0
    }

    /// Add every member of `other`, returning whether anything changed.
    pub fn union_with(&mut self, other: &Self) -> bool {
        let mut changed = false;
        for (mine, theirs) in self.0.iter_mut().zip(other.0) {
            let merged = *mine | theirs;
            changed |= merged != *mine;
            *mine = merged;
        }
        changed
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&word| word == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = SyntaxKind> + '_ {
        (0..TERMINAL_COUNT)
            .filter(|&i| {
                let (word, bit) = Self::locate(i);
                self.0[word] & bit != 0
            })
            .filter_map(|i| SyntaxKind::from_raw(i as u16))
    }

    fn locate(index: usize) -> (usize, u64) {
        (index / 64, 1u64 << (index % 64))
    }
}

/// An LR(0) item: a production with a dot position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct Item {
    production: ProductionId,
    dot: u16,
}

type ItemSet = IndexMap<Item, TerminalSet>;

/// FIRST sets and nullability of every nonterminal
struct FirstSets {
    nullable: Vec<bool>,
    first: Vec<TerminalSet>,
}

impl FirstSets {
    fn compute(grammar: &Grammar) -> Self {
        let count = grammar.nonterminal_count();
        let mut sets = Self {
            nullable: vec![false; count],
            first: vec![TerminalSet::default(); count],
        };
        let mut changed = true;
        while changed {
            changed = false;
            for production in grammar.productions() {
                let lhs = production.lhs as usize;
                let first = sets.of_sequence(&production.rhs, None);
                changed |= sets.first[lhs].union_with(&first);
                if !sets.nullable[lhs] && sets.is_nullable(&production.rhs) {
                    sets.nullable[lhs] = true;
                    changed = true;
                }
            }
        }
        sets
    }

    fn is_nullable(&self, symbols: &[Symbol]) -> bool {
        symbols.iter().all(|symbol| match symbol {
            Symbol::Terminal(_) => false,
            Symbol::NonTerminal(nt) => self.nullable[*nt as usize],
        })
    }

    /// FIRST of `symbols`, followed by `follow` when the sequence is nullable.
    fn of_sequence(&self, symbols: &[Symbol], follow: Option<&TerminalSet>) -> TerminalSet {
        let mut set = TerminalSet::default();
        for symbol in symbols {
            match *symbol {
                Symbol::Terminal(kind) => {
                    set.insert(kind);
                    return set;
                }
                Symbol::NonTerminal(nt) => {
                    set.union_with(&self.first[nt as usize]);
                    if !self.nullable[nt as usize] {
                        return set;
                    }
                }
            }
        }
        if let Some(follow) = follow {
            set.union_with(follow);
        }
        set
    }
}

/// The finished automaton, before conflict resolution
pub(super) struct Automaton {
    pub cells: Vec<Vec<Action>>,
    pub gotos: Vec<StateId>,
    pub contexts: Vec<Option<SyntaxKind>>,
    pub state_count: usize,
    pub conflicts: usize,
}

struct Builder<'g> {
    grammar: &'g Grammar,
    first: FirstSets,
    kernels: Vec<ItemSet>,
    index: FxHashMap<Vec<Item>, StateId>,
    transitions: Vec<IndexMap<Symbol, StateId>>,
    queue: VecDeque<StateId>,
    queued: Vec<bool>,
}

pub(super) fn build(grammar: &Grammar) -> Automaton {
    let mut builder = Builder {
        grammar,
        first: FirstSets::compute(grammar),
        kernels: Vec::new(),
        index: FxHashMap::default(),
        transitions: Vec::new(),
        queue: VecDeque::new(),
        queued: Vec::new(),
    };

    let mut start = ItemSet::default();
    let mut eof = TerminalSet::default();
    eof.insert(SyntaxKind::EOF);
    start.insert(
        Item {
            production: Grammar::ACCEPT_PRODUCTION,
            dot: 0,
        },
        eof,
    );
    builder.intern(start);

    while let Some(state) = builder.queue.pop_front() {
        builder.queued[state as usize] = false;
        builder.expand(state);
    }
    builder.finish()
}

impl Builder<'_> {
    fn closure(&self, kernel: &ItemSet) -> ItemSet {
        let mut items = kernel.clone();
        let mut pending: Vec<usize> = (0..items.len()).collect();
        while let Some(index) = pending.pop() {
            let Some((&item, &lookahead)) = items.get_index(index) else {
                continue;
            };
            let production = self.grammar.production(item.production);
            let dot = item.dot as usize;
            let Some(&Symbol::NonTerminal(nt)) = production.rhs.get(dot) else {
                continue;
            };
            let follow = self
                .first
                .of_sequence(&production.rhs[dot + 1..], Some(&lookahead));
            for &id in self.grammar.productions_for(nt) {
                let item = Item {
                    production: id,
                    dot: 0,
                };
                match items.entry(item) {
                    Entry::Occupied(mut entry) => {
                        if entry.get_mut().union_with(&follow) {
                            pending.push(entry.index());
                        }
                    }
                    Entry::Vacant(entry) => {
                        pending.push(entry.index());
                        entry.insert(follow);
                    }
                }
            }
        }
        items
    }

    /// Register a kernel, merging it into an existing state with the same core.
    fn intern(&mut self, mut kernel: ItemSet) -> StateId {
        kernel.sort_keys();
        let core: Vec<Item> = kernel.keys().copied().collect();
        if let Some(&state) = self.index.get(&core) {
            let mut grew = false;
            for (item, lookahead) in &kernel {
                if let Some(existing) = self.kernels[state as usize].get_mut(item) {
                    grew |= existing.union_with(lookahead);
                }
            }
            if grew && !self.queued[state as usize] {
                self.queued[state as usize] = true;
                self.queue.push_back(state);
            }
            return state;
        }

        let state = self.kernels.len() as StateId;
        self.kernels.push(kernel);
        self.index.insert(core, state);
        self.transitions.push(IndexMap::new());
        self.queued.push(true);
        self.queue.push_back(state);
        state
    }

    fn expand(&mut self, state: StateId) {
        let closure = self.closure(&self.kernels[state as usize]);
        let mut successors: IndexMap<Symbol, ItemSet> = IndexMap::new();
        for (item, lookahead) in &closure {
            let production = self.grammar.production(item.production);
            if let Some(&symbol) = production.rhs.get(item.dot as usize) {
                let advanced = Item {
                    production: item.production,
                    dot: item.dot + 1,
                };
                successors
                    .entry(symbol)
                    .or_default()
                    .entry(advanced)
                    .or_default()
                    .union_with(lookahead);
            }
        }
        for (symbol, kernel) in successors {
            let target = self.intern(kernel);
            self.transitions[state as usize].insert(symbol, target);
        }
    }

    fn finish(self) -> Automaton {
        let state_count = self.kernels.len();
        let nonterminals = self.grammar.nonterminal_count();
        let mut cells = vec![Vec::new(); state_count * TERMINAL_COUNT];
        let mut gotos = vec![super::NO_GOTO; state_count * nonterminals];
        let mut contexts = Vec::with_capacity(state_count);
        let mut conflicts = 0;

        for state in 0..state_count {
            let closure = self.closure(&self.kernels[state]);
            let mut shifts = vec![None; TERMINAL_COUNT];
            let mut shift_prec = vec![i32::MIN; TERMINAL_COUNT];
            let mut reduces: Vec<Vec<ProductionId>> = vec![Vec::new(); TERMINAL_COUNT];
            let mut accept = false;

            for (&symbol, &target) in &self.transitions[state] {
                match symbol {
                    Symbol::Terminal(kind) => shifts[kind as usize] = Some(target),
                    Symbol::NonTerminal(nt) => {
                        gotos[state * nonterminals + nt as usize] = target;
                    }
                }
            }

            for (item, lookahead) in &closure {
                let production = self.grammar.production(item.production);
                match production.rhs.get(item.dot as usize) {
                    Some(Symbol::Terminal(kind)) => {
                        let slot = &mut shift_prec[*kind as usize];
                        *slot = (*slot).max(production.prec);
                    }
                    Some(Symbol::NonTerminal(_)) => {}
                    None if item.production == Grammar::ACCEPT_PRODUCTION => accept = true,
                    None => {
                        for kind in lookahead.iter() {
                            reduces[kind as usize].push(item.production);
                        }
                    }
                }
            }

            for terminal in 0..TERMINAL_COUNT {
                let cell = &mut cells[state * TERMINAL_COUNT + terminal];
                if accept && terminal == SyntaxKind::EOF as usize {
                    cell.push(Action::Accept);
                    continue;
                }
                let mut candidates = std::mem::take(&mut reduces[terminal]);
                candidates.sort_unstable();
                *cell = self.resolve(shifts[terminal], shift_prec[terminal], candidates);
                if cell.len() > 1 {
                    conflicts += 1;
                }
            }

            contexts.push(
                self.kernels[state]
                    .keys()
                    .map(|item| self.grammar.production(item.production).lhs)
                    .find_map(|lhs: NonTerminal| self.grammar.visible_kind(lhs)),
            );
        }

        Automaton {
            cells,
            gotos,
            contexts,
            state_count,
            conflicts,
        }
    }

    /// Resolve a cell by precedence and associativity.
    ///
    /// Whatever remains is kept in order: the shift first, then reduces by
    /// production index.
    fn resolve(
        &self,
        shift: Option<StateId>,
        shift_prec: i32,
        mut reduces: Vec<ProductionId>,
    ) -> Vec<Action> {
        if reduces.len() > 1 {
            let best = reduces
                .iter()
                .map(|&id| self.grammar.production(id).prec)
                .max()
                .unwrap_or_default();
            reduces.retain(|&id| self.grammar.production(id).prec == best);
        }

        let mut keep_shift = shift.is_some();
        if let (Some(_), Some(&first)) = (shift, reduces.first()) {
            let reduce = self.grammar.production(first);
            if reduce.prec > shift_prec {
                keep_shift = false;
            } else if reduce.prec < shift_prec {
                reduces.clear();
            } else {
                match reduce.assoc {
                    Assoc::Left => keep_shift = false,
                    Assoc::Right => reduces.clear(),
                    Assoc::None => {}
                }
            }
        }

        let mut actions = Vec::with_capacity(reduces.len() + 1);
        if keep_shift {
            actions.extend(shift.map(Action::Shift));
        }
        actions.extend(reduces.into_iter().map(Action::Reduce));
        actions
    }
}
