//! Grammar definition DSL
//!
//! Rules are written with tree-sitter style combinators (`seq!`, `choice!`,
//! [`opt`], [`repeat`], [`prec_left`], ...) and lowered into a flat list of
//! context-free [`Production`]s that the table builder consumes.
//!
//! Lowering works like this:
//! - `choice` and `opt` are expanded inline, so one rule may yield several
//!   productions for the same left-hand side
//! - `repeat`/`repeat1` introduce hidden, left-recursive auxiliary rules
//! - precedence wraps the productions it covers unless an inner wrapper
//!   already assigned one
//!
//! Rules are either visible (named by a node [`SyntaxKind`], producing a node
//! in the tree) or hidden (named by a string starting with `_`, their children
//! are spliced into the parent).

pub mod bigquery;

use super::SyntaxKind;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

/// Associativity of a precedence level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Assoc {
    #[default]
    None,
    Left,
    Right,
}

/// A grammar rule expression
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// A terminal
    Token(SyntaxKind),
    /// A visible rule, producing a node of this kind
    Node(SyntaxKind),
    /// A hidden rule, spliced into its parent
    Hidden(&'static str),
    Seq(Vec<Rule>),
    Choice(Vec<Rule>),
    Optional(Box<Rule>),
    Repeat(Box<Rule>),
    Repeat1(Box<Rule>),
    Prec(i32, Assoc, Box<Rule>),
}

impl From<SyntaxKind> for Rule {
    fn from(kind: SyntaxKind) -> Self {
        if kind.is_token() {
            Rule::Token(kind)
        } else {
            Rule::Node(kind)
        }
    }
}

impl From<&'static str> for Rule {
    fn from(name: &'static str) -> Self {
        Rule::Hidden(name)
    }
}

/// Build a [`Rule::Seq`] from anything convertible into rules
#[macro_export]
macro_rules! seq {
    ($($rule:expr),+ $(,)?) => {
        $crate::parser::grammar::Rule::Seq(vec![$($crate::parser::grammar::Rule::from($rule)),+])
    };
}

/// Build a [`Rule::Choice`] from anything convertible into rules
#[macro_export]
macro_rules! choice {
    ($($rule:expr),+ $(,)?) => {
        $crate::parser::grammar::Rule::Choice(vec![$($crate::parser::grammar::Rule::from($rule)),+])
    };
}

pub fn opt(rule: impl Into<Rule>) -> Rule {
    Rule::Optional(Box::new(rule.into()))
}

pub fn repeat(rule: impl Into<Rule>) -> Rule {
    Rule::Repeat(Box::new(rule.into()))
}

pub fn repeat1(rule: impl Into<Rule>) -> Rule {
    Rule::Repeat1(Box::new(rule.into()))
}

pub fn prec(level: i32, rule: impl Into<Rule>) -> Rule {
    Rule::Prec(level, Assoc::None, Box::new(rule.into()))
}

pub fn prec_left(level: i32, rule: impl Into<Rule>) -> Rule {
    Rule::Prec(level, Assoc::Left, Box::new(rule.into()))
}

pub fn prec_right(level: i32, rule: impl Into<Rule>) -> Rule {
    Rule::Prec(level, Assoc::Right, Box::new(rule.into()))
}

/// One or more `rule`s separated by commas
pub fn comma_sep1(rule: impl Into<Rule>) -> Rule {
    let rule = rule.into();
    Rule::Seq(vec![
        rule.clone(),
        repeat(Rule::Seq(vec![Rule::Token(SyntaxKind::COMMA), rule])),
    ])
}

// =============================================================================
// Lowered grammar
// =============================================================================

pub type NonTerminal = u16;
pub type ProductionId = u32;

/// A grammar symbol: a token kind or a nonterminal index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Terminal(SyntaxKind),
    NonTerminal(NonTerminal),
}

/// A flat production `lhs -> rhs` with its precedence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub lhs: NonTerminal,
    pub rhs: Vec<Symbol>,
    pub prec: i32,
    pub assoc: Assoc,
}

#[derive(Debug, Clone)]
pub struct NonTerminalInfo {
    pub name: SmolStr,
    /// Node kind for visible rules, `None` for hidden and auxiliary rules
    pub kind: Option<SyntaxKind>,
}

/// Errors detected while lowering a grammar
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    #[error("rule `{0}` is referenced but never defined")]
    UndefinedRule(String),
    #[error("rule `{0}` is defined twice")]
    DuplicateRule(String),
    #[error("`{0:?}` is not a token kind")]
    NotAToken(SyntaxKind),
    #[error("`{0:?}` is not a node kind")]
    NotANode(SyntaxKind),
}

/// A lowered, immutable grammar
///
/// Nonterminal 0 is the augmented start symbol and production 0 is
/// `$start -> root`, which the table builder turns into the accept action.
#[derive(Debug, Clone)]
pub struct Grammar {
    nonterminals: Vec<NonTerminalInfo>,
    productions: Vec<Production>,
    by_lhs: Vec<Vec<ProductionId>>,
    by_kind: FxHashMap<SyntaxKind, NonTerminal>,
}

impl Grammar {
    pub const START: NonTerminal = 0;
    pub const ACCEPT_PRODUCTION: ProductionId = 0;

    pub fn production(&self, id: ProductionId) -> &Production {
        &self.productions[id as usize]
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn productions_for(&self, nt: NonTerminal) -> &[ProductionId] {
        &self.by_lhs[nt as usize]
    }

    pub fn nonterminal_count(&self) -> usize {
        self.nonterminals.len()
    }

    pub fn nonterminal(&self, nt: NonTerminal) -> &NonTerminalInfo {
        &self.nonterminals[nt as usize]
    }

    /// Node kind produced by reducing to `nt`, if the rule is visible
    pub fn visible_kind(&self, nt: NonTerminal) -> Option<SyntaxKind> {
        self.nonterminals[nt as usize].kind
    }

    /// Nonterminal of the visible rule producing `kind`
    pub fn nonterminal_for_kind(&self, kind: SyntaxKind) -> Option<NonTerminal> {
        self.by_kind.get(&kind).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum RuleName {
    Node(SyntaxKind),
    Hidden(&'static str),
}

impl RuleName {
    fn display(&self) -> String {
        match self {
            RuleName::Node(kind) => format!("{kind:?}").to_lowercase(),
            RuleName::Hidden(name) => (*name).to_string(),
        }
    }
}

/// Collects rule definitions and lowers them into a [`Grammar`]
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    rules: IndexMap<RuleName, Rule>,
    duplicates: Vec<String>,
}

/// A partially lowered alternative
#[derive(Debug, Clone, Default)]
struct Alt {
    symbols: Vec<Symbol>,
    prec: Option<(i32, Assoc)>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a visible rule producing nodes of `kind`
    pub fn node(&mut self, kind: SyntaxKind, rule: impl Into<Rule>) -> &mut Self {
        self.define(RuleName::Node(kind), rule.into())
    }

    /// Define a hidden rule whose children are spliced into the parent
    pub fn hidden(&mut self, name: &'static str, rule: impl Into<Rule>) -> &mut Self {
        self.define(RuleName::Hidden(name), rule.into())
    }

    fn define(&mut self, name: RuleName, rule: Rule) -> &mut Self {
        if self.rules.insert(name, rule).is_some() {
            self.duplicates.push(name.display());
        }
        self
    }

    /// Lower all rules, with the hidden rule `root` as the start symbol.
    pub fn build(self, root: &'static str) -> Result<Grammar, GrammarError> {
        if let Some(name) = self.duplicates.into_iter().next() {
            return Err(GrammarError::DuplicateRule(name));
        }

        let mut lowering = Lowering {
            nonterminals: vec![NonTerminalInfo {
                name: SmolStr::new_static("$start"),
                kind: None,
            }],
            ids: FxHashMap::default(),
            productions: Vec::new(),
        };
        for (&name, _) in &self.rules {
            if let RuleName::Node(kind) = name {
                if !kind.is_node() {
                    return Err(GrammarError::NotANode(kind));
                }
            }
            let id = lowering.nonterminals.len() as NonTerminal;
            lowering.nonterminals.push(NonTerminalInfo {
                name: SmolStr::new(name.display()),
                kind: match name {
                    RuleName::Node(kind) => Some(kind),
                    RuleName::Hidden(_) => None,
                },
            });
            lowering.ids.insert(name, id);
        }

        let root_id = lowering.resolve(RuleName::Hidden(root))?;
        lowering.productions.push(Production {
            lhs: Grammar::START,
            rhs: vec![Symbol::NonTerminal(root_id)],
            prec: 0,
            assoc: Assoc::None,
        });

        for (name, rule) in &self.rules {
            let lhs = lowering.resolve(*name)?;
            let alts = lowering.lower(rule, &name.display())?;
            lowering.push_alternatives(lhs, alts);
        }

        let Lowering {
            nonterminals,
            productions,
            ..
        } = lowering;

        let mut by_lhs = vec![Vec::new(); nonterminals.len()];
        for (id, production) in productions.iter().enumerate() {
            by_lhs[production.lhs as usize].push(id as ProductionId);
        }
        let by_kind = nonterminals
            .iter()
            .enumerate()
            .filter_map(|(id, info)| info.kind.map(|kind| (kind, id as NonTerminal)))
            .collect();

        tracing::debug!(
            nonterminals = nonterminals.len(),
            productions = productions.len(),
            "lowered grammar"
        );

        Ok(Grammar {
            nonterminals,
            productions,
            by_lhs,
            by_kind,
        })
    }
}

struct Lowering {
    nonterminals: Vec<NonTerminalInfo>,
    ids: FxHashMap<RuleName, NonTerminal>,
    productions: Vec<Production>,
}

impl Lowering {
    fn resolve(&self, name: RuleName) -> Result<NonTerminal, GrammarError> {
        self.ids
            .get(&name)
            .copied()
            .ok_or_else(|| GrammarError::UndefinedRule(name.display()))
    }

    fn push_alternatives(&mut self, lhs: NonTerminal, alts: Vec<Alt>) {
        for alt in alts {
            let duplicate = self
                .productions
                .iter()
                .any(|p| p.lhs == lhs && p.rhs == alt.symbols);
            if duplicate {
                continue;
            }
            let (prec, assoc) = alt.prec.unwrap_or_default();
            self.productions.push(Production {
                lhs,
                rhs: alt.symbols,
                prec,
                assoc,
            });
        }
    }

    fn lower(&mut self, rule: &Rule, owner: &str) -> Result<Vec<Alt>, GrammarError> {
        Ok(match rule {
            Rule::Token(kind) => {
                if !kind.is_token() {
                    return Err(GrammarError::NotAToken(*kind));
                }
                vec![Alt {
                    symbols: vec![Symbol::Terminal(*kind)],
                    prec: None,
                }]
            }
            Rule::Node(kind) => vec![self.reference(RuleName::Node(*kind))?],
            Rule::Hidden(name) => vec![self.reference(RuleName::Hidden(name))?],
            Rule::Seq(items) => {
                let mut result = vec![Alt::default()];
                for item in items {
                    let tails = self.lower(item, owner)?;
                    result = result
                        .iter()
                        .flat_map(|head| {
                            tails.iter().map(move |tail| Alt {
                                symbols: head.symbols.iter().chain(&tail.symbols).copied().collect(),
                                prec: head.prec.or(tail.prec),
                            })
                        })
                        .collect();
                }
                result
            }
            Rule::Choice(items) => {
                let mut result = Vec::new();
                for item in items {
                    result.extend(self.lower(item, owner)?);
                }
                result
            }
            Rule::Optional(inner) => {
                let mut result = self.lower(inner, owner)?;
                result.push(Alt::default());
                result
            }
            Rule::Repeat(inner) => {
                let aux = self.auxiliary(inner, owner)?;
                vec![aux, Alt::default()]
            }
            Rule::Repeat1(inner) => vec![self.auxiliary(inner, owner)?],
            Rule::Prec(level, assoc, inner) => {
                let mut result = self.lower(inner, owner)?;
                for alt in &mut result {
                    alt.prec.get_or_insert((*level, *assoc));
                }
                result
            }
        })
    }

    fn reference(&self, name: RuleName) -> Result<Alt, GrammarError> {
        Ok(Alt {
            symbols: vec![Symbol::NonTerminal(self.resolve(name)?)],
            prec: None,
        })
    }

    /// Create `aux -> item | aux item` for every alternative of `inner`.
    fn auxiliary(&mut self, inner: &Rule, owner: &str) -> Result<Alt, GrammarError> {
        let items = self.lower(inner, owner)?;
        let aux = self.nonterminals.len() as NonTerminal;
        self.nonterminals.push(NonTerminalInfo {
            name: SmolStr::new(format!("{owner}_repeat{aux}")),
            kind: None,
        });
        let recursive = items
            .iter()
            .map(|item| Alt {
                symbols: std::iter::once(Symbol::NonTerminal(aux))
                    .chain(item.symbols.iter().copied())
                    .collect(),
                prec: item.prec,
            })
            .collect::<Vec<_>>();
        self.push_alternatives(aux, items);
        self.push_alternatives(aux, recursive);
        Ok(Alt {
            symbols: vec![Symbol::NonTerminal(aux)],
            prec: None,
        })
    }
}
