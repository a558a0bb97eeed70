//! The compiled BigQuery language and the parser entry points
//!
//! # Usage
//!
//! ```ignore
//! use bqsyntax::{InputEdit, Parser, language};
//!
//! let tree = language().parse("SELECT a FROM t");
//!
//! let (edit, text) = InputEdit::replace(tree.text(), 8..8, ", b")?;
//! let mut parser = Parser::new(language());
//! let tree = parser.parse(&text, Some(&tree), Some(&edit))?;
//! ```

use std::sync::Arc;

use once_cell::sync::Lazy;
use rayon::prelude::*;

use crate::base::LineIndex;
use crate::incremental::{EditError, InputEdit, Reuse};
use crate::parser::grammar::{GrammarError, bigquery};
use crate::parser::table::ParseTable;
use crate::parser::{Engine, ParseOptions, SyntaxKind};
use crate::syntax::Tree;

static LANGUAGE: Lazy<Language> = Lazy::new(|| {
    // The grammar is static: a failure here is a bug in the grammar itself.
    Language::new().expect("the BigQuery grammar is well-formed")
});

/// The BigQuery language, built on first use
pub fn language() -> Language {
    LANGUAGE.clone()
}

/// A compiled grammar: the parse table plus symbol metadata.
///
/// Cloning is cheap and the handle can be shared between threads.
#[derive(Debug, Clone)]
pub struct Language {
    table: Arc<ParseTable>,
}

impl Language {
    /// Compile the BigQuery grammar into a fresh table.
    ///
    /// [`language`] caches one instance; this is only needed to measure or
    /// inspect table construction.
    pub fn new() -> Result<Self, GrammarError> {
        let table = ParseTable::build(bigquery::grammar()?);
        Ok(Self {
            table: Arc::new(table),
        })
    }

    pub(crate) fn table(&self) -> &ParseTable {
        &self.table
    }

    /// Number of symbols, token and node kinds together
    pub fn symbol_count(&self) -> usize {
        SyntaxKind::COUNT
    }

    pub fn symbol_name(&self, id: u16) -> Option<&'static str> {
        SyntaxKind::from_raw(id).map(SyntaxKind::name)
    }

    /// Symbol id for a name, ignoring case
    pub fn symbol_for_name(&self, name: &str) -> Option<u16> {
        (0..SyntaxKind::COUNT as u16).find(|&id| {
            SyntaxKind::from_raw(id).is_some_and(|kind| kind.name().eq_ignore_ascii_case(name))
        })
    }

    pub fn state_count(&self) -> usize {
        self.table.state_count()
    }

    /// Parse `text` from scratch with default options.
    pub fn parse(&self, text: &str) -> Tree {
        parse_tree(&self.table, &ParseOptions::default(), text, None)
    }

    /// Parse independent texts in parallel.
    pub fn parse_batch<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Vec<Tree> {
        texts.par_iter().map(|text| self.parse(text.as_ref())).collect()
    }
}

/// A parse session with its options
#[derive(Debug, Clone)]
pub struct Parser {
    language: Language,
    options: ParseOptions,
}

impl Parser {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            options: ParseOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Parse `text`.
    ///
    /// With both an old tree and the edit that turned its text into `text`,
    /// unaffected subtrees of the old tree are reused. Either one alone
    /// gives a full parse.
    pub fn parse(
        &mut self,
        text: &str,
        old: Option<&Tree>,
        edit: Option<&InputEdit>,
    ) -> Result<Tree, EditError> {
        let (Some(old), Some(edit)) = (old, edit) else {
            return Ok(parse_tree(self.language.table(), &self.options, text, None));
        };
        edit.validate(old.text(), text)?;
        tracing::debug!(
            start = edit.start_byte,
            old_end = edit.old_end_byte,
            new_end = edit.new_end_byte,
            "incremental parse"
        );
        let reuse = Reuse::new(old.green().clone(), old.node_info(), edit);
        Ok(parse_tree(self.language.table(), &self.options, text, Some(reuse)))
    }
}

fn parse_tree(
    table: &ParseTable,
    options: &ParseOptions,
    text: &str,
    reuse: Option<Reuse<'_>>,
) -> Tree {
    let lines = LineIndex::new(text);
    let parse = Engine::new(table, options, text, &lines, reuse).parse();
    Tree::new(parse, text, lines)
}
