//! Buffered token input for the parser engine
//!
//! Trivia is folded into the following token as leading trivia, so the
//! engine only ever sees significant tokens plus a final `EOF` that carries
//! the trailing trivia.

use std::collections::VecDeque;

use rowan::{GreenToken, NodeOrToken, TextRange, TextSize};

use super::lexer::{Lexer, LexerState};
use super::SyntaxKind;
use crate::base::LineIndex;

/// Bytes past the end of a token that the lexer may have looked at
const LEXER_LOOKAHEAD: u32 = 3;

/// A significant token with the trivia in front of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Lexeme {
    pub kind: SyntaxKind,
    pub range: TextRange,
    /// Start of the leading trivia, or of the token itself
    pub full_start: TextSize,
    pub leading: Vec<(SyntaxKind, TextRange)>,
}

impl Lexeme {
    pub fn text<'t>(&self, source: &'t str) -> &'t str {
        &source[self.range]
    }
}

pub(crate) struct TokenSource<'t> {
    text: &'t str,
    lexer: Lexer<'t>,
    buffer: VecDeque<Lexeme>,
    examined: TextSize,
}

impl<'t> TokenSource<'t> {
    pub fn new(text: &'t str) -> Self {
        Self {
            text,
            lexer: Lexer::new(text),
            buffer: VecDeque::new(),
            examined: TextSize::new(0),
        }
    }

    pub fn text(&self) -> &'t str {
        self.text
    }

    /// The `n`th significant token ahead, `EOF` past the end
    pub fn peek(&mut self, n: usize) -> &Lexeme {
        while self.buffer.len() <= n {
            let lexeme = self.lex();
            self.buffer.push_back(lexeme);
        }
        &self.buffer[n]
    }

    pub fn bump(&mut self) -> Lexeme {
        self.peek(0);
        // `peek` guarantees the buffer is non-empty
        self.buffer
            .pop_front()
            .unwrap_or_else(|| self.eof(Vec::new(), TextSize::of(self.text)))
    }

    /// Read a `>>` in front as two `>` tokens, closing two type brackets.
    pub fn split_shift_right(&mut self) {
        let Some(front) = self.buffer.front_mut() else {
            return;
        };
        if front.kind != SyntaxKind::SHR {
            return;
        }
        let middle = front.range.start() + TextSize::new(1);
        let second = Lexeme {
            kind: SyntaxKind::GT,
            range: TextRange::new(middle, front.range.end()),
            full_start: middle,
            leading: Vec::new(),
        };
        front.kind = SyntaxKind::GT;
        front.range = TextRange::new(front.range.start(), middle);
        self.buffer.insert(1, second);
    }

    /// Furthest byte any lookahead has depended on
    pub fn examined(&self) -> TextSize {
        self.examined
    }

    pub fn mark_examined(&mut self, offset: TextSize) {
        self.examined = self.examined.max(offset);
    }

    /// Drop the lookahead buffer and continue lexing at `offset`.
    pub fn reset(&mut self, offset: TextSize, lines: &LineIndex) {
        let state = LexerState::new(offset, lines.line_col(offset));
        self.lexer = Lexer::at(self.text, state);
        self.buffer.clear();
    }

    fn lex(&mut self) -> Lexeme {
        let mut leading = Vec::new();
        let mut full_start = None;
        for token in self.lexer.by_ref() {
            let range = token.range();
            full_start.get_or_insert(range.start());
            self.examined = self.examined.max(range.end() + TextSize::new(LEXER_LOOKAHEAD));
            if token.kind.is_trivia() {
                leading.push((token.kind, range));
                continue;
            }
            return Lexeme {
                kind: token.kind,
                range,
                full_start: full_start.unwrap_or(range.start()),
                leading,
            };
        }
        let end = TextSize::of(self.text);
        self.examined = self.examined.max(end + TextSize::new(LEXER_LOOKAHEAD));
        self.eof(leading, full_start.unwrap_or(end))
    }

    fn eof(&self, leading: Vec<(SyntaxKind, TextRange)>, full_start: TextSize) -> Lexeme {
        Lexeme {
            kind: SyntaxKind::EOF,
            range: TextRange::empty(TextSize::of(self.text)),
            full_start,
            leading,
        }
    }

    /// Green tokens for the leading trivia of `lexeme`
    pub fn trivia(&self, lexeme: &Lexeme) -> Vec<NodeOrToken<rowan::GreenNode, GreenToken>> {
        lexeme
            .leading
            .iter()
            .map(|&(kind, range)| NodeOrToken::Token(GreenToken::new(kind.into(), &self.text[range])))
            .collect()
    }
}
