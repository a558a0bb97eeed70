//! Logos-based lexer for BigQuery SQL
//!
//! Fast tokenization using the logos crate. The lexer is pull-based and can be
//! restarted from any [`LexerState`] taken at a token boundary, which is what
//! the incremental parser relies on when it skips over reused subtrees.

use super::keywords::keyword_kind;
use super::syntax_kind::SyntaxKind;
use crate::base::LineCol;
use logos::Logos;
use rowan::{TextRange, TextSize};
use smol_str::SmolStr;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
    pub start: LineCol,
    pub end: LineCol,
}

impl Token<'_> {
    pub fn range(&self) -> TextRange {
        TextRange::at(self.offset, TextSize::of(self.text))
    }

    /// Unquoted contents of string, bytes and quoted identifier tokens.
    pub fn value(&self) -> Option<SmolStr> {
        literal_value(self.kind, self.text)
    }
}

/// Where the lexer resumes: a byte offset and the point at that offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexerState {
    pub offset: TextSize,
    pub point: LineCol,
}

impl LexerState {
    pub fn new(offset: TextSize, point: LineCol) -> Self {
        Self { offset, point }
    }
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    base: TextSize,
    point: LineCol,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::at(input, LexerState::default())
    }

    /// Start lexing `input` at a previously saved state.
    pub fn at(input: &'a str, state: LexerState) -> Self {
        let start = usize::from(state.offset).min(input.len());
        let rest = input.get(start..).unwrap_or("");
        Self {
            inner: LogosToken::lexer(rest),
            base: TextSize::new(start as u32),
            point: state.point,
        }
    }

    /// State to resume from after the last returned token.
    pub fn state(&self) -> LexerState {
        LexerState {
            offset: self.base + TextSize::new(self.inner.span().end as u32),
            point: self.point,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = self.base + TextSize::new(self.inner.span().start as u32);

        let kind = match logos_token {
            Ok(LogosToken::Ident) => keyword_kind(text).unwrap_or(SyntaxKind::IDENT),
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR_TOKEN,
        };

        let start = self.point;
        self.point = start.advance(text);
        Some(Token {
            kind,
            text,
            offset,
            start,
            end: self.point,
        })
    }
}

/// Lex a single token of `text` starting at `state`.
///
/// Returns the token and the state to continue from, or `None` at the end of
/// the input. Lexing is a pure function of its arguments.
pub fn tokenize(text: &str, state: LexerState) -> Option<(Token<'_>, LexerState)> {
    let mut lexer = Lexer::at(text, state);
    let token = lexer.next()?;
    let next = lexer.state();
    Some((token, next))
}

/// Tokenize an entire string into a Vec
pub fn tokenize_all(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"--[^\n]*")]
    #[regex(r"#[^\n]*")]
    LineComment,

    #[token("/*", lex_block_comment)]
    BlockComment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[token("`", lex_quoted)]
    QuotedIdent,

    #[regex(r"[0-9]+", lex_number)]
    #[regex(r"\.[0-9]+", lex_number)]
    #[regex(r"0[xX][0-9a-fA-F]+")]
    Number,

    #[regex(r#"[rR]?('|"|'''|""")"#, lex_quoted)]
    String,

    #[regex(r#"([bB]|[rR][bB]|[bB][rR])('|"|'''|""")"#, lex_quoted)]
    Bytes,

    #[regex(r"@[a-zA-Z_][a-zA-Z0-9_]*")]
    Parameter,

    #[regex(r"@@[a-zA-Z_][a-zA-Z0-9_.]*")]
    SystemVariable,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("!=")]
    #[token("<>")]
    Neq,

    #[token("<=")]
    LtEq,

    #[token(">=")]
    GtEq,

    #[token("||")]
    PipePipe,

    #[token("<<")]
    Shl,

    #[token(">>")]
    Shr,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token(";")]
    Semicolon,

    #[token("*")]
    Star,

    #[token("=")]
    Eq,

    #[token("<")]
    Lt,

    #[token(">")]
    Gt,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("/")]
    Slash,

    #[token("|")]
    Pipe,

    #[token("&")]
    Amp,

    #[token("^")]
    Caret,

    #[token("~")]
    Tilde,

    #[token("?")]
    Question,
}

/// Consume a block comment body; unterminated comments run to the end and fail.
fn lex_block_comment(lex: &mut logos::Lexer<LogosToken>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => {
            lex.bump(lex.remainder().len());
            false
        }
    }
}

/// Consume the body of a quoted token whose opening quote (and prefix) was matched.
///
/// Single-quoted forms stop at a newline; triple-quoted forms and quoted
/// identifiers may span lines. A backslash always escapes the next character.
fn lex_quoted(lex: &mut logos::Lexer<LogosToken>) -> bool {
    let opener = lex.slice();
    let quote = opener.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    let multiline = quote.len() == 3 || quote == "`";
    let closing = quote.as_bytes();

    let rest = lex.remainder().as_bytes();
    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            b'\\' => i += 2,
            b'\n' if !multiline => {
                lex.bump(i);
                return false;
            }
            _ if rest[i..].starts_with(closing) => {
                lex.bump(i + closing.len());
                return true;
            }
            _ => i += 1,
        }
    }
    lex.bump(rest.len());
    false
}

/// Extend an integer or `.digits` prefix with a fraction and an exponent.
fn lex_number(lex: &mut logos::Lexer<LogosToken>) {
    let rest = lex.remainder().as_bytes();
    let digits = |from: usize| rest[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let mut len = 0;
    if !lex.slice().starts_with('.') && rest.first() == Some(&b'.') {
        len = 1 + digits(1);
    }
    if matches!(rest.get(len), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(rest.get(len + 1), Some(b'+' | b'-')));
        let exponent = digits(len + 1 + sign);
        if exponent > 0 {
            len += 1 + sign + exponent;
        }
    }
    lex.bump(len);
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::Whitespace => SyntaxKind::WHITESPACE,
            LogosToken::LineComment => SyntaxKind::LINE_COMMENT,
            LogosToken::BlockComment => SyntaxKind::BLOCK_COMMENT,
            LogosToken::Ident => SyntaxKind::IDENT,
            LogosToken::QuotedIdent => SyntaxKind::QUOTED_IDENT,
            LogosToken::Number => SyntaxKind::NUMBER,
            LogosToken::String => SyntaxKind::STRING,
            LogosToken::Bytes => SyntaxKind::BYTES,
            LogosToken::Parameter => SyntaxKind::PARAMETER,
            LogosToken::SystemVariable => SyntaxKind::SYSTEM_VARIABLE,
            LogosToken::Neq => SyntaxKind::NEQ,
            LogosToken::LtEq => SyntaxKind::LT_EQ,
            LogosToken::GtEq => SyntaxKind::GT_EQ,
            LogosToken::PipePipe => SyntaxKind::PIPE_PIPE,
            LogosToken::Shl => SyntaxKind::SHL,
            LogosToken::Shr => SyntaxKind::SHR,
            LogosToken::LParen => SyntaxKind::L_PAREN,
            LogosToken::RParen => SyntaxKind::R_PAREN,
            LogosToken::LBracket => SyntaxKind::L_BRACKET,
            LogosToken::RBracket => SyntaxKind::R_BRACKET,
            LogosToken::Comma => SyntaxKind::COMMA,
            LogosToken::Dot => SyntaxKind::DOT,
            LogosToken::Semicolon => SyntaxKind::SEMICOLON,
            LogosToken::Star => SyntaxKind::STAR,
            LogosToken::Eq => SyntaxKind::EQ,
            LogosToken::Lt => SyntaxKind::LT,
            LogosToken::Gt => SyntaxKind::GT,
            LogosToken::Plus => SyntaxKind::PLUS,
            LogosToken::Minus => SyntaxKind::MINUS,
            LogosToken::Slash => SyntaxKind::SLASH,
            LogosToken::Pipe => SyntaxKind::PIPE,
            LogosToken::Amp => SyntaxKind::AMP,
            LogosToken::Caret => SyntaxKind::CARET,
            LogosToken::Tilde => SyntaxKind::TILDE,
            LogosToken::Question => SyntaxKind::QUESTION,
        }
    }
}

/// Strip the prefix and quotes of a literal token and resolve escapes.
pub fn literal_value(kind: SyntaxKind, text: &str) -> Option<SmolStr> {
    if !matches!(kind, SyntaxKind::STRING | SyntaxKind::BYTES | SyntaxKind::QUOTED_IDENT) {
        return None;
    }
    let prefix_len = text
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(text.len());
    let (prefix, quoted) = text.split_at(prefix_len);
    let raw = prefix.contains(['r', 'R']);
    let quote_len = if quoted.starts_with("'''") || quoted.starts_with("\"\"\"") {
        3
    } else {
        1
    };
    let body = quoted.get(quote_len..quoted.len().checked_sub(quote_len)?)?;
    if raw || !body.contains('\\') {
        return Some(SmolStr::new(body));
    }

    let mut value = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some('r') => value.push('\r'),
            Some('0') => value.push('\0'),
            Some(other) => value.push(other),
            None => value.push('\\'),
        }
    }
    Some(SmolStr::new(value))
}
