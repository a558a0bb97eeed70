//! Error recovery for the shift-reduce engine
//!
//! Two strategies, tried in order:
//! 1. insert one missing token, if the parser can then consume the current
//!    token and a few more
//! 2. skip tokens up to a boundary, popping stack entries until a state
//!    accepts it; everything dropped is wrapped in one ERROR node
//!
//! Each recovery consumes input, or happens at most a bounded number of
//! times at one position, so parsing always terminates.

use std::ops::Range;

use rowan::{GreenNode, GreenToken, NodeOrToken, TextRange, TextSize};

use super::errors::{ErrorCode, ParseContext, SyntaxError, format_context_error};
use super::input::Lexeme;
use super::keywords::keyword_text;
use super::parser::{Engine, RecoveryState, SimStack, StackEntry};
use super::SyntaxKind;

/// Tokens that start a statement or a clause
const BOUNDARIES: &[SyntaxKind] = &[
    SyntaxKind::SEMICOLON,
    SyntaxKind::SELECT_KW,
    SyntaxKind::WITH_KW,
    SyntaxKind::FROM_KW,
    SyntaxKind::WHERE_KW,
    SyntaxKind::GROUP_KW,
    SyntaxKind::HAVING_KW,
    SyntaxKind::QUALIFY_KW,
    SyntaxKind::WINDOW_KW,
    SyntaxKind::ORDER_KW,
    SyntaxKind::LIMIT_KW,
    SyntaxKind::UNION_KW,
    SyntaxKind::INTERSECT_KW,
    SyntaxKind::EXCEPT_KW,
    SyntaxKind::EOF,
];

/// Missing tokens tried before the rest, in this order
const PREFERRED_INSERTIONS: &[SyntaxKind] = &[
    SyntaxKind::IDENT,
    SyntaxKind::NUMBER,
    SyntaxKind::STRING,
    SyntaxKind::R_PAREN,
    SyntaxKind::R_BRACKET,
];

/// Recoveries allowed at one position before a token is dropped unconditionally
const MAX_ATTEMPTS: usize = 8;

/// Stack depths validated against one resume token before it is skipped
const MAX_RESUME_TRIALS: usize = 32;

/// Human-readable name of a token kind
pub(crate) fn describe(kind: SyntaxKind) -> String {
    use SyntaxKind::*;
    if let Some(text) = keyword_text(kind) {
        return text.to_string();
    }
    let text = match kind {
        IDENT | QUOTED_IDENT => "identifier",
        NUMBER => "number",
        STRING => "string",
        BYTES => "bytes literal",
        PARAMETER => "query parameter",
        SYSTEM_VARIABLE => "system variable",
        L_PAREN => "'('",
        R_PAREN => "')'",
        L_BRACKET => "'['",
        R_BRACKET => "']'",
        COMMA => "','",
        DOT => "'.'",
        SEMICOLON => "';'",
        STAR => "'*'",
        EQ => "'='",
        NEQ => "'!='",
        LT => "'<'",
        GT => "'>'",
        LT_EQ => "'<='",
        GT_EQ => "'>='",
        SHL => "'<<'",
        SHR => "'>>'",
        PLUS => "'+'",
        MINUS => "'-'",
        SLASH => "'/'",
        PIPE_PIPE => "'||'",
        PIPE => "'|'",
        AMP => "'&'",
        CARET => "'^'",
        TILDE => "'~'",
        QUESTION => "'?'",
        EOF => "end of input",
        _ => "token",
    };
    text.to_string()
}

impl Engine<'_> {
    /// Repair the input at the current token.
    ///
    /// Returns `false` only when nothing can be done; the caller then builds
    /// the tree from what it has.
    pub(super) fn recover(&mut self) -> bool {
        let current = self.input.peek(0).clone();
        if self.recovery.position != Some(current.full_start) {
            self.recovery = RecoveryState {
                position: Some(current.full_start),
                ..RecoveryState::default()
            };
        }
        self.recovery.attempts += 1;

        // A queued insertion that does not fit after all is dropped.
        if self.injected.take().is_some() {
            self.recovery.insertions = self.options.max_insertions;
        }

        if self.recovery.attempts > MAX_ATTEMPTS {
            if current.kind == SyntaxKind::EOF {
                return false;
            }
            self.skip(1, 0);
            self.report_skip(&current);
            return true;
        }

        if current.kind != SyntaxKind::ERROR_TOKEN
            && self.recovery.insertions < self.options.max_insertions
            && self.try_insert(current.kind, current.full_start)
        {
            return true;
        }
        self.resynchronize(&current);
        true
    }

    /// Queue a missing token if that lets parsing continue.
    fn try_insert(&mut self, current: SyntaxKind, at: TextSize) -> bool {
        let state = self.top_state();
        let mut candidates: Vec<SyntaxKind> = PREFERRED_INSERTIONS
            .iter()
            .copied()
            .filter(|&kind| self.table.has_action(state, kind))
            .collect();
        candidates.extend(self.table.expected(state).filter(|kind| {
            !PREFERRED_INSERTIONS.contains(kind)
                && !matches!(kind, SyntaxKind::EOF | SyntaxKind::ERROR_TOKEN)
        }));

        // The inserted token, the current one, then the validation window
        let required = 2 + self.options.recovery_validation;
        let (mut simulator, entries) = self.simulator();
        let mut work = 0;
        let found = candidates.into_iter().find(|&kind| {
            let mut stack = SimStack::new(entries);
            let consumed = simulator.run(&mut stack, None, Some(kind), 0, required);
            work += stack.work;
            consumed >= required
        });
        self.search_work += work;
        let Some(kind) = found else {
            return false;
        };

        self.recovery.insertions += 1;
        self.injected = Some(kind);
        let context = self.context();
        let code = ErrorCode::for_missing(kind);
        tracing::debug!(missing = ?kind, offset = ?at, "inserting missing token");
        let mut error = SyntaxError::builder(code)
            .message(format!("missing {} {}", describe(kind), context.description()))
            .range(TextRange::empty(at))
            .hint(format!("found {}", describe(current)));
        if let Some((opener, range)) = self.unclosed_opener(kind) {
            error = error.related(format!("{} opened here", describe(opener)), range);
        }
        self.errors.push(error.build());
        true
    }

    /// The innermost `(`, `[` or `<` on the stack left open for `closer`
    fn unclosed_opener(&self, closer: SyntaxKind) -> Option<(SyntaxKind, TextRange)> {
        let opener = match closer {
            SyntaxKind::R_PAREN => SyntaxKind::L_PAREN,
            SyntaxKind::R_BRACKET => SyntaxKind::L_BRACKET,
            SyntaxKind::GT => SyntaxKind::LT,
            _ => return None,
        };
        let mut closed = 0;
        for entry in self.stack.iter().rev() {
            let [NodeOrToken::Token(token)] = entry.elements.as_slice() else {
                continue;
            };
            let kind = SyntaxKind::from(token.kind());
            if kind == closer {
                closed += 1;
            } else if kind == opener {
                if closed == 0 {
                    return Some((opener, TextRange::new(entry.start, entry.end)));
                }
                closed -= 1;
            }
        }
        None
    }

    /// Skip to the nearest point where parsing can resume.
    fn resynchronize(&mut self, current: &Lexeme) {
        let validation = 1 + self.options.recovery_validation;
        let context = self.context();
        let mut skipped = 0;
        loop {
            let kind = self.input.peek(skipped).kind;
            let at_eof = kind == SyntaxKind::EOF;

            if skipped > 0 && self.resume_depth(0..1, skipped, validation).is_some() {
                return self.apply_skip(skipped, 0, current);
            }

            let boundary = at_eof
                || BOUNDARIES.contains(&kind)
                || context.recovery_tokens().contains(&kind);
            if boundary && (skipped > 0 || !self.recovery.popped) {
                let depths = 1..self.stack.len();
                if let Some(depth) = self.resume_depth(depths, skipped, validation) {
                    return self.apply_skip(skipped, depth, current);
                }
            }

            if at_eof {
                let depth = self.stack.len().saturating_sub(1);
                return self.apply_skip(skipped, depth, current);
            }
            skipped += 1;
        }
    }

    /// First of `depths` at which the parser can go on after popping that
    /// many entries and skipping `skipped` tokens.
    ///
    /// A depth whose state has no action for the resume token is rejected
    /// at the cost of one lookup; at most [`MAX_RESUME_TRIALS`] others are
    /// validated by simulating a window of real input.
    fn resume_depth(
        &mut self,
        depths: Range<usize>,
        skipped: usize,
        validation: usize,
    ) -> Option<usize> {
        let (mut simulator, entries) = self.simulator();
        let kind = simulator.peek(skipped);
        let mut work = 0;
        let mut trials = 0;
        let mut found = None;
        for depth in depths {
            let mut stack = SimStack::popped(entries, depth);
            let Some(state) = stack.last() else {
                work += stack.work;
                break;
            };
            if !simulator.accepts(state, kind) {
                work += stack.work;
                continue;
            }
            let consumed = simulator.run(&mut stack, None, None, skipped, validation);
            work += stack.work;
            if consumed >= validation {
                found = Some(depth);
                break;
            }
            trials += 1;
            if trials == MAX_RESUME_TRIALS {
                break;
            }
        }
        self.search_work += work;
        found
    }

    /// Pop `depth` entries and drop `skipped` tokens into one ERROR entry.
    fn apply_skip(&mut self, skipped: usize, depth: usize, current: &Lexeme) {
        if skipped == 0 {
            self.recovery.popped = true;
        }
        tracing::debug!(skipped, depth, "skipping to resynchronize");
        self.skip(skipped, depth);
        if skipped > 0 {
            self.report_skip(current);
        } else {
            let context = self.context();
            self.errors.push(format_context_error(
                &describe(current.kind),
                current.range,
                context,
                ErrorCode::E0303,
            ));
        }
    }

    fn skip(&mut self, skipped: usize, depth: usize) {
        let kept = self.stack.len().saturating_sub(depth).max(1);
        let popped = self.stack.split_off(kept);
        let at = self.input.peek(0).full_start;
        let state = self.top_state();
        let mut entry = StackEntry::from_children(state, popped, at);

        for _ in 0..skipped {
            let lexeme = self.input.bump();
            let trivia = self.input.trivia(&lexeme);
            if entry.elements.is_empty() {
                entry.leading.extend(trivia);
                entry.start = lexeme.range.start();
            } else {
                entry.elements.extend(trivia);
            }
            let text = lexeme.text(self.input.text());
            entry
                .elements
                .push(GreenToken::new(lexeme.kind.into(), text).into());
            entry.end = lexeme.range.end();
        }

        if entry.elements.is_empty() {
            // Only empty entries were popped; keep their trivia in place.
            if !entry.leading.is_empty() {
                entry.extra = true;
                entry.elements = std::mem::take(&mut entry.leading);
                self.stack.push(entry);
            }
            return;
        }
        let error = GreenNode::new(SyntaxKind::ERROR.into(), std::mem::take(&mut entry.elements));
        entry.elements.push(error.into());
        entry.has_error = true;
        entry.extra = true;
        self.stack.push(entry);
    }

    fn report_skip(&mut self, first: &Lexeme) {
        let text = first.text(self.input.text());
        if first.kind == SyntaxKind::ERROR_TOKEN {
            let code = ErrorCode::for_lex_error(text);
            self.errors
                .push(SyntaxError::new(code.default_message(), first.range, code));
            return;
        }
        let context = self.context();
        let found = if first.kind.is_keyword() {
            describe(first.kind)
        } else {
            format!("'{text}'")
        };
        self.errors.push(format_context_error(
            &found,
            first.range,
            context,
            ErrorCode::E0901,
        ));
    }

    /// Innermost construct under construction
    pub(super) fn context(&self) -> ParseContext {
        self.stack
            .iter()
            .rev()
            .find_map(|entry| self.table.state_context(entry.state))
            .map_or(ParseContext::TopLevel, ParseContext::for_kind)
    }
}
