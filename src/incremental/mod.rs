//! Incremental reparsing
//!
//! An [`InputEdit`] describes one text replacement. Given the tree of the
//! text before the edit, the parser takes over every old subtree that the
//! edit cannot have affected and only re-derives the rest.

mod reuse;

pub(crate) use reuse::Reuse;

use std::ops::Range;

use thiserror::Error;

use crate::base::{LineCol, LineIndex, TextSize};

/// A single replacement of `start_byte..old_end_byte` by the bytes
/// `start_byte..new_end_byte` of the new text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputEdit {
    pub start_byte: usize,
    pub old_end_byte: usize,
    pub new_end_byte: usize,
    pub start_position: LineCol,
    pub old_end_position: LineCol,
    pub new_end_position: LineCol,
}

/// A malformed edit
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("edit range is inverted: start {start} is after end {end}")]
    InvertedRange { start: usize, end: usize },
    #[error("edit offset {offset} is beyond the end of the text ({len} bytes)")]
    OutOfBounds { offset: usize, len: usize },
    #[error("new text is {actual} bytes long, the edit implies {expected}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("edit offset {offset} is not on a char boundary")]
    NotCharBoundary { offset: usize },
}

impl InputEdit {
    /// Replace `range` of `old_text` by `replacement`.
    ///
    /// Returns the edit together with the new text, or an error when `range`
    /// does not select whole characters of `old_text`.
    pub fn replace(
        old_text: &str,
        range: Range<usize>,
        replacement: &str,
    ) -> Result<(Self, String), EditError> {
        check_span(old_text, range.start, range.end)?;
        let mut new_text = String::with_capacity(old_text.len() + replacement.len());
        new_text.push_str(&old_text[..range.start]);
        new_text.push_str(replacement);
        new_text.push_str(&old_text[range.end..]);

        let lines = LineIndex::new(old_text);
        let start_position = lines.line_col(offset(range.start));
        let edit = Self {
            start_byte: range.start,
            old_end_byte: range.end,
            new_end_byte: range.start + replacement.len(),
            start_position,
            old_end_position: lines.line_col(offset(range.end)),
            new_end_position: start_position.advance(replacement),
        };
        Ok((edit, new_text))
    }

    /// Bytes added by the edit, negative when text was removed
    pub fn delta(&self) -> isize {
        self.new_end_byte as isize - self.old_end_byte as isize
    }

    /// Check the edit against the texts before and after it.
    pub fn validate(&self, old_text: &str, new_text: &str) -> Result<(), EditError> {
        check_span(old_text, self.start_byte, self.old_end_byte)?;
        check_span(new_text, self.start_byte, self.new_end_byte)?;

        let expected = old_text.len() - self.old_end_byte + self.new_end_byte;
        if new_text.len() != expected {
            return Err(EditError::LengthMismatch {
                expected,
                actual: new_text.len(),
            });
        }
        Ok(())
    }
}

/// `start..end` must be ordered, inside `text` and on char boundaries.
fn check_span(text: &str, start: usize, end: usize) -> Result<(), EditError> {
    if start > end {
        return Err(EditError::InvertedRange { start, end });
    }
    if end > text.len() {
        return Err(EditError::OutOfBounds {
            offset: end,
            len: text.len(),
        });
    }
    match [start, end].into_iter().find(|&at| !text.is_char_boundary(at)) {
        Some(offset) => Err(EditError::NotCharBoundary { offset }),
        None => Ok(()),
    }
}

fn offset(bytes: usize) -> TextSize {
    TextSize::new(bytes as u32)
}
