//! Byte offsets and line/column points.
//!
//! Byte offsets are the primary coordinate system; `LineCol` points are
//! derived from them through a [`LineIndex`] built once per source text.

pub use text_size::{TextRange, TextSize};

/// A zero-based line and byte column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

impl LineCol {
    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }

    /// The point reached after walking over `text` starting at `self`.
    pub fn advance(self, text: &str) -> Self {
        match text.rfind('\n') {
            Some(last) => {
                let newlines = text.bytes().filter(|&b| b == b'\n').count() as u32;
                Self {
                    line: self.line + newlines,
                    col: (text.len() - last - 1) as u32,
                }
            }
            None => Self {
                line: self.line,
                col: self.col + text.len() as u32,
            },
        }
    }
}

impl std::fmt::Display for LineCol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

/// Maps byte offsets to line/column points and back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Offset of the first byte of every line.
    line_starts: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| TextSize::new(i as u32 + 1)),
        );
        Self {
            line_starts,
            len: TextSize::of(text),
        }
    }

    /// Number of lines, counting a trailing empty line.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Length of the indexed text.
    pub fn len(&self) -> TextSize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == TextSize::new(0)
    }

    /// Convert a byte offset into a point. Offsets past the end clamp to the end.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.len);
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let col = offset - self.line_starts[line];
        LineCol::new(line as u32, col.into())
    }

    /// Convert a point back into a byte offset, if it lies inside the text.
    pub fn offset(&self, point: LineCol) -> Option<TextSize> {
        let start = *self.line_starts.get(point.line as usize)?;
        let line_end = self
            .line_starts
            .get(point.line as usize + 1)
            .copied()
            .unwrap_or(self.len);
        let offset = start + TextSize::new(point.col);
        (offset <= line_end).then_some(offset)
    }
}
