//! Inline-eligible content collected by the segmenter.
//!
//! Block matching works on the normalized copy, but inline construction must
//! see exactly what the user typed. Each [`ContentLine`] therefore holds a
//! slice of the virgin line and the column it starts at.

use super::normalize::WorkLine;
use crate::parsing::rope::{Position, SourceText, Span};

/// One line of a block's content in virgin coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    pub line: usize,
    /// Virgin column of the first byte of `text`.
    pub column: usize,
    pub text: String,
}

impl ContentLine {
    /// Slices the virgin line between two local offsets of a work line.
    ///
    /// Leading spaces are skipped so content always starts on a visible
    /// character.
    pub fn from_work(source: &SourceText, work: &WorkLine<'_>, from: usize, to: usize) -> Self {
        let line = work.number();
        let raw = source.line(line);
        let start = work.virgin(from).min(raw.len());
        let end = work.virgin(to).clamp(start, raw.len());
        let slice = raw.get(start..end).unwrap_or("");
        let trimmed = slice.trim_start_matches([' ', '\t', '\u{a0}']);
        Self {
            line,
            column: start + (slice.len() - trimmed.len()),
            text: trimmed.to_string(),
        }
    }

    pub fn start(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Column of the last non-whitespace byte, or the start column when blank.
    pub fn last_column(&self) -> usize {
        let t = self.text.trim_end();
        if t.is_empty() {
            self.column
        } else {
            self.column + t.len() - 1
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// The content lines of one inline-bearing block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineSource {
    pub lines: Vec<ContentLine>,
}

impl InlineSource {
    pub fn new(lines: Vec<ContentLine>) -> Self {
        Self { lines }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(ContentLine::is_blank)
    }

    /// Span from the first visible byte to the last one.
    pub fn span(&self) -> Option<Span> {
        let first = self.lines.iter().find(|l| !l.is_blank())?;
        let last = self.lines.iter().rev().find(|l| !l.is_blank())?;
        Some(Span::new(first.line, first.column, last.line, last.last_column()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::blocks::normalize::Normalizer;

    #[test]
    fn content_line_uses_virgin_columns() {
        let src = SourceText::new(">\tquoted  ");
        let norm = Normalizer::line(0, src.line(0));
        let work = WorkLine::new(&norm).advance(1);
        let cl = ContentLine::from_work(&src, &work, 0, work.text().len());
        assert_eq!(cl.column, 2);
        assert_eq!(cl.text, "quoted  ");
        assert_eq!(cl.last_column(), 7);
    }

    #[test]
    fn last_column_covers_multibyte_char() {
        let cl = ContentLine {
            line: 0,
            column: 0,
            text: "a👩".into(),
        };
        assert_eq!(cl.last_column(), 4);
    }

    #[test]
    fn span_skips_blank_lines() {
        let src = InlineSource::new(vec![
            ContentLine { line: 0, column: 2, text: "ab".into() },
            ContentLine { line: 1, column: 0, text: String::new() },
        ]);
        assert_eq!(src.span(), Some(Span::new(0, 2, 0, 3)));
    }
}
