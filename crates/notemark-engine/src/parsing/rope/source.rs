use std::borrow::Cow;

use xi_rope::Rope;

use super::span::{Position, Span};

/// One line of the virgin source.
#[derive(Debug, Clone)]
pub struct LineRef {
    /// Byte offset of the first character of the line in the rope.
    pub offset: usize,
    /// Line text without its terminator (`\n` or `\r\n`).
    pub text: String,
}

/// The unmodified note text, indexed by line.
///
/// Every span produced by the parser refers to positions in this text, so it
/// is also what round-trip checks slice against.
#[derive(Debug, Clone)]
pub struct SourceText {
    rope: Rope,
    lines: Vec<LineRef>,
}

impl SourceText {
    pub fn new(text: &str) -> Self {
        let rope = Rope::from(text);
        let lines = lines_with_offsets(&rope).collect();
        Self { rope, lines }
    }

    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[LineRef] {
        &self.lines
    }

    /// Text of line `n`, or an empty string past the end.
    pub fn line(&self, n: usize) -> &str {
        self.lines.get(n).map_or("", |l| l.text.as_str())
    }

    /// The character starting at `pos`, if any.
    pub fn char_at(&self, pos: Position) -> Option<char> {
        self.line(pos.line).get(pos.column..)?.chars().next()
    }

    /// The character ending right before `pos`. `None` at the start of a line.
    pub fn char_before(&self, pos: Position) -> Option<char> {
        self.line(pos.line).get(..pos.column)?.chars().next_back()
    }

    /// Extracts the text covered by an inclusive span.
    ///
    /// `end_column` is the last byte of the span. Multi-line spans keep their
    /// line breaks as `\n`. Returns `None` when the span does not land on
    /// character boundaries of the source.
    pub fn slice(&self, sp: Span) -> Option<Cow<'_, str>> {
        let start = self.offset_of(sp.start())?;
        let end = self.offset_of(Position::new(sp.end_line, sp.end_column + 1))?;
        if start > end {
            return None;
        }
        if sp.is_single_line() {
            return self.line(sp.start_line).get(sp.start_column..=sp.end_column).map(Cow::Borrowed);
        }
        let raw = self.rope.slice_to_cow(start..end);
        Some(Cow::Owned(raw.replace("\r\n", "\n")))
    }

    /// Byte offset of `pos` in the rope, when it lands on a character
    /// boundary of an existing line. The column one past the last byte is
    /// allowed.
    pub fn offset_of(&self, pos: Position) -> Option<usize> {
        let line = self.lines.get(pos.line)?;
        line.text.is_char_boundary(pos.column).then_some(line.offset + pos.column)
    }
}

/// Iterates the rope's lines with their byte offsets, stripping terminators.
fn lines_with_offsets(rope: &Rope) -> impl Iterator<Item = LineRef> + '_ {
    let mut offset = 0usize;
    rope.lines_raw(..).map(move |line| {
        let start = offset;
        offset += line.len();
        let text = line.trim_end_matches('\n').trim_end_matches('\r').to_string();
        LineRef { offset: start, text }
    })
}
