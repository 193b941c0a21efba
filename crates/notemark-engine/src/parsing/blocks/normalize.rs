//! Working copy of the source used for block matching.
//!
//! Tabs become four spaces and no-break spaces become plain spaces. Each
//! replacement is recorded as a [`Shift`] so that any offset in the working
//! copy can be mapped back to the column the user actually typed.

use crate::parsing::rope::SourceText;

/// One replacement made in a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
    /// Offset in the normalized line where the replacement starts.
    pub at: usize,
    /// Length of the replacement in the normalized line.
    pub width: usize,
    /// Normalized length minus virgin length.
    pub delta: isize,
}

/// Maps normalized offsets of one line back to virgin columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    shifts: Vec<Shift>,
}

impl ColumnMap {
    /// Virgin column of a normalized offset.
    ///
    /// Offsets inside a replacement map to the replaced character.
    pub fn to_virgin(&self, normalized: usize) -> usize {
        let mut consumed: isize = 0;
        for s in &self.shifts {
            if normalized < s.at {
                break;
            }
            if normalized < s.at + s.width {
                return (s.at as isize - consumed) as usize;
            }
            consumed += s.delta;
        }
        (normalized as isize - consumed) as usize
    }

    pub fn is_identity(&self) -> bool {
        self.shifts.is_empty()
    }
}

/// A source line after normalization.
#[derive(Debug, Clone)]
pub struct NormalizedLine {
    pub number: usize,
    pub text: String,
    pub map: ColumnMap,
}

pub struct Normalizer;

impl Normalizer {
    pub const TAB_WIDTH: usize = 4;
    const NBSP: char = '\u{a0}';

    pub fn line(number: usize, raw: &str) -> NormalizedLine {
        let mut text = String::with_capacity(raw.len());
        let mut map = ColumnMap::default();
        for c in raw.chars() {
            match c {
                '\t' => {
                    map.shifts.push(Shift {
                        at: text.len(),
                        width: Self::TAB_WIDTH,
                        delta: Self::TAB_WIDTH as isize - 1,
                    });
                    text.push_str("    ");
                }
                Self::NBSP => {
                    map.shifts.push(Shift {
                        at: text.len(),
                        width: 1,
                        delta: 1 - Self::NBSP.len_utf8() as isize,
                    });
                    text.push(' ');
                }
                c => text.push(c),
            }
        }
        // Whitespace-only lines count as blank.
        if text.trim().is_empty() {
            text.clear();
            map.shifts.clear();
        }
        NormalizedLine { number, text, map }
    }

    pub fn source(source: &SourceText) -> Vec<NormalizedLine> {
        source
            .lines()
            .iter()
            .enumerate()
            .map(|(n, l)| Self::line(n, &l.text))
            .collect()
    }
}

/// A view of a normalized line with container prefixes stripped.
#[derive(Debug, Clone, Copy)]
pub struct WorkLine<'a> {
    pub line: &'a NormalizedLine,
    /// Normalized offset where this view starts.
    pub start: usize,
}

impl<'a> WorkLine<'a> {
    pub fn new(line: &'a NormalizedLine) -> Self {
        Self { line, start: 0 }
    }

    pub fn number(&self) -> usize {
        self.line.number
    }

    pub fn text(&self) -> &'a str {
        self.line.text.get(self.start..).unwrap_or("")
    }

    pub fn is_blank(&self) -> bool {
        self.text().trim().is_empty()
    }

    /// Leading spaces of the view.
    pub fn indent(&self) -> usize {
        self.text().len() - self.text().trim_start_matches(' ').len()
    }

    /// The view with `n` more bytes stripped from its front.
    #[must_use]
    pub fn advance(self, n: usize) -> Self {
        let len = self.line.text.len();
        Self {
            line: self.line,
            start: (self.start + n).min(len),
        }
    }

    /// Strips up to `n` leading spaces.
    #[must_use]
    pub fn dedent(self, n: usize) -> Self {
        let k = self.indent().min(n);
        self.advance(k)
    }

    /// Virgin column of a local offset in this view.
    pub fn virgin(&self, local: usize) -> usize {
        self.line.map.to_virgin(self.start + local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabs_expand_and_map_back() {
        let l = Normalizer::line(0, "\tab\tc");
        assert_eq!(l.text, "    ab    c");
        assert_eq!(l.map.to_virgin(0), 0);
        assert_eq!(l.map.to_virgin(2), 0);
        assert_eq!(l.map.to_virgin(4), 1);
        assert_eq!(l.map.to_virgin(5), 2);
        assert_eq!(l.map.to_virgin(7), 3);
        assert_eq!(l.map.to_virgin(10), 4);
    }

    #[test]
    fn nbsp_shrinks_line() {
        let l = Normalizer::line(0, "a\u{a0}b");
        assert_eq!(l.text, "a b");
        assert_eq!(l.map.to_virgin(2), 3);
    }

    #[test]
    fn whitespace_only_line_is_blank() {
        let l = Normalizer::line(3, " \t ");
        assert_eq!(l.text, "");
        assert!(l.map.is_identity());
        assert!(WorkLine::new(&l).is_blank());
    }

    #[test]
    fn work_line_views() {
        let l = Normalizer::line(0, ">   code");
        let w = WorkLine::new(&l).advance(1);
        assert_eq!(w.indent(), 3);
        let w = w.dedent(2);
        assert_eq!(w.text(), " code");
        assert_eq!(w.virgin(1), 4);
    }
}
