use serde::Serialize;

/// A `(line, column)` location in the virgin source.
///
/// Columns are byte offsets inside the line, both coordinates are 0-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// An inclusive range `[start, end]` of source positions.
///
/// Unlike a byte range, both ends point at real characters: a one character
/// span has `start_column == end_column`. Field order gives the derived
/// ordering "by start, then by end", which is the document order used when
/// sorting style delimiters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Span {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl Span {
    pub const fn new(start_line: usize, start_column: usize, end_line: usize, end_column: usize) -> Self {
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// A span confined to one line.
    pub const fn on_line(line: usize, start_column: usize, end_column: usize) -> Self {
        Self::new(line, start_column, line, end_column)
    }

    /// A span covering `len` bytes starting at `pos`. `len` must be non-zero.
    pub fn from_len(pos: Position, len: usize) -> Self {
        Self::on_line(pos.line, pos.column, pos.column + len.max(1) - 1)
    }

    /// Smallest span covering both `a` and `b`.
    pub fn cover(a: Span, b: Span) -> Self {
        let start = a.start().min(b.start());
        let end = a.end().max(b.end());
        Self::new(start.line, start.column, end.line, end.column)
    }

    #[must_use]
    pub fn start(self) -> Position {
        Position::new(self.start_line, self.start_column)
    }

    #[must_use]
    pub fn end(self) -> Position {
        Position::new(self.end_line, self.end_column)
    }

    /// Number of bytes covered when the span sits on one line.
    #[must_use]
    pub fn width(self) -> usize {
        (self.end_column + 1).saturating_sub(self.start_column)
    }

    #[must_use]
    pub fn is_single_line(self) -> bool {
        self.start_line == self.end_line
    }

    /// Inclusive containment of a position.
    #[must_use]
    pub fn contains(self, pos: Position) -> bool {
        self.start() <= pos && pos <= self.end()
    }

    /// Whether `other` lies entirely inside `self`.
    #[must_use]
    pub fn encloses(self, other: Span) -> bool {
        self.contains(other.start()) && self.contains(other.end())
    }

    /// Whether the two spans share at least one position.
    #[must_use]
    pub fn intersects(self, other: Span) -> bool {
        self.start() <= other.end() && other.start() <= self.end()
    }

    /// Whether `self` ends strictly before `other` starts.
    #[must_use]
    pub fn is_before(self, other: Span) -> bool {
        self.end() < other.start()
    }

    /// Whether this span sits between an opening and a closing delimiter.
    ///
    /// The check is inclusive on the delimiters themselves. With `relaxed`
    /// set, one extra column is allowed on either side so that a cursor placed
    /// right before the opener or right after the closer still counts.
    #[must_use]
    pub fn is_between(self, open: Span, close: Span, relaxed: bool) -> bool {
        let widen = usize::from(relaxed);
        let lower = Position::new(open.start_line, open.start_column.saturating_sub(widen));
        let upper = Position::new(close.end_line, close.end_column + widen);
        lower <= self.start() && self.end() <= upper
    }
}
