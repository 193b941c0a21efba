use crate::parsing::blocks::InlineSource;
use crate::parsing::rope::{Position, Span};

/// The lines of one paragraph joined by `\n`, with a way back to the
/// virgin `(line, column)` of every byte.
#[derive(Debug, Clone, Default)]
pub struct ParaText {
    pub text: String,
    /// `(flat offset, source line, source column)` of each line start.
    starts: Vec<(usize, usize, usize)>,
}

impl ParaText {
    pub fn new(source: &InlineSource) -> Self {
        let mut text = String::new();
        let mut starts = Vec::with_capacity(source.lines.len());
        for (n, line) in source.lines.iter().enumerate() {
            if n > 0 {
                text.push('\n');
            }
            starts.push((text.len(), line.line, line.column));
            text.push_str(&line.text);
        }
        Self { text, starts }
    }

    fn line_of(&self, offset: usize) -> (usize, usize, usize) {
        let k = self.starts.partition_point(|(o, _, _)| *o <= offset).saturating_sub(1);
        self.starts.get(k).copied().unwrap_or_default()
    }

    /// Virgin position of the byte at `offset`.
    pub fn pos(&self, offset: usize) -> Position {
        let (flat, line, column) = self.line_of(offset);
        Position::new(line, column + offset - flat)
    }

    /// Inclusive span of the flat range `start..end`. `end` must exceed `start`.
    pub fn span(&self, start: usize, end: usize) -> Span {
        let a = self.pos(start);
        let b = self.pos(end.max(start + 1) - 1);
        Span::new(a.line, a.column, b.line, b.column)
    }

    /// End offset of the line holding `offset`, excluding the newline.
    pub fn line_end(&self, offset: usize) -> usize {
        self.text[offset..].find('\n').map_or(self.text.len(), |k| offset + k)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn char_before(&self, offset: usize) -> Option<char> {
        self.text.get(..offset)?.chars().next_back()
    }

    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.text.get(offset..)?.chars().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::blocks::ContentLine;

    fn source() -> InlineSource {
        InlineSource::new(vec![
            ContentLine { line: 2, column: 2, text: "ab".into() },
            ContentLine { line: 3, column: 0, text: "cd".into() },
        ])
    }

    #[test]
    fn offsets_map_back_to_lines() {
        let t = ParaText::new(&source());
        assert_eq!(t.text, "ab\ncd");
        assert_eq!(t.pos(0), Position::new(2, 2));
        assert_eq!(t.pos(1), Position::new(2, 3));
        assert_eq!(t.pos(3), Position::new(3, 0));
        assert_eq!(t.span(1, 5), Span::new(2, 3, 3, 1));
    }

    #[test]
    fn line_end_stops_at_newline() {
        let t = ParaText::new(&source());
        assert_eq!(t.line_end(0), 2);
        assert_eq!(t.line_end(3), 5);
    }
}
