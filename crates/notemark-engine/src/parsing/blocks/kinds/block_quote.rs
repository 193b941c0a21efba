/// Blockquote marker handling.
pub struct BlockQuote;

impl BlockQuote {
    /// The blockquote prefix character.
    pub const PREFIX: char = '>';
    pub const MAX_INDENT: usize = 3;

    /// Strips one blockquote prefix from a line.
    ///
    /// # Returns
    /// `(marker, content)`: byte offset of the `>` and of the content after
    /// it (one optional space is part of the prefix), or `None` when the line
    /// is not quoted.
    pub fn strip_one(s: &str) -> Option<(usize, usize)> {
        let indent = s.len() - s.trim_start_matches(' ').len();
        if indent > Self::MAX_INDENT || !s[indent..].starts_with(Self::PREFIX) {
            return None;
        }
        let mut content = indent + 1;
        if s.as_bytes().get(content) == Some(&b' ') {
            content += 1;
        }
        Some((indent, content))
    }

    /// Counts nested prefixes, as in `> > text` or `>> text`.
    pub fn depth(s: &str) -> usize {
        let mut depth = 0;
        let mut rest = s;
        while let Some((_, content)) = Self::strip_one(rest) {
            depth += 1;
            rest = &rest[content..];
        }
        depth
    }
}
