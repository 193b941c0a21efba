/// A byte cursor over a paragraph's flat text.
///
/// Recognizers take `&mut Cursor`, advance it on success and restore a saved
/// copy on failure.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The string being parsed.
    pub s: &'a str,
    /// Current byte index into `s`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    /// A cursor placed at byte `i`.
    pub fn at(s: &'a str, i: usize) -> Self {
        Self { s, i }
    }

    /// Returns the current byte offset.
    pub fn pos(&self) -> usize {
        self.i
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    /// Peeks at the current byte without advancing.
    pub fn peek(&self) -> Option<u8> {
        self.s.as_bytes().get(self.i).copied()
    }

    /// Peeks `n` bytes ahead of the current one.
    pub fn peek_at(&self, n: usize) -> Option<u8> {
        self.s.as_bytes().get(self.i + n).copied()
    }

    /// Checks if the remaining input starts with the given byte pattern.
    pub fn starts_with(&self, pat: &[u8]) -> bool {
        self.s.as_bytes().get(self.i..).is_some_and(|rest| rest.starts_with(pat))
    }

    /// The unread part of the input.
    pub fn rest(&self) -> &'a str {
        self.s.get(self.i..).unwrap_or("")
    }

    /// Advances by one byte, returning the consumed byte.
    pub fn bump(&mut self) -> Option<u8> {
        let b = self.s.as_bytes().get(self.i).copied()?;
        self.i += 1;
        Some(b)
    }

    /// Advances by `n` bytes.
    pub fn bump_n(&mut self, n: usize) {
        self.i += n;
    }

    /// Advances over one whole character.
    pub fn bump_char(&mut self) {
        self.i += self.rest().chars().next().map_or(1, char::len_utf8);
    }

    /// Advances while `f` holds for the current byte and returns the count.
    pub fn eat_while(&mut self, f: impl Fn(u8) -> bool) -> usize {
        let start = self.i;
        while self.peek().is_some_and(&f) {
            self.i += 1;
        }
        self.i - start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_basics() {
        let mut cur = Cursor::at("hello", 1);
        assert_eq!(cur.pos(), 1);
        assert!(!cur.eof());
        assert_eq!(cur.peek(), Some(b'e'));
        assert_eq!(cur.bump(), Some(b'e'));
        assert_eq!(cur.pos(), 2);
        assert_eq!(cur.rest(), "llo");
    }

    #[test]
    fn cursor_starts_with() {
        let cur = Cursor::new("[[link]]");
        assert!(cur.starts_with(b"[["));
        assert!(!cur.starts_with(b"]]"));
    }

    #[test]
    fn empty_string_input() {
        let cur = Cursor::new("");
        assert!(cur.eof());
        assert_eq!(cur.peek(), None);
        assert_eq!(cur.pos(), 0);
    }

    #[test]
    fn starts_with_pattern_longer_than_remaining() {
        let mut cur = Cursor::new("ab");
        assert!(!cur.starts_with(b"abcdef"));
        cur.bump();
        assert!(!cur.starts_with(b"bc"));
        assert!(cur.starts_with(b"b"));
    }

    #[test]
    fn starts_with_past_end_is_false() {
        let mut cur = Cursor::new("hi");
        cur.bump_n(10);
        assert!(cur.eof());
        assert!(!cur.starts_with(b"h"));
        assert_eq!(cur.rest(), "");
    }

    #[test]
    fn bump_char_steps_over_multibyte() {
        let mut cur = Cursor::new("👩x");
        cur.bump_char();
        assert_eq!(cur.peek(), Some(b'x'));
    }

    #[test]
    fn eat_while_counts() {
        let mut cur = Cursor::new("```x");
        assert_eq!(cur.eat_while(|b| b == b'`'), 3);
        assert_eq!(cur.peek_at(0), Some(b'x'));
        assert_eq!(cur.peek_at(1), None);
    }

    #[test]
    fn bump_at_eof_returns_none() {
        let mut cur = Cursor::new("x");
        assert_eq!(cur.bump(), Some(b'x'));
        assert_eq!(cur.bump(), None);
    }
}
