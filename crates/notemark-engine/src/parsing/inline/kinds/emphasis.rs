use crate::parsing::ast::TextOpts;

/// Emphasis, strong and strikethrough delimiter runs.
pub struct Emphasis;

impl Emphasis {
    pub const STAR: u8 = b'*';
    pub const UNDERSCORE: u8 = b'_';
    pub const TILDE: u8 = b'~';
    /// Strikethrough only uses runs of exactly this many tildes.
    pub const TILDE_RUN: usize = 2;

    pub fn is_delim(b: u8) -> bool {
        matches!(b, Self::STAR | Self::UNDERSCORE | Self::TILDE)
    }

    /// `(can_open, can_close)` for a run of `ch` between `prev` and `next`.
    ///
    /// Line edges count as whitespace.
    pub fn flanking(ch: u8, prev: Option<char>, next: Option<char>) -> (bool, bool) {
        let ws = |c: Option<char>| c.is_none_or(char::is_whitespace);
        let punct = |c: Option<char>| c.is_some_and(|c| c.is_ascii_punctuation() || (!c.is_alphanumeric() && !c.is_whitespace()));
        let left = !ws(next) && (!punct(next) || ws(prev) || punct(prev));
        let right = !ws(prev) && (!punct(prev) || ws(next) || punct(next));
        if ch == Self::UNDERSCORE {
            (left && (!right || punct(prev)), right && (!left || punct(next)))
        } else {
            (left, right)
        }
    }

    /// Style applied when `used` characters of a `ch` run pair up.
    pub fn style(ch: u8, used: usize) -> TextOpts {
        match (ch, used) {
            (Self::TILDE, _) => TextOpts::STRIKETHROUGH,
            (_, 1) => TextOpts::ITALIC,
            _ => TextOpts::BOLD,
        }
    }
}
