use crate::parsing::ast::{InlineCode, InlineItem, Styling};

use super::super::{cursor::Cursor, text::ParaText};

/// Code span inline type with owned delimiter constant.
///
/// Code spans are raw zones: nothing else is parsed inside them.
pub struct CodeSpan;

impl CodeSpan {
    /// The backtick character that delimits code spans.
    pub const TICK: u8 = b'`';

    /// Parses a code span at the cursor.
    ///
    /// The closing run must have exactly as many backticks as the opening
    /// one. On failure the cursor is restored.
    pub fn try_parse(text: &ParaText, cur: &mut Cursor<'_>) -> Option<InlineItem> {
        if cur.peek() != Some(Self::TICK) {
            return None;
        }
        let saved = cur.clone();
        let start = cur.pos();
        let n = cur.eat_while(|b| b == Self::TICK);
        let inner_start = cur.pos();
        while !cur.eof() {
            if cur.peek() != Some(Self::TICK) {
                cur.bump();
                continue;
            }
            let close = cur.pos();
            if cur.eat_while(|b| b == Self::TICK) == n {
                let raw = &text.text[inner_start..close];
                return Some(InlineItem::Code(InlineCode {
                    span: text.span(start, cur.pos()),
                    styling: Styling::default(),
                    text: Self::content(raw),
                    start_delim: text.span(start, inner_start),
                    end_delim: text.span(close, cur.pos()),
                }));
            }
        }
        *cur = saved;
        None
    }

    /// Code content with line ends folded to spaces and one padding space
    /// stripped from each side.
    pub fn content(raw: &str) -> String {
        let s = raw.replace('\n', " ");
        let padded = s.len() >= 2 && s.starts_with(' ') && s.ends_with(' ') && !s.trim().is_empty();
        if padded { s[1..s.len() - 1].to_string() } else { s }
    }
}
