use std::collections::BTreeMap;

use crate::parsing::ast::{InlineItem, LineBreak, LinkReference, Styling};

use super::{
    cursor::Cursor,
    kinds::{Autolink, CodeSpan, Emphasis, InlineHtml, LinkSyntax},
    text::ParaText,
};

/// A run of `*`, `_` or `~` that may become a style marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimRun {
    pub ch: u8,
    /// Flat offset of the first unconsumed character.
    pub start: usize,
    /// Unconsumed characters left in the run.
    pub len: usize,
    pub orig_len: usize,
    pub can_open: bool,
    pub can_close: bool,
}

/// One lexed piece of a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    /// Plain text in `start..end`, never crossing a line end.
    Text { start: usize, end: usize },
    Delim(DelimRun),
    Item(InlineItem),
}

/// Splits a paragraph into text runs, items and emphasis candidates.
///
/// Constructs are tried in order: backslash escape, line end (hard break),
/// code span, autolink, inline HTML, link or image, emphasis run, bare URL.
/// Anything else is text. Whitespace at the end of a line belongs to no
/// piece.
pub fn lex(text: &ParaText, refs: &BTreeMap<String, LinkReference>) -> Vec<Piece> {
    let s = text.text.as_str();
    let mut cur = Cursor::new(s);
    let mut out = Vec::new();
    let mut text_start = 0;

    while let Some(b) = cur.peek() {
        let at = cur.pos();
        match b {
            b'\\' => {
                match cur.peek_at(1) {
                    Some(b'\n') => {
                        flush(&mut out, text, text_start, at);
                        out.push(line_break(text, at, at + 1));
                        cur.bump_n(2);
                        text_start = cur.pos();
                    }
                    Some(n) if n.is_ascii_punctuation() => cur.bump_n(2),
                    _ => {
                        cur.bump();
                    }
                }
                continue;
            }
            b'\n' => {
                let line = &s[text_start..at];
                let trailing = line.len() - line.trim_end_matches(' ').len();
                flush(&mut out, text, text_start, at);
                if trailing >= 2 {
                    out.push(line_break(text, at - trailing, at));
                }
                cur.bump();
                text_start = cur.pos();
                continue;
            }
            CodeSpan::TICK => {
                if let Some(item) = CodeSpan::try_parse(text, &mut cur) {
                    push_item(&mut out, text, text_start, at, item);
                    text_start = cur.pos();
                } else {
                    // An unmatched run stays literal as a whole.
                    cur.eat_while(|b| b == CodeSpan::TICK);
                }
                continue;
            }
            Autolink::OPEN => {
                let item = Autolink::try_parse(text, &mut cur).or_else(|| InlineHtml::try_parse(text, &mut cur));
                if let Some(item) = item {
                    push_item(&mut out, text, text_start, at, item);
                    text_start = cur.pos();
                    continue;
                }
            }
            LinkSyntax::OPEN | LinkSyntax::IMAGE => {
                if let Some(item) = LinkSyntax::try_parse(text, &mut cur, refs) {
                    push_item(&mut out, text, text_start, at, item);
                    text_start = cur.pos();
                    continue;
                }
            }
            b if Emphasis::is_delim(b) => {
                let n = cur.eat_while(|x| x == b);
                let (can_open, can_close) = Emphasis::flanking(b, text.char_before(at), text.char_at(at + n));
                let usable = b != Emphasis::TILDE || n == Emphasis::TILDE_RUN;
                if usable && (can_open || can_close) {
                    flush(&mut out, text, text_start, at);
                    out.push(Piece::Delim(DelimRun {
                        ch: b,
                        start: at,
                        len: n,
                        orig_len: n,
                        can_open,
                        can_close,
                    }));
                    text_start = cur.pos();
                }
                continue;
            }
            b'h' | b'f' | b'w' => {
                if let Some(item) = Autolink::try_bare(text, &mut cur) {
                    push_item(&mut out, text, text_start, at, item);
                    text_start = cur.pos();
                    continue;
                }
            }
            _ => {}
        }
        cur.bump_char();
    }
    flush(&mut out, text, text_start, s.len());
    out
}

fn line_break(text: &ParaText, start: usize, end: usize) -> Piece {
    Piece::Item(InlineItem::LineBreak(LineBreak {
        span: text.span(start, end),
        styling: Styling::default(),
    }))
}

fn push_item(out: &mut Vec<Piece>, text: &ParaText, text_start: usize, at: usize, item: InlineItem) {
    flush(out, text, text_start, at);
    out.push(Piece::Item(item));
}

/// Emits the text in `start..end`, dropping whitespace at a line end.
fn flush(out: &mut Vec<Piece>, text: &ParaText, start: usize, end: usize) {
    let at_line_end = end == text.len() || text.text.as_bytes().get(end) == Some(&b'\n');
    let slice = &text.text[start..end];
    let end = if at_line_end {
        start + slice.trim_end().len()
    } else {
        end
    };
    if end > start {
        out.push(Piece::Text { start, end });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::blocks::{ContentLine, InlineSource};

    fn lexed(lines: &[&str]) -> (ParaText, Vec<Piece>) {
        let src = InlineSource::new(
            lines
                .iter()
                .enumerate()
                .map(|(n, l)| ContentLine {
                    line: n,
                    column: 0,
                    text: (*l).into(),
                })
                .collect(),
        );
        let t = ParaText::new(&src);
        let pieces = lex(&t, &BTreeMap::new());
        (t, pieces)
    }

    fn shape(t: &ParaText, pieces: &[Piece]) -> Vec<String> {
        pieces
            .iter()
            .map(|p| match p {
                Piece::Text { start, end } => format!("text {:?}", &t.text[*start..*end]),
                Piece::Delim(d) => format!("delim {}x{}", d.ch as char, d.len),
                Piece::Item(i) => i.kind_name().to_string(),
            })
            .collect()
    }

    #[test]
    fn plain_line_is_one_text_piece() {
        let (t, p) = lexed(&["hello world  "]);
        assert_eq!(shape(&t, &p), vec!["text \"hello world\""]);
    }

    #[test]
    fn code_and_emphasis_runs() {
        let (t, p) = lexed(&["a `b` **c**"]);
        assert_eq!(
            shape(&t, &p),
            vec!["text \"a \"", "code", "text \" \"", "delim *x2", "text \"c\"", "delim *x2"]
        );
    }

    #[test]
    fn escaped_star_stays_text() {
        let (t, p) = lexed(&[r"\*a\*"]);
        assert_eq!(shape(&t, &p), vec![r#"text "\\*a\\*""#]);
    }

    #[test]
    fn hard_breaks() {
        let (t, p) = lexed(&["a  ", "b\\", "c"]);
        assert_eq!(
            shape(&t, &p),
            vec!["text \"a\"", "line-break", "text \"b\"", "line-break", "text \"c\""]
        );
    }

    #[test]
    fn single_tilde_and_spaced_star_are_text() {
        let (t, p) = lexed(&["a ~b~ * c"]);
        assert_eq!(shape(&t, &p), vec!["text \"a ~b~ * c\""]);
    }

    #[test]
    fn note_link_brackets_stay_text() {
        let (t, p) = lexed(&["My [[/link]] here"]);
        assert_eq!(shape(&t, &p), vec!["text \"My [[/link]] here\""]);
    }

    #[test]
    fn bare_url_becomes_link() {
        let (t, p) = lexed(&["go https://x.org now"]);
        assert_eq!(shape(&t, &p), vec!["text \"go \"", "link", "text \" now\""]);
    }
}
