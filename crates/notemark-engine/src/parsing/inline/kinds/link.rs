use std::collections::BTreeMap;

use crate::parsing::ast::{Image, InlineItem, Link, LinkReference, Styling};
use crate::parsing::blocks::kinds::LinkRef;
use crate::parsing::ledger::display_text;

use super::super::{cursor::Cursor, text::ParaText};

/// Inline and reference links and images.
pub struct LinkSyntax;

/// Where a link's destination came from.
struct Target {
    url: String,
    title: Option<String>,
    url_range: Option<(usize, usize)>,
}

impl LinkSyntax {
    pub const OPEN: u8 = b'[';
    pub const CLOSE: u8 = b']';
    pub const IMAGE: u8 = b'!';
    pub const DEST_OPEN: u8 = b'(';
    pub const DEST_CLOSE: u8 = b')';

    /// Parses `[text](url "title")`, `[text][label]`, `[label][]` or
    /// `[label]`, optionally prefixed by `!` for an image.
    ///
    /// Reference forms only match labels present in `refs`; anything else
    /// leaves the brackets as literal text. On failure the cursor is
    /// restored.
    pub fn try_parse(
        text: &ParaText,
        cur: &mut Cursor<'_>,
        refs: &BTreeMap<String, LinkReference>,
    ) -> Option<InlineItem> {
        let saved = cur.clone();
        let start = cur.pos();
        let image = cur.peek() == Some(Self::IMAGE);
        if image {
            cur.bump();
        }
        if cur.peek() != Some(Self::OPEN) {
            *cur = saved;
            return None;
        }
        let Some(close) = Self::bracket_end(cur.s, cur.pos()) else {
            *cur = saved;
            return None;
        };
        let inner = (cur.pos() + 1, close);
        *cur = Cursor::at(cur.s, close + 1);

        let target = Self::inline_target(cur).or_else(|| Self::reference_target(text, cur, inner, refs));
        let Some(target) = target else {
            *cur = saved;
            return None;
        };

        let raw_inner = text.text[inner.0..inner.1].replace('\n', " ");
        let shown = display_text(&raw_inner, true, true);
        let span = text.span(start, cur.pos());
        let item = if image {
            InlineItem::Image(Image {
                span,
                styling: Styling::default(),
                url: target.url,
                alt: shown,
                title: target.title,
            })
        } else {
            InlineItem::Link(Link {
                span,
                styling: Styling::default(),
                url: target.url,
                title: target.title,
                text: shown,
                text_span: (inner.1 > inner.0).then(|| text.span(inner.0, inner.1)),
                url_span: target.url_range.map(|(a, b)| text.span(a, b)),
            })
        };
        Some(item)
    }

    /// Offset of the `]` matching the `[` at `open`.
    pub fn bracket_end(s: &str, open: usize) -> Option<usize> {
        let bytes = s.as_bytes();
        let mut depth = 0usize;
        let mut i = open;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => i += 1,
                Self::OPEN => depth += 1,
                Self::CLOSE => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
            i += 1;
        }
        None
    }

    fn inline_target(cur: &mut Cursor<'_>) -> Option<Target> {
        if cur.peek() != Some(Self::DEST_OPEN) {
            return None;
        }
        let saved = cur.clone();
        cur.bump();
        cur.eat_while(|b| b.is_ascii_whitespace());

        let url_start = cur.pos();
        let (url_range, url) = if cur.peek() == Some(b'<') {
            cur.bump();
            let from = cur.pos();
            cur.eat_while(|b| b != b'>' && b != b'\n');
            if cur.peek() != Some(b'>') {
                *cur = saved;
                return None;
            }
            let to = cur.pos();
            cur.bump();
            ((url_start, cur.pos()), cur.s[from..to].to_string())
        } else {
            let mut depth = 0usize;
            while let Some(b) = cur.peek() {
                match b {
                    b'\\' => cur.bump_n(1),
                    Self::DEST_OPEN => depth += 1,
                    Self::DEST_CLOSE if depth == 0 => break,
                    Self::DEST_CLOSE => depth -= 1,
                    b if b.is_ascii_whitespace() => break,
                    _ => {}
                }
                cur.bump();
            }
            let to = cur.pos().min(cur.s.len());
            ((url_start, to), cur.s[url_start..to].to_string())
        };

        let ws = cur.eat_while(|b| b.is_ascii_whitespace());
        let mut title = None;
        if ws > 0
            && let Some(q) = cur.peek().filter(|b| matches!(b, b'"' | b'\'' | b'('))
        {
            let end_quote = if q == b'(' { Self::DEST_CLOSE } else { q };
            cur.bump();
            let from = cur.pos();
            while let Some(b) = cur.peek() {
                if b == b'\\' {
                    cur.bump();
                } else if b == end_quote {
                    break;
                }
                cur.bump();
            }
            if cur.peek() != Some(end_quote) {
                *cur = saved;
                return None;
            }
            title = Some(display_text(&cur.s[from..cur.pos()], false, false));
            cur.bump();
            cur.eat_while(|b| b.is_ascii_whitespace());
        }
        if cur.peek() != Some(Self::DEST_CLOSE) {
            *cur = saved;
            return None;
        }
        cur.bump();
        Some(Target {
            url: display_text(&url, false, false),
            title,
            url_range: (url_range.1 > url_range.0).then_some(url_range),
        })
    }

    fn reference_target(
        text: &ParaText,
        cur: &mut Cursor<'_>,
        inner: (usize, usize),
        refs: &BTreeMap<String, LinkReference>,
    ) -> Option<Target> {
        let saved = cur.clone();
        let mut label = &text.text[inner.0..inner.1];
        let mut label_range = inner;
        if cur.peek() == Some(Self::OPEN)
            && let Some(close) = Self::bracket_end(cur.s, cur.pos())
        {
            let from = cur.pos() + 1;
            if close > from {
                label = &text.text[from..close];
                label_range = (from, close);
            }
            *cur = Cursor::at(cur.s, close + 1);
        }
        match refs.get(&LinkRef::normalize_label(label)) {
            Some(r) if !label.trim().is_empty() => Some(Target {
                url: r.url.clone(),
                title: r.title.clone(),
                url_range: Some(label_range),
            }),
            _ => {
                *cur = saved;
                None
            }
        }
    }
}
