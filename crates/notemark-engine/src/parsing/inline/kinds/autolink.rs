use std::sync::OnceLock;

use regex::Regex;

use crate::parsing::ast::{InlineItem, Link, Styling};

use super::super::{cursor::Cursor, text::ParaText};

fn uri_regex() -> &'static Regex {
    static URI: OnceLock<Regex> = OnceLock::new();
    URI.get_or_init(|| Regex::new(r"^<([A-Za-z][A-Za-z0-9+.\-]{1,31}:[^\s<>]*)>").expect("Invalid autolink regex"))
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(
            r"^<([A-Za-z0-9.!#$%&'*+/=?^_`{|}~\-]+@[A-Za-z0-9](?:[A-Za-z0-9\-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]{0,61}[A-Za-z0-9])?)*)>",
        )
        .expect("Invalid email autolink regex")
    })
}

fn bare_regex() -> &'static Regex {
    static BARE: OnceLock<Regex> = OnceLock::new();
    BARE.get_or_init(|| Regex::new(r"^(?:https?://|ftp://|www\.)[^\s<]+").expect("Invalid bare url regex"))
}

/// `<scheme:...>`, `<user@host>` and bare `http://`/`www.` links.
pub struct Autolink;

impl Autolink {
    pub const OPEN: u8 = b'<';
    pub const MAILTO: &'static str = "mailto:";
    /// Characters dropped from the end of a bare URL.
    pub const TRAILING: &'static [char] = &['?', '!', '.', ',', ':', '*', '_', '~', '\'', '"', ';'];

    pub fn try_parse(text: &ParaText, cur: &mut Cursor<'_>) -> Option<InlineItem> {
        if cur.peek() != Some(Self::OPEN) {
            return None;
        }
        let rest = cur.rest();
        let (cap, url) = if let Some(cap) = uri_regex().captures(rest) {
            let inner = cap.get(1)?;
            (cap.get(0)?, inner.as_str().to_string())
        } else {
            let cap = email_regex().captures(rest)?;
            let inner = cap.get(1)?;
            (cap.get(0)?, format!("{}{}", Self::MAILTO, inner.as_str()))
        };
        let start = cur.pos();
        let inner = (start + 1, start + cap.end() - 1);
        cur.bump_n(cap.end());
        Some(Self::link(text, (start, cur.pos()), inner, url))
    }

    /// A bare URL starting at the cursor. Only tried at a word boundary.
    pub fn try_bare(text: &ParaText, cur: &mut Cursor<'_>) -> Option<InlineItem> {
        let start = cur.pos();
        if text.char_before(start).is_some_and(|c| !c.is_whitespace() && !"(*_~".contains(c)) {
            return None;
        }
        let m = bare_regex().find(cur.rest())?;
        let mut raw = m.as_str().trim_end_matches(Self::TRAILING);
        // Drop closing parens that have no opener inside the URL.
        while raw.ends_with(')') && raw.matches(')').count() > raw.matches('(').count() {
            raw = raw[..raw.len() - 1].trim_end_matches(Self::TRAILING);
        }
        if raw.ends_with("://") || raw == "www." {
            return None;
        }
        let url = if raw.starts_with("www.") {
            format!("http://{raw}")
        } else {
            raw.to_string()
        };
        let end = start + raw.len();
        cur.bump_n(raw.len());
        Some(Self::link(text, (start, end), (start, end), url))
    }

    fn link(text: &ParaText, whole: (usize, usize), inner: (usize, usize), url: String) -> InlineItem {
        let inner_span = text.span(inner.0, inner.1);
        InlineItem::Link(Link {
            span: text.span(whole.0, whole.1),
            styling: Styling::default(),
            url,
            title: None,
            text: text.text[inner.0..inner.1].to_string(),
            text_span: Some(inner_span),
            url_span: Some(inner_span),
        })
    }
}
