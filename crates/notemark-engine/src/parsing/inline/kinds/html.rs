use std::sync::OnceLock;

use regex::Regex;

use crate::parsing::ast::{InlineItem, RawHtml, Styling};

use super::super::{cursor::Cursor, text::ParaText};

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| {
        Regex::new(
            r#"^(?:<[A-Za-z][A-Za-z0-9\-]*(?:\s+[A-Za-z_:][A-Za-z0-9_.:\-]*(?:\s*=\s*(?:[^\s"'=<>`]+|'[^']*'|"[^"]*"))?)*\s*/?>|</[A-Za-z][A-Za-z0-9\-]*\s*>|<!--(?s:.*?)-->)"#,
        )
        .expect("Invalid inline html regex")
    })
}

/// Inline HTML tags and comments, kept verbatim.
pub struct InlineHtml;

impl InlineHtml {
    pub fn try_parse(text: &ParaText, cur: &mut Cursor<'_>) -> Option<InlineItem> {
        if cur.peek() != Some(b'<') {
            return None;
        }
        let m = tag_regex().find(cur.rest())?;
        let start = cur.pos();
        cur.bump_n(m.end());
        Some(InlineItem::RawHtml(RawHtml {
            span: text.span(start, cur.pos()),
            styling: Styling::default(),
            html: m.as_str().to_string(),
        }))
    }
}
