use serde::Serialize;

use super::inline::{InlineItem, ItemWithOpts};
use crate::parsing::rope::{Position, Span};

/// Raw source fragment backing one `Text` item.
///
/// `text` is always the exact slice of the virgin source that the item's span
/// covers, so `pos` plus `text.len()` reproduces the span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    pub text: String,
    pub pos: Position,
    pub space_before: bool,
    pub space_after: bool,
}

impl LedgerEntry {
    pub fn new(text: impl Into<String>, pos: Position) -> Self {
        Self {
            text: text.into(),
            pos,
            space_before: false,
            space_after: false,
        }
    }

    /// Inclusive span of the fragment on its line.
    pub fn span(&self) -> Span {
        Span::from_len(self.pos, self.text.len())
    }

    /// Column one past the last byte.
    pub fn end_column(&self) -> usize {
        self.pos.column + self.text.len()
    }
}

/// A run of inline content together with its raw text ledger.
///
/// Items stay in document order. The ledger holds one entry per `Text` item,
/// in the same order, so the n-th entry backs the n-th text item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Paragraph {
    pub span: Span,
    pub items: Vec<InlineItem>,
    pub ledger: Vec<LedgerEntry>,
}

impl Paragraph {
    pub fn new(span: Span) -> Self {
        Self {
            span,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Concatenated display text of text-like items.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        let mut prev_line = None;
        for item in &self.items {
            let text = match item {
                InlineItem::Text(t) => t.text.as_str(),
                InlineItem::Link(l) => l.text.as_str(),
                InlineItem::Code(c) => c.text.as_str(),
                InlineItem::Emoji(e) => e.unicode.as_str(),
                InlineItem::NoteLink(n) => n.text.as_str(),
                InlineItem::HeaderAnchor(h) => h.text.as_str(),
                InlineItem::Image(i) => i.alt.as_str(),
                InlineItem::LineBreak(_) | InlineItem::RawHtml(_) => "",
            };
            let line = item.span().start_line;
            if prev_line.is_some_and(|p| p != line) && !out.is_empty() && !out.ends_with(' ') {
                out.push(' ');
            }
            prev_line = Some(item.span().end_line);
            out.push_str(text);
        }
        out
    }
}
