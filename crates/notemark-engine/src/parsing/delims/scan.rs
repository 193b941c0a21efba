use serde::Serialize;

use crate::parsing::ast::{InlineItem, ItemWithOpts, Paragraph, StyleDelim};
use crate::parsing::rope::{Position, SourceText, Span};

/// How a delimiter occurrence may be used, judged by the whitespace around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DelimKind {
    /// Whitespace before, none after.
    Opening,
    /// No whitespace before, whitespace after.
    Closing,
    /// No whitespace on either side.
    Both,
}

/// One occurrence of a searched delimiter inside a text item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DelimOccurrence {
    pub span: Span,
    pub kind: DelimKind,
}

impl DelimOccurrence {
    /// Whether `next` starts right after `self` on the same line.
    pub fn touches(&self, next: &DelimOccurrence) -> bool {
        self.span.end_line == next.span.start_line && self.span.end_column + 1 == next.span.start_column
    }

    #[must_use]
    pub fn with_kind(self, kind: DelimKind) -> Self {
        Self { kind, ..self }
    }
}

/// A style already applied to the paragraph: its two markers and the items
/// holding them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StylePair {
    pub open: StyleDelim,
    pub close: StyleDelim,
    pub open_item: usize,
    pub close_item: usize,
}

/// Pairs the style markers carried by `items`.
///
/// Opening markers wait on a stack; each closing marker takes the most
/// recent one. A closer with nothing waiting is ignored.
pub fn applied_styles(items: &[InlineItem]) -> Vec<StylePair> {
    let mut waiting: Vec<(usize, StyleDelim)> = Vec::new();
    let mut pairs = Vec::new();
    for (idx, item) in items.iter().enumerate() {
        waiting.extend(item.open_styles().iter().map(|d| (idx, *d)));
        for close in item.close_styles() {
            if let Some((open_item, open)) = waiting.pop() {
                pairs.push(StylePair {
                    open,
                    close: *close,
                    open_item,
                    close_item: idx,
                });
            }
        }
    }
    pairs
}

/// Finds every usable, unescaped occurrence of `delim` in the text items.
///
/// Characters around an occurrence are read from the virgin source line.
/// The start of a line and the end of a line both count as whitespace.
/// Occurrences with whitespace on both sides are skipped.
pub fn scan_occurrences(para: &Paragraph, source: &SourceText, delim: &str) -> Vec<DelimOccurrence> {
    let mut out = Vec::new();
    if delim.is_empty() {
        return out;
    }
    let texts = para.items.iter().enumerate().filter(|(_, i)| i.is_text());
    for ((idx, _), entry) in texts.zip(&para.ledger) {
        let line_start = starts_line(para, idx);
        let mut from = 0;
        while let Some(k) = entry.text.get(from..).and_then(|rest| rest.find(delim)) {
            let at = from + k;
            from = at + delim.len();
            let pos = Position::new(entry.pos.line, entry.pos.column + at);
            let before = if at == 0 && line_start {
                None
            } else {
                source.char_before(pos)
            };
            if before == Some('\\') {
                continue;
            }
            let after = source.char_at(Position::new(pos.line, pos.column + delim.len()));
            let space_before = before.is_none_or(char::is_whitespace);
            let space_after = after.is_none_or(char::is_whitespace);
            let kind = match (space_before, space_after) {
                (false, false) => DelimKind::Both,
                (true, false) => DelimKind::Opening,
                (false, true) => DelimKind::Closing,
                (true, true) => continue,
            };
            out.push(DelimOccurrence {
                span: Span::from_len(pos, delim.len()),
                kind,
            });
        }
    }
    out
}

/// Drops the leading run of closers; nothing before them can be opened.
pub fn drop_leading_closers(occurrences: &mut Vec<DelimOccurrence>) {
    let first = occurrences
        .iter()
        .position(|o| o.kind != DelimKind::Closing)
        .unwrap_or(occurrences.len());
    occurrences.drain(..first);
}

/// Whether the item at `idx` is the first thing on its content line.
fn starts_line(para: &Paragraph, idx: usize) -> bool {
    let item = &para.items[idx];
    let line = item.span().start_line;
    let first = idx == 0 || para.items[idx - 1].span().end_line != line;
    first && item.outer_span().start() == item.span().start()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::ast::{Text, TextOpts};

    fn para(src: &str) -> Paragraph {
        let mut p = Paragraph::new(Span::on_line(0, 0, src.len() - 1));
        p.push_text(src, Position::new(0, 0), TextOpts::NONE);
        p.refresh_texts();
        p
    }

    fn kinds(src: &str, delim: &str) -> Vec<(usize, DelimKind)> {
        let source = SourceText::new(src);
        scan_occurrences(&para(src), &source, delim)
            .into_iter()
            .map(|o| (o.span.start_column, o.kind))
            .collect()
    }

    #[test]
    fn classifies_by_surrounding_space() {
        assert_eq!(
            kinds("==a== b==c ==", "=="),
            vec![(0, DelimKind::Opening), (3, DelimKind::Closing), (7, DelimKind::Both)]
        );
    }

    #[test]
    fn escaped_occurrence_is_skipped() {
        assert_eq!(kinds(r"\==a==", "=="), vec![(4, DelimKind::Closing)]);
    }

    #[test]
    fn leading_closers_are_dropped() {
        let source = SourceText::new("a== ==b==");
        let mut occ = scan_occurrences(&para("a== ==b=="), &source, "==");
        drop_leading_closers(&mut occ);
        assert_eq!(occ.len(), 2);
        assert_eq!(occ[0].kind, DelimKind::Opening);
    }

    #[test]
    fn applied_styles_pair_last_in_first_out() {
        let mut outer = Text::new(Span::on_line(0, 2, 2), "a", TextOpts::BOLD | TextOpts::ITALIC);
        outer.styling.open_styles = vec![
            StyleDelim::new(TextOpts::ITALIC, Span::on_line(0, 0, 0)),
            StyleDelim::new(TextOpts::BOLD, Span::on_line(0, 1, 1)),
        ];
        outer.styling.close_styles = vec![
            StyleDelim::new(TextOpts::BOLD, Span::on_line(0, 3, 3)),
            StyleDelim::new(TextOpts::ITALIC, Span::on_line(0, 4, 4)),
        ];
        let pairs = applied_styles(&[InlineItem::Text(outer)]);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].open.style, TextOpts::BOLD);
        assert_eq!(pairs[0].close.span, Span::on_line(0, 3, 3));
        assert_eq!(pairs[1].open.style, TextOpts::ITALIC);
    }
}
