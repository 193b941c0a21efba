//! # Raw Text Ledger
//!
//! Primitives that mutate a [`Paragraph`]'s items and its ledger together.
//!
//! Every operation here keeps three facts true when it returns:
//!
//! - the ledger has exactly one entry per `Text` item, in item order
//! - each entry's `pos` and length reproduce its item's span
//! - each entry's `text` is the virgin source slice under that span
//!
//! Plugins only reshape paragraphs through these functions.

pub mod display;
pub mod splice;

pub use display::{display_text, unescape};
pub use splice::Splice;

use log::trace;

use crate::error::{ParseError, ParseResult};
use crate::parsing::ast::{InlineItem, ItemWithOpts, LedgerEntry, Paragraph, StyleDelim, Text, TextOpts};
use crate::parsing::rope::{Position, SourceText, Span};

/// Result of cutting a range out of a text fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitOutcome {
    /// The range sat strictly inside; a new text item now follows the cut.
    Halved,
    /// The range sat on one edge; the fragment shrank.
    Trimmed,
    /// The range was the whole fragment; nothing changed.
    Consumed,
}

/// Weight of a line change when measuring how far a delimiter is from an item.
const LINE_WEIGHT: usize = 1 << 20;

/// Distance walking forward from `from` to `to`, `None` when `to` is behind.
fn distance(from: Position, to: Position) -> Option<usize> {
    if to < from {
        return None;
    }
    Some(if to.line == from.line {
        to.column - from.column
    } else {
        (to.line - from.line) * LINE_WEIGHT + to.column
    })
}

impl Paragraph {
    pub fn text_count(&self) -> usize {
        self.items.iter().filter(|i| i.is_text()).count()
    }

    /// Ledger slot backing the text item at `idx`.
    pub fn ledger_index(&self, idx: usize) -> Option<usize> {
        if !self.items.get(idx)?.is_text() {
            return None;
        }
        Some(self.items[..idx].iter().filter(|i| i.is_text()).count())
    }

    /// Item index of the text item backed by ledger slot `slot`.
    pub fn text_item_index(&self, slot: usize) -> Option<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, i)| i.is_text())
            .nth(slot)
            .map(|(idx, _)| idx)
    }

    /// Index of the last item that starts at or before `pos`.
    ///
    /// Items are ordered by position, so this is a binary search.
    pub fn item_index_at(&self, pos: Position) -> Option<usize> {
        self.items.partition_point(|i| i.span().start() <= pos).checked_sub(1)
    }

    /// Appends a text item and its ledger entry.
    pub fn push_text(&mut self, raw: &str, pos: Position, styling_opts: TextOpts) -> usize {
        let span = Span::from_len(pos, raw.len());
        self.items.push(InlineItem::Text(Text::new(span, raw, styling_opts)));
        self.ledger.push(LedgerEntry::new(raw, pos));
        self.items.len() - 1
    }

    /// Inserts a new text item backed by `raw` at item index `idx`.
    pub fn insert_text(&mut self, idx: usize, raw: &str, pos: Position, opts: TextOpts) -> ParseResult<()> {
        if idx > self.items.len() || raw.is_empty() {
            return Err(ParseError::internal(pos, "text insertion outside paragraph"));
        }
        let slot = self.items[..idx].iter().filter(|i| i.is_text()).count();
        let span = Span::from_len(pos, raw.len());
        self.items.insert(idx, InlineItem::Text(Text::new(span, raw, opts)));
        self.ledger.insert(slot, LedgerEntry::new(raw, pos));
        trace!("inserted text {raw:?} at item {idx}, ledger {slot}");
        self.refresh_near(idx);
        Ok(())
    }

    /// Inserts a non-text item. Text must go through [`Paragraph::insert_text`].
    pub fn insert_item(&mut self, idx: usize, item: InlineItem) -> ParseResult<()> {
        if item.is_text() || idx > self.items.len() {
            return Err(ParseError::internal(
                item.span().start(),
                "non-text insertion expected",
            ));
        }
        self.items.insert(idx, item);
        self.refresh_near(idx);
        Ok(())
    }

    /// Replaces the item at `idx` with a non-text item, keeping the ledger in step.
    pub fn replace_item(&mut self, idx: usize, item: InlineItem) -> ParseResult<()> {
        let pos = item.span().start();
        if item.is_text() || idx >= self.items.len() {
            return Err(ParseError::internal(pos, "replacement must be a non-text item"));
        }
        if let Some(slot) = self.ledger_index(idx) {
            self.ledger.remove(slot);
        }
        self.items[idx] = item;
        self.refresh_near(idx);
        Ok(())
    }

    /// Removes the item at `idx`, dropping its ledger entry when it has one.
    pub fn remove_item(&mut self, idx: usize) -> Option<InlineItem> {
        if idx >= self.items.len() {
            return None;
        }
        if let Some(slot) = self.ledger_index(idx) {
            self.ledger.remove(slot);
        }
        let item = self.items.remove(idx);
        self.refresh_near(idx);
        Some(item)
    }

    /// Cuts the single-line range `cut` out of the text item at `idx`.
    ///
    /// When the range is strictly inside, the right part becomes a new text
    /// item at `idx + 1` with the same opts and no style delimiters. When it
    /// covers the whole fragment nothing changes and the caller decides what
    /// replaces the item.
    pub fn cut_text(&mut self, idx: usize, cut: Span) -> ParseResult<SplitOutcome> {
        let slot = self
            .ledger_index(idx)
            .ok_or_else(|| ParseError::internal(cut.start(), "cut target is not a text item"))?;
        let entry = &self.ledger[slot];
        if !cut.is_single_line()
            || cut.start_line != entry.pos.line
            || cut.start_column < entry.pos.column
            || cut.end_column >= entry.end_column()
        {
            return Err(ParseError::internal(
                cut.start(),
                format!("cut {cut:?} outside fragment {:?}", entry.span()),
            ));
        }
        let local = cut.start_column - entry.pos.column;
        let len = cut.width();
        let total = entry.text.len();
        if !entry.text.is_char_boundary(local) || !entry.text.is_char_boundary(local + len) {
            return Err(ParseError::internal(cut.start(), "cut splits a character"));
        }

        if local == 0 && len == total {
            return Ok(SplitOutcome::Consumed);
        }

        let outcome = if local == 0 {
            let entry = &mut self.ledger[slot];
            entry.text.drain(..len);
            entry.pos.column += len;
            let mut span = self.items[idx].span();
            span.start_column += len;
            self.items[idx].set_span(span);
            SplitOutcome::Trimmed
        } else if local + len == total {
            let entry = &mut self.ledger[slot];
            entry.text.truncate(local);
            let mut span = self.items[idx].span();
            span.end_column -= len;
            self.items[idx].set_span(span);
            SplitOutcome::Trimmed
        } else {
            let entry = &mut self.ledger[slot];
            let right = entry.text.split_off(local + len);
            entry.text.truncate(local);
            let right_pos = Position::new(entry.pos.line, cut.end_column + 1);
            let mut span = self.items[idx].span();
            let right_span = Span::on_line(span.start_line, right_pos.column, span.end_column);
            span.end_column = cut.start_column - 1;
            self.items[idx].set_span(span);
            let opts = self.items[idx].opts();
            self.items.insert(idx + 1, InlineItem::Text(Text::new(right_span, right.as_str(), opts)));
            self.ledger.insert(slot + 1, LedgerEntry::new(right, right_pos));
            SplitOutcome::Halved
        };
        trace!("cut {cut:?} from item {idx}: {outcome:?}");
        self.refresh_near(idx);
        Ok(outcome)
    }

    /// Glues `s` onto one edge of the text item at `idx`.
    ///
    /// `s` must be the source text sitting right next to that edge. Returns
    /// `false` when the item is not text.
    pub fn add_string_to(&mut self, idx: usize, s: &str, at_start: bool) -> bool {
        let Some(slot) = self.ledger_index(idx) else {
            return false;
        };
        let entry = &mut self.ledger[slot];
        let mut span = self.items[idx].span();
        if at_start {
            entry.text.insert_str(0, s);
            entry.pos.column -= s.len();
            span.start_column -= s.len();
        } else {
            entry.text.push_str(s);
            span.end_column += s.len();
        }
        self.items[idx].set_span(span);
        self.refresh_near(idx);
        true
    }

    /// Merges the text item at `idx + 1` into the text item at `idx`.
    ///
    /// Both fragments must be contiguous on one line.
    pub fn merge_from(&mut self, idx: usize) -> ParseResult<()> {
        let (Some(slot), Some(next_slot)) = (self.ledger_index(idx), self.ledger_index(idx + 1)) else {
            let pos = self.items.get(idx).map(|i| i.span().start()).unwrap_or_default();
            return Err(ParseError::internal(pos, "merge needs two text items"));
        };
        let (left, right) = (&self.ledger[slot], &self.ledger[next_slot]);
        if left.pos.line != right.pos.line || left.end_column() != right.pos.column {
            return Err(ParseError::internal(right.pos, "merged fragments are not contiguous"));
        }
        let right_entry = self.ledger.remove(next_slot);
        self.ledger[slot].text.push_str(&right_entry.text);
        let right_item = self.items.remove(idx + 1);

        let item = &mut self.items[idx];
        let mut span = item.span();
        span.end_column = right_item.span().end_column;
        item.set_span(span);
        let styling = item.styling_mut();
        let other = right_item.styling();
        styling.open_styles.extend_from_slice(&other.open_styles);
        styling.close_styles.extend_from_slice(&other.close_styles);
        styling.opts |= other.opts;
        styling.sort();
        trace!("merged item {} into {idx}", idx + 1);
        self.refresh_near(idx);
        Ok(())
    }

    /// Moves style delimiters of item `from` onto item `to` when they sit
    /// closer to `to`'s edge.
    ///
    /// With `close` set the closing delimiters are considered and distance is
    /// measured forward from each item's end; otherwise opening delimiters
    /// and distance backward from each item's start. Moved styles are added
    /// to `to`'s opts.
    pub fn transfer_style(&mut self, from: usize, to: usize, close: bool) {
        let (Some(a), Some(b)) = (self.items.get(from), self.items.get(to)) else {
            return;
        };
        let (a_span, b_span) = (a.span(), b.span());
        if a_span.start() == b_span.start() {
            return;
        }
        let delims = if close { a.close_styles() } else { a.open_styles() };
        let mut keep = Vec::new();
        let mut moved = Vec::new();
        for d in delims {
            let (a_delta, b_delta) = if close {
                (distance(a_span.end(), d.span.start()), distance(b_span.end(), d.span.start()))
            } else {
                (distance(d.span.end(), a_span.start()), distance(d.span.end(), b_span.start()))
            };
            let to_b = match (a_delta, b_delta) {
                (_, None) => false,
                (None, Some(_)) => true,
                (Some(ad), Some(bd)) => bd < ad,
            };
            if to_b {
                moved.push(*d);
            } else {
                keep.push(*d);
            }
        }
        if moved.is_empty() {
            return;
        }
        trace!("moving {} style delims from item {from} to {to}", moved.len());
        let a = self.items[from].styling_mut();
        if close {
            a.close_styles = keep;
        } else {
            a.open_styles = keep;
        }
        let b = self.items[to].styling_mut();
        for d in &moved {
            b.opts |= d.style;
        }
        if close {
            b.close_styles.extend(moved);
        } else {
            b.open_styles.extend(moved);
        }
        b.sort();
    }

    /// Removes one exact style delimiter from whichever item holds it.
    pub fn remove_style_delim(&mut self, delim: StyleDelim, opening: bool) -> bool {
        for item in &mut self.items {
            let styling = item.styling_mut();
            let list = if opening { &mut styling.open_styles } else { &mut styling.close_styles };
            if let Some(i) = list.iter().position(|d| *d == delim) {
                list.remove(i);
                return true;
            }
        }
        false
    }

    /// Recomputes every text item's display string from its ledger entry.
    pub fn refresh_texts(&mut self) {
        let mut slot = 0;
        for idx in 0..self.items.len() {
            if self.items[idx].is_text() {
                self.refresh_text(idx, slot);
                slot += 1;
            }
        }
    }

    /// Recomputes the display strings an edit at item `idx` can change.
    ///
    /// A display string depends on its own ledger entry and on whether its
    /// neighbours share its lines, so only `idx - 1 ..= idx + 2` is touched.
    fn refresh_near(&mut self, idx: usize) {
        let Some(last) = self.items.len().checked_sub(1) else {
            return;
        };
        let first = idx.saturating_sub(1).min(last);
        let mut slot = self.items[..first].iter().filter(|i| i.is_text()).count();
        for i in first..=(idx + 2).min(last) {
            if self.items[i].is_text() {
                self.refresh_text(i, slot);
                slot += 1;
            }
        }
    }

    fn refresh_text(&mut self, idx: usize, slot: usize) {
        let span = self.items[idx].span();
        let first_on_line = idx == 0 || self.items[idx - 1].span().end_line != span.start_line;
        let last_on_line = self
            .items
            .get(idx + 1)
            .is_none_or(|next| next.span().start_line != span.end_line);
        let Some(entry) = self.ledger.get(slot) else {
            return;
        };
        if let Some(text) = self.items[idx].as_text_mut() {
            text.text = display_text(&entry.text, first_on_line, last_on_line);
        }
    }

    /// Verifies the ledger against the items and, optionally, the source.
    pub fn check_ledger(&self, source: Option<&SourceText>) -> ParseResult<()> {
        let count = self.text_count();
        if count != self.ledger.len() {
            return Err(ParseError::internal(
                self.span.start(),
                format!("{count} text items but {} ledger entries", self.ledger.len()),
            ));
        }
        let texts = self.items.iter().filter(|i| i.is_text());
        for (item, entry) in texts.zip(&self.ledger) {
            if item.span() != entry.span() {
                return Err(ParseError::internal(
                    entry.pos,
                    format!("item span {:?} differs from ledger span {:?}", item.span(), entry.span()),
                ));
            }
            if let Some(src) = source
                && src.slice(entry.span()).as_deref() != Some(entry.text.as_str())
            {
                return Err(ParseError::internal(entry.pos, "ledger text differs from source"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn para(raw: &str) -> Paragraph {
        let mut p = Paragraph::new(Span::on_line(0, 0, raw.len() - 1));
        p.push_text(raw, Position::new(0, 0), TextOpts::NONE);
        p.refresh_texts();
        p
    }

    fn texts(p: &Paragraph) -> Vec<(&str, Span)> {
        p.ledger.iter().map(|e| (e.text.as_str(), e.span())).collect()
    }

    #[test]
    fn cut_inside_halves_item() {
        let mut p = para("ab==cd");
        let out = p.cut_text(0, Span::on_line(0, 2, 3)).unwrap();
        assert_eq!(out, SplitOutcome::Halved);
        assert_eq!(texts(&p), vec![("ab", Span::on_line(0, 0, 1)), ("cd", Span::on_line(0, 4, 5))]);
        assert_eq!(p.items.len(), 2);
        p.check_ledger(Some(&SourceText::new("ab==cd"))).unwrap();
    }

    #[test]
    fn cut_at_edges_trims() {
        let mut p = para("==ab==");
        assert_eq!(p.cut_text(0, Span::on_line(0, 4, 5)).unwrap(), SplitOutcome::Trimmed);
        assert_eq!(p.cut_text(0, Span::on_line(0, 0, 1)).unwrap(), SplitOutcome::Trimmed);
        assert_eq!(texts(&p), vec![("ab", Span::on_line(0, 2, 3))]);
        assert_eq!(p.items[0].span(), Span::on_line(0, 2, 3));
    }

    #[test]
    fn cut_whole_fragment_is_consumed() {
        let mut p = para("==");
        assert_eq!(p.cut_text(0, Span::on_line(0, 0, 1)).unwrap(), SplitOutcome::Consumed);
        assert_eq!(texts(&p), vec![("==", Span::on_line(0, 0, 1))]);
    }

    #[test]
    fn cut_outside_fragment_is_internal_error() {
        let mut p = para("ab");
        let err = p.cut_text(0, Span::on_line(0, 1, 4)).unwrap_err();
        assert!(matches!(err, ParseError::Internal { line: 0, column: 1, .. }));
    }

    #[test]
    fn add_string_and_merge_restore_one_fragment() {
        let mut p = para("ab");
        p.insert_text(1, "cd", Position::new(0, 3), TextOpts::NONE).unwrap();
        assert!(p.add_string_to(0, "*", false));
        p.merge_from(0).unwrap();
        assert_eq!(texts(&p), vec![("ab*cd", Span::on_line(0, 0, 4))]);
        assert_eq!(p.items[0].as_text().unwrap().text, "ab*cd");
    }

    #[test]
    fn merge_rejects_gap() {
        let mut p = para("ab");
        p.insert_text(1, "cd", Position::new(0, 3), TextOpts::NONE).unwrap();
        assert!(p.merge_from(0).is_err());
    }

    #[test]
    fn display_text_keeps_inner_spaces() {
        let mut p = para("left ");
        p.insert_text(1, " right", Position::new(0, 6), TextOpts::NONE).unwrap();
        let shown: Vec<_> = p.items.iter().filter_map(|i| i.as_text()).map(|t| t.text.as_str()).collect();
        assert_eq!(shown, vec!["left ", " right"]);
    }

    #[test]
    fn edits_refresh_the_texts_they_touch() {
        let src = " a ==b== c ==d== e ";
        let mut p = para(src);
        for col in [14, 11, 6, 3] {
            let idx = p.item_index_at(Position::new(0, col)).unwrap();
            p.cut_text(idx, Span::on_line(0, col, col + 1)).unwrap();
        }
        p.remove_item(2);
        p.check_ledger(None).unwrap();
        let shown = |p: &Paragraph| -> Vec<String> {
            p.items.iter().filter_map(|i| i.as_text()).map(|t| t.text.clone()).collect()
        };
        let local = shown(&p);
        p.refresh_texts();
        assert_eq!(local, shown(&p));
        assert_eq!(local, vec!["a ", "b", "d", " e"]);
    }

    #[test]
    fn transfer_moves_close_to_nearest_item() {
        let mut p = para("ab==cd");
        let close = StyleDelim::new(TextOpts::ITALIC, Span::on_line(0, 6, 6));
        p.items[0].styling_mut().close_styles.push(close);
        p.cut_text(0, Span::on_line(0, 2, 3)).unwrap();
        p.transfer_style(0, 1, true);
        assert!(p.items[0].close_styles().is_empty());
        assert_eq!(p.items[1].close_styles(), &[close]);
        assert_eq!(p.items[1].opts(), TextOpts::ITALIC);
    }

    #[test]
    fn transfer_keeps_close_that_target_cannot_own() {
        let mut p = para("ab");
        p.insert_text(1, "d", Position::new(0, 4), TextOpts::NONE).unwrap();
        let close = StyleDelim::new(TextOpts::BOLD, Span::on_line(0, 3, 3));
        p.items[0].styling_mut().close_styles.push(close);
        // `d` ends after the delimiter, so it cannot be closed by it.
        p.transfer_style(0, 1, true);
        assert_eq!(p.items[0].close_styles(), &[close]);
    }

    #[test]
    fn index_helpers_skip_non_text_items() {
        let mut p = para("ab");
        let code = InlineItem::Code(crate::parsing::ast::InlineCode {
            span: Span::on_line(0, 2, 4),
            styling: Default::default(),
            text: "x".into(),
            start_delim: Span::on_line(0, 2, 2),
            end_delim: Span::on_line(0, 4, 4),
        });
        p.insert_item(1, code).unwrap();
        p.insert_text(2, "cd", Position::new(0, 5), TextOpts::NONE).unwrap();
        assert_eq!(p.ledger_index(2), Some(1));
        assert_eq!(p.ledger_index(1), None);
        assert_eq!(p.text_item_index(1), Some(2));
        assert_eq!(p.item_index_at(Position::new(0, 3)), Some(1));
        assert_eq!(p.remove_item(2).map(|i| i.is_text()), Some(true));
        assert_eq!(p.ledger.len(), 1);
        p.check_ledger(None).unwrap();
    }
}
