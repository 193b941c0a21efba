use log::trace;

use crate::error::{ParseError, ParseResult};
use crate::parsing::ast::{InlineItem, ItemWithOpts, Paragraph};
use crate::parsing::rope::Span;

use super::SplitOutcome;

/// Where a splice left things.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Splice {
    /// Item index of the inserted item.
    pub index: usize,
    pub outcome: SplitOutcome,
    /// Whether the replaced range began the text item.
    pub at_start: bool,
}

impl Splice {
    /// Ledger slot to scan next when walking the ledger from `slot`.
    ///
    /// Text left after the new item is scanned again; text before it is
    /// done.
    pub fn resume_slot(&self, slot: usize) -> usize {
        match self.outcome {
            SplitOutcome::Consumed => slot,
            SplitOutcome::Trimmed if self.at_start => slot,
            SplitOutcome::Trimmed | SplitOutcome::Halved => slot + 1,
        }
    }
}

impl Paragraph {
    /// Replaces the single-line range `cut` of the text item at `idx` with
    /// a non-text `item`.
    ///
    /// The new item takes the text's opts. Style markers move to whichever
    /// item now owns the edge they sit on; when the whole text is replaced
    /// the new item inherits all of them.
    pub fn splice_item(&mut self, idx: usize, cut: Span, mut item: InlineItem) -> ParseResult<Splice> {
        let (opts, at_start) = match self.items.get(idx) {
            Some(text) if text.is_text() => (text.opts(), text.span().start() == cut.start()),
            _ => return Err(ParseError::internal(cut.start(), "splice target is not a text item")),
        };
        item.styling_mut().opts = opts;

        let outcome = self.cut_text(idx, cut)?;
        let index = match outcome {
            SplitOutcome::Consumed => {
                *item.styling_mut() = self.items[idx].styling().clone();
                self.replace_item(idx, item)?;
                idx
            }
            SplitOutcome::Halved => {
                self.transfer_style(idx, idx + 1, true);
                self.insert_item(idx + 1, item)?;
                idx + 1
            }
            SplitOutcome::Trimmed if at_start => {
                self.insert_item(idx, item)?;
                self.transfer_style(idx + 1, idx, true);
                self.transfer_style(idx + 1, idx, false);
                idx
            }
            SplitOutcome::Trimmed => {
                self.insert_item(idx + 1, item)?;
                self.transfer_style(idx, idx + 1, true);
                self.transfer_style(idx, idx + 1, false);
                idx + 1
            }
        };
        trace!("spliced {} over {cut:?} at item {index}", self.items[index].kind_name());
        Ok(Splice {
            index,
            outcome,
            at_start,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::ast::{Emoji, StyleDelim, Styling, TextOpts};
    use crate::parsing::rope::{Position, SourceText};

    fn emoji(span: Span) -> InlineItem {
        InlineItem::Emoji(Emoji {
            span,
            styling: Styling::default(),
            unicode: "x".into(),
            name_span: span,
            options_span: span,
        })
    }

    fn line(src: &str, opts: TextOpts) -> Paragraph {
        let mut p = Paragraph::new(Span::on_line(0, 0, src.len() - 1));
        p.push_text(src, Position::new(0, 0), opts);
        p.refresh_texts();
        p
    }

    #[test]
    fn middle_splice_halves_text() {
        let src = "ab :x: cd";
        let mut p = line(src, TextOpts::BOLD);
        let s = p.splice_item(0, Span::on_line(0, 3, 5), emoji(Span::on_line(0, 3, 5))).unwrap();
        assert_eq!(s.index, 1);
        assert_eq!(s.outcome, SplitOutcome::Halved);
        assert_eq!(s.resume_slot(0), 1);
        let kinds: Vec<_> = p.items.iter().map(|i| (i.kind_name(), i.opts())).collect();
        assert_eq!(
            kinds,
            vec![("text", TextOpts::BOLD), ("emoji", TextOpts::BOLD), ("text", TextOpts::BOLD)]
        );
        p.check_ledger(Some(&SourceText::new(src))).unwrap();
    }

    #[test]
    fn whole_text_splice_inherits_styles() {
        let src = "*:x:*";
        let mut p = Paragraph::new(Span::on_line(0, 0, 4));
        let idx = p.push_text(":x:", Position::new(0, 1), TextOpts::ITALIC);
        p.items[idx].styling_mut().open_styles.push(StyleDelim::new(TextOpts::ITALIC, Span::on_line(0, 0, 0)));
        p.items[idx].styling_mut().close_styles.push(StyleDelim::new(TextOpts::ITALIC, Span::on_line(0, 4, 4)));
        let s = p.splice_item(0, Span::on_line(0, 1, 3), emoji(Span::on_line(0, 1, 3))).unwrap();
        assert_eq!(s.outcome, SplitOutcome::Consumed);
        assert_eq!(s.resume_slot(0), 0);
        assert!(p.ledger.is_empty());
        assert_eq!(p.items[0].open_styles().len(), 1);
        assert_eq!(p.items[0].close_styles().len(), 1);
        p.check_ledger(Some(&SourceText::new(src))).unwrap();
    }

    #[test]
    fn leading_splice_keeps_scanning_the_rest() {
        let mut p = line(":x: tail", TextOpts::NONE);
        let s = p.splice_item(0, Span::on_line(0, 0, 2), emoji(Span::on_line(0, 0, 2))).unwrap();
        assert_eq!(s.index, 0);
        assert_eq!(s.resume_slot(0), 0);
        assert_eq!(p.items[1].span(), Span::on_line(0, 3, 7));
    }

    #[test]
    fn non_text_target_is_an_error() {
        let mut p = Paragraph::new(Span::on_line(0, 0, 2));
        p.items.push(emoji(Span::on_line(0, 0, 2)));
        assert!(p.splice_item(0, Span::on_line(0, 0, 2), emoji(Span::on_line(0, 0, 2))).is_err());
    }
}
