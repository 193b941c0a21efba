use crate::error::{ParseError, ParseResult};
use crate::parsing::ast::{ItemWithOpts, Paragraph, StyleDelim, TextOpts};
use crate::parsing::ledger::SplitOutcome;

use super::scan::{DelimKind, DelimOccurrence};

/// Cuts the paired delimiter characters out of the text.
///
/// Occurrences are processed right to left so earlier positions stay valid.
/// Each becomes a `StyleDelim` on the item it borders: an opener on the item
/// after it, a closer on the item before it.
pub fn remove_delim_text(
    para: &mut Paragraph,
    pairs: &[(DelimOccurrence, DelimOccurrence)],
    style: TextOpts,
) -> ParseResult<()> {
    let mut ordered: Vec<DelimOccurrence> = pairs.iter().flat_map(|(o, c)| [*o, *c]).collect();
    ordered.sort_by_key(|d| d.span);

    for d in ordered.iter().rev() {
        let idx = para
            .item_index_at(d.span.start())
            .ok_or_else(|| ParseError::internal(d.span.start(), "delimiter outside every item"))?;
        let item_span = para.items[idx].span();
        let outcome = para.cut_text(idx, d.span)?;
        let marker = StyleDelim::new(style, d.span);

        let target = match d.kind {
            DelimKind::Closing if d.span.start_column == item_span.start_column => idx.checked_sub(1),
            DelimKind::Closing | DelimKind::Both => Some(idx),
            DelimKind::Opening if outcome == SplitOutcome::Halved || d.span.end_column == item_span.end_column => {
                Some(idx + 1)
            }
            DelimKind::Opening => Some(idx),
        };
        let holder = target
            .and_then(|t| para.items.get_mut(t))
            .ok_or_else(|| ParseError::internal(d.span.start(), "no item to hold the style marker"))?;
        let styling = holder.styling_mut();
        if d.kind == DelimKind::Opening {
            styling.open_styles.push(marker);
        } else {
            styling.close_styles.push(marker);
        }
        styling.sort();

        match outcome {
            SplitOutcome::Halved => para.transfer_style(idx, idx + 1, true),
            SplitOutcome::Trimmed => {}
            SplitOutcome::Consumed => {
                let consumed = para.items[idx].styling().clone();
                if let Some(next) = para.items.get_mut(idx + 1) {
                    let s = next.styling_mut();
                    s.open_styles.extend(consumed.open_styles);
                    s.sort();
                }
                if let Some(prev) = idx.checked_sub(1).and_then(|p| para.items.get_mut(p)) {
                    let s = prev.styling_mut();
                    s.close_styles.extend(consumed.close_styles);
                    s.sort();
                }
                para.remove_item(idx);
            }
        }
    }
    Ok(())
}

/// Sets `style` on every item between each pair's two markers.
pub fn add_style_opt(para: &mut Paragraph, pairs: &[(DelimOccurrence, DelimOccurrence)], style: TextOpts) {
    for (open, close) in pairs {
        let from = para.item_index_at(open.span.start()).map_or(0, |i| i + 1);
        let to = para
            .item_index_at(close.span.start())
            .map_or(0, |i| i + 1)
            .min(para.items.len());
        for item in para.items.iter_mut().take(to).skip(from) {
            item.styling_mut().opts.insert(style);
        }
    }
}
