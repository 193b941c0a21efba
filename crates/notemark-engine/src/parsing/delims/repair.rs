use log::trace;

use crate::error::{ParseError, ParseResult};
use crate::parsing::ast::{ItemWithOpts, Paragraph, StyleDelim, TextOpts};
use crate::parsing::rope::{SourceText, Span};

use super::scan::StylePair;

/// Undoes the styles crossed by a new delimiter pair.
///
/// Each bad style loses its two markers. Items between them lose the style
/// bit unless a surviving pair of the same style still wraps them.
pub fn remove_bad_styles(para: &mut Paragraph, good: &[StylePair], bad: &[StylePair]) {
    for b in bad {
        para.remove_style_delim(b.open, true);
        para.remove_style_delim(b.close, false);
        let style = b.open.style;
        let last = b.close_item.min(para.items.len().saturating_sub(1));
        for idx in b.open_item..=last {
            let item = &para.items[idx];
            if !item.opts().contains(style) {
                continue;
            }
            let sp = item.span();
            let still_wrapped = good.iter().any(|g| {
                g.open.style == style && g.open.span.start() < sp.start() && sp.end() < g.close.span.end()
            });
            if !still_wrapped {
                para.items[idx].styling_mut().opts.remove(style);
            }
        }
    }
}

/// Puts the characters of undone style markers back into the text.
///
/// A marker glues onto an adjacent text item when there is one and joins
/// the neighbours it touches on both sides; otherwise it becomes a new
/// unstyled text item.
pub fn restore_bad_text(para: &mut Paragraph, source: &SourceText, bad: &[StylePair]) -> ParseResult<()> {
    for delim in bad.iter().flat_map(|b| [b.open, b.close]) {
        restore_one(para, source, delim)?;
    }
    Ok(())
}

fn restore_one(para: &mut Paragraph, source: &SourceText, delim: StyleDelim) -> ParseResult<()> {
    let span = delim.span;
    let text = source
        .slice(span)
        .ok_or_else(|| ParseError::internal(span.start(), "style marker outside the source"))?
        .into_owned();
    let idx = para.item_index_at(span.start());
    trace!("restoring {text:?} at {span:?}");

    let mut reattached = false;
    if let Some(i) = idx {
        let sp = para.items[i].span();
        let before_item = ends_right_before(span, sp);
        if before_item || ends_right_before(sp, span) {
            reattached = para.add_string_to(i, &text, before_item);
        }
    }

    if let Some(p) = idx.and_then(|i| i.checked_sub(1))
        && ends_right_before(para.items[p].span(), span)
    {
        if reattached {
            return merge_if_text(para, p);
        }
        reattached = para.add_string_to(p, &text, false);
    }

    let next = idx.map_or(0, |i| i + 1);
    if let Some(item) = para.items.get(next)
        && ends_right_before(span, item.span())
    {
        if reattached {
            return match idx {
                Some(i) => merge_if_text(para, i),
                None => Ok(()),
            };
        }
        reattached = para.add_string_to(next, &text, true);
    }

    if !reattached {
        para.insert_text(next, &text, span.start(), TextOpts::NONE)?;
    }
    Ok(())
}

/// Whether `a` ends on the column right before `b` starts, on one line.
fn ends_right_before(a: Span, b: Span) -> bool {
    a.end_line == b.start_line && a.end_column + 1 == b.start_column
}

fn merge_if_text(para: &mut Paragraph, idx: usize) -> ParseResult<()> {
    let both_text = para.items.get(idx).is_some_and(|i| i.is_text())
        && para.items.get(idx + 1).is_some_and(|i| i.is_text());
    if both_text { para.merge_from(idx) } else { Ok(()) }
}
