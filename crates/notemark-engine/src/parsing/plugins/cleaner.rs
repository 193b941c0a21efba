use log::trace;

use crate::error::ParseResult;
use crate::parsing::ast::{ItemWithOpts, Paragraph};

use super::{InlinePlugin, PluginContext};

pub const PRIORITY: i32 = 1024;

/// Last step of every paragraph.
///
/// Drops text items that hold only whitespace, then records on each ledger
/// entry whether its text is separated from its neighbours by a space.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataCleaner;

impl InlinePlugin for DataCleaner {
    fn name(&self) -> &'static str {
        "data-cleaner"
    }

    fn priority(&self) -> i32 {
        PRIORITY
    }

    fn run(&self, para: &mut Paragraph, _ctx: &PluginContext<'_>) -> ParseResult<()> {
        remove_blank_texts(para);
        mark_spacing(para);
        Ok(())
    }
}

fn remove_blank_texts(para: &mut Paragraph) {
    let mut slot = para.ledger.len();
    while slot > 0 {
        slot -= 1;
        if !para.ledger[slot].text.trim().is_empty() {
            continue;
        }
        if let Some(idx) = para.text_item_index(slot) {
            trace!("dropping blank text at {:?}", para.items[idx].span());
            para.remove_item(idx);
        }
    }
}

fn mark_spacing(para: &mut Paragraph) {
    let outer: Vec<_> = para.items.iter().map(|i| i.outer_span()).collect();
    let mut slot = 0;
    for (idx, item) in para.items.iter().enumerate() {
        if !item.is_text() {
            continue;
        }
        let Some(entry) = para.ledger.get_mut(slot) else {
            break;
        };
        slot += 1;
        let sp = outer[idx];
        let gap_before = idx
            .checked_sub(1)
            .map(|p| outer[p])
            .is_none_or(|prev| prev.end_line != sp.start_line || prev.end_column + 1 != sp.start_column);
        let gap_after = outer
            .get(idx + 1)
            .is_none_or(|next| next.start_line != sp.end_line || sp.end_column + 1 != next.start_column);
        entry.space_before = gap_before || entry.text.starts_with(char::is_whitespace);
        entry.space_after = gap_after || entry.text.ends_with(char::is_whitespace);
    }
}
