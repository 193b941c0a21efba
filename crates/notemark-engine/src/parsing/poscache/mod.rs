//! # Position Cache
//!
//! A reverse index from source lines to the delimiters and items of a
//! finished [`Document`], for editor highlighting and toolbar commands.
//!
//! Building walks every block depth-first and records two kinds of entry:
//!
//! - block delimiters (`#` runs, code fences, `>` markers, list markers),
//!   returned whenever the query touches the line they govern
//! - inline delimiter pairs of a paragraph, paired last-in first-out the
//!   same way the delimiter engine pairs applied styles, returned when
//!   they surround the cursor or reach into the selection
//!
//! The cache borrows the document and never changes it.

pub mod info;

use std::collections::BTreeMap;

use log::trace;

use crate::parsing::ast::{Block, Document, InlineItem, ItemWithOpts, Paragraph};
use crate::parsing::delims::applied_styles;
use crate::parsing::rope::{Position, Span};

pub use info::{BlockDelimType, DelimType, DelimsInfo};

#[derive(Debug)]
enum Entry<'d> {
    /// Single block markers and the lines they govern.
    Block { lines: (usize, usize), info: DelimsInfo },
    /// A paragraph and its inline pairs.
    Inline {
        para: &'d Paragraph,
        heading_level: u8,
        pairs: Vec<DelimsInfo>,
    },
}

impl Entry<'_> {
    fn lines(&self) -> (usize, usize) {
        match self {
            Entry::Block { lines, .. } => *lines,
            Entry::Inline { para, .. } => (para.span.start_line, para.span.end_line),
        }
    }
}

/// Reverse index over one document.
#[derive(Debug)]
pub struct PosCache<'d> {
    doc: &'d Document,
    entries: Vec<Entry<'d>>,
    by_line: BTreeMap<usize, Vec<usize>>,
}

impl<'d> PosCache<'d> {
    pub fn build(doc: &'d Document) -> Self {
        let mut cache = Self {
            doc,
            entries: Vec::new(),
            by_line: BTreeMap::new(),
        };
        for block in &doc.blocks {
            cache.visit(block);
        }
        for (idx, entry) in cache.entries.iter().enumerate() {
            let (first, last) = entry.lines();
            for line in first..=last {
                cache.by_line.entry(line).or_default().push(idx);
            }
        }
        trace!("position cache: {} entries over {} lines", cache.entries.len(), cache.by_line.len());
        cache
    }

    pub fn document(&self) -> &'d Document {
        self.doc
    }

    fn push_block(&mut self, lines: (usize, usize), info: DelimsInfo) {
        self.entries.push(Entry::Block { lines, info });
    }

    fn push_inline(&mut self, para: &'d Paragraph, heading_level: u8) {
        let pairs = inline_pairs(para, heading_level);
        self.entries.push(Entry::Inline {
            para,
            heading_level,
            pairs,
        });
    }

    fn visit(&mut self, block: &'d Block) {
        match block {
            Block::Heading(h) => {
                if let Some(delim) = h.delim {
                    let info = DelimsInfo::single(h.level, BlockDelimType::heading(h.level), delim);
                    self.push_block((h.span.start_line, h.span.end_line), info);
                }
                self.push_inline(&h.text, h.level);
            }
            Block::Paragraph(p) => self.push_inline(p, 0),
            Block::CodeBlock(c) => {
                if let (true, Some(open)) = (c.fenced, c.start_delim) {
                    let info = DelimsInfo {
                        heading_level: 0,
                        delim_type: DelimType::Block(BlockDelimType::CodeBlock),
                        open,
                        close: c.end_delim,
                    };
                    self.push_block((c.span.start_line, c.span.end_line), info);
                }
            }
            Block::BlockQuote(q) => {
                for marker in &q.delims {
                    let info = DelimsInfo::single(0, BlockDelimType::BlockQuote, *marker);
                    self.push_block((marker.start_line, marker.start_line), info);
                }
                for child in &q.blocks {
                    self.visit(child);
                }
            }
            Block::List(l) => {
                let kind = if l.ordered {
                    BlockDelimType::OrderedList
                } else {
                    BlockDelimType::UnorderedList
                };
                for item in &l.items {
                    let line = item.delim.start_line;
                    self.push_block((line, line), DelimsInfo::single(0, kind, item.delim));
                    for child in &item.blocks {
                        self.visit(child);
                    }
                }
            }
            Block::Table(t) => {
                for cell in t.header.iter().chain(t.rows.iter().flatten()) {
                    self.push_inline(&cell.content, 0);
                }
            }
            Block::Footnote(f) => {
                for child in &f.blocks {
                    self.visit(child);
                }
            }
            Block::HorizontalRule(_) | Block::RawHtml(_) => {}
        }
    }

    /// Entry indices touching `first..=last`, in document order.
    fn entries_on(&self, first: usize, last: usize) -> Vec<usize> {
        let mut found: Vec<usize> = self.by_line.range(first..=last).flat_map(|(_, v)| v.iter().copied()).collect();
        found.sort_unstable();
        found.dedup();
        found
    }

    /// Delimiters around `cursor`, or reaching into `selection` when one
    /// is given.
    ///
    /// Block delimiters come back when the query touches the line they
    /// govern. Inline pairs come back when they surround the cursor (a
    /// cursor right next to the outer edge of a marker still counts), or
    /// when either marker lies inside the selection.
    pub fn delims_surrounding(&self, cursor: Position, selection: Option<Span>) -> Vec<DelimsInfo> {
        let here = Span::new(cursor.line, cursor.column, cursor.line, cursor.column);
        let range = selection.map_or(here, |s| Span::cover(s, here));
        let mut out: Vec<DelimsInfo> = Vec::new();
        let mut add = |info: DelimsInfo| {
            if !out.contains(&info) {
                out.push(info);
            }
        };

        for idx in self.entries_on(range.start_line, range.end_line) {
            match &self.entries[idx] {
                Entry::Block { info, .. } => add(*info),
                Entry::Inline { pairs, .. } => {
                    for info in pairs {
                        let Some(close) = info.close else {
                            continue;
                        };
                        let around = here.is_between(info.open, close, true);
                        let selected = selection.is_some_and(|s| s.encloses(info.open) || s.encloses(close));
                        if around || selected {
                            add(*info);
                        }
                    }
                }
            }
        }
        out
    }

    /// Blocks containing `pos`, outermost first.
    pub fn blocks_at(&self, pos: Position) -> Vec<&'d Block> {
        let mut chain = Vec::new();
        let mut level: Vec<&'d Block> = self.doc.blocks.iter().collect();
        loop {
            let Some(block) = level.iter().copied().find(|b| b.span().contains(pos)) else {
                break;
            };
            chain.push(block);
            level = block.children();
        }
        chain
    }

    /// Inline items overlapping `span`, with the heading level of the
    /// paragraph holding them.
    pub fn items_overlapping(&self, span: Span) -> Vec<(&'d InlineItem, u8)> {
        let mut out = Vec::new();
        for idx in self.entries_on(span.start_line, span.end_line) {
            if let Entry::Inline {
                para, heading_level, ..
            } = &self.entries[idx]
            {
                let para: &'d Paragraph = *para;
                out.extend(
                    para.items
                        .iter()
                        .filter(|i| i.outer_span().intersects(span))
                        .map(|i| (i, *heading_level)),
                );
            }
        }
        out
    }
}

/// Marker pairs of one paragraph, ordered by their opening marker.
fn inline_pairs(para: &Paragraph, heading_level: u8) -> Vec<DelimsInfo> {
    let mut pairs: Vec<DelimsInfo> = para
        .items
        .iter()
        .filter_map(InlineItem::own_delims)
        .map(|(open, close)| DelimsInfo::pair(heading_level, DelimType::Plain, open, close))
        .collect();
    pairs.extend(
        applied_styles(&para.items)
            .into_iter()
            .map(|p| DelimsInfo::pair(heading_level, DelimType::Style(p.open.style), p.open.span, p.close.span)),
    );
    pairs.sort_by_key(|p| p.open);
    pairs
}
