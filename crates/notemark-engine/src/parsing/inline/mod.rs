//! # Inline Parsing
//!
//! Turns a paragraph's content lines into inline items backed by a raw text
//! ledger.
//!
//! ## Architecture
//!
//! The content lines are joined into one flat string (`text::ParaText`)
//! that remembers the virgin `(line, column)` of every byte. A cursor-based
//! lexer splits it into pieces, emphasis runs are paired, and the pieces are
//! assembled into a `Paragraph`.
//!
//! ## Modules
//!
//! - **`cursor`**: `Cursor` for byte-by-byte scanning with save/restore
//! - **`text`**: `ParaText`, the flat text and its position map
//! - **`kinds`**: recognizers that own their delimiters
//! - **`lexer`**: `lex()` producing text runs, items and emphasis runs
//! - **`emphasis`**: pairing of `*`, `_` and `~~` runs
//!
//! ## Raw Zone Precedence
//!
//! Code spans are tried before links and emphasis: `` `[x](y)` `` is code.
//! Matched emphasis characters leave the text and survive only as
//! `StyleDelim`s on the first and last item they wrap.

pub mod cursor;
pub mod emphasis;
pub mod kinds;
pub mod lexer;
pub mod text;

use std::collections::BTreeMap;

use log::trace;

use crate::parsing::ast::{InlineItem, ItemWithOpts, LinkReference, Paragraph, StyleDelim, Styling};
use crate::parsing::blocks::InlineSource;

pub use emphasis::{EmphasisMatch, match_emphasis};
pub use lexer::{Piece, lex};
pub use text::ParaText;

enum FragKind {
    Text { start: usize, end: usize },
    Item(InlineItem),
}

/// A piece on its way to becoming a paragraph item.
struct Frag {
    piece: usize,
    kind: FragKind,
    styling: Styling,
}

/// Parses one paragraph's content into items and ledger entries.
///
/// # Arguments
/// - `source`: the paragraph's content lines in virgin coordinates
/// - `refs`: link reference definitions of the document
///
/// # Returns
/// A paragraph whose text items tile its content, minus line-end whitespace
/// and elided emphasis markers.
pub fn parse_inline(source: &InlineSource, refs: &BTreeMap<String, LinkReference>) -> Paragraph {
    let mut para = Paragraph::new(source.span().unwrap_or_default());
    let text = ParaText::new(source);
    if text.is_empty() {
        return para;
    }
    let mut pieces = lex(&text, refs);
    let matches = match_emphasis(&mut pieces, &text);

    let mut frags: Vec<Frag> = pieces
        .into_iter()
        .enumerate()
        .filter_map(|(piece, p)| {
            let kind = match p {
                Piece::Text { start, end } => FragKind::Text { start, end },
                Piece::Delim(d) if d.len > 0 => FragKind::Text {
                    start: d.start,
                    end: d.start + d.len,
                },
                Piece::Delim(_) => return None,
                Piece::Item(item) => FragKind::Item(item),
            };
            Some(Frag {
                piece,
                kind,
                styling: Styling::default(),
            })
        })
        .collect();

    for m in &matches {
        let inside = |f: &Frag| f.piece > m.opener && f.piece < m.closer;
        for f in frags.iter_mut().filter(|f| inside(f)) {
            f.styling.opts |= m.style;
        }
        if let Some(f) = frags.iter_mut().find(|f| inside(f)) {
            f.styling.open_styles.push(StyleDelim::new(m.style, m.open_span));
        }
        if let Some(f) = frags.iter_mut().rev().find(|f| inside(f)) {
            f.styling.close_styles.push(StyleDelim::new(m.style, m.close_span));
        }
    }

    let frags = merge_text(frags);
    for mut f in frags {
        f.styling.sort();
        match f.kind {
            FragKind::Text { start, end } => {
                let idx = para.push_text(&text.text[start..end], text.pos(start), f.styling.opts);
                *para.items[idx].styling_mut() = f.styling;
            }
            FragKind::Item(mut item) => {
                *item.styling_mut() = f.styling;
                para.items.push(item);
            }
        }
    }
    para.refresh_texts();
    trace!(
        "inline pass over {:?}: {} items, {} emphasis pairs",
        para.span,
        para.items.len(),
        matches.len()
    );
    para
}

/// Joins contiguous text fragments that nothing separates.
fn merge_text(frags: Vec<Frag>) -> Vec<Frag> {
    let mut out: Vec<Frag> = Vec::with_capacity(frags.len());
    for f in frags {
        if let Some(prev) = out.last_mut()
            && let (FragKind::Text { end, .. }, FragKind::Text { start, end: next_end }) = (&mut prev.kind, &f.kind)
            && *end == *start
            && prev.styling.opts == f.styling.opts
            && prev.styling.close_styles.is_empty()
            && f.styling.open_styles.is_empty()
        {
            *end = *next_end;
            prev.styling.close_styles = f.styling.close_styles;
            continue;
        }
        out.push(f);
    }
    out
}
