//! # Delimiter Pairing Engine
//!
//! Applies a user-defined symmetric delimiter (`==`, `--`, `^` ...) to a
//! paragraph that the inline pass already styled.
//!
//! ## Steps
//!
//! 1. **scan**: find occurrences in the text items and classify each one
//!    as opening, closing or both from the virgin characters around it
//! 2. **pair**: match occurrences on a stack, refusing pairs that would
//!    leave an existing style half inside
//! 3. **repair**: undo the existing styles a new pair cuts through and put
//!    their marker characters back into the text
//! 4. **commit**: cut the paired characters out of the text, attach them
//!    as `StyleDelim`s and set the style bit on the wrapped items
//!
//! Nothing changes unless at least one pair is formed.

pub mod commit;
pub mod pair;
pub mod repair;
pub mod scan;

use log::debug;

use crate::error::ParseResult;
use crate::parsing::ast::{Paragraph, TextOpts};
use crate::parsing::rope::SourceText;

pub use commit::{add_style_opt, remove_delim_text};
pub use pair::{Pairing, pair_delims};
pub use repair::{remove_bad_styles, restore_bad_text};
pub use scan::{DelimKind, DelimOccurrence, StylePair, applied_styles, drop_leading_closers, scan_occurrences};

/// Applies `delim` as `style` to the paragraph.
///
/// Returns whether any pair was formed.
pub fn apply_delimiter(para: &mut Paragraph, source: &SourceText, delim: &str, style: TextOpts) -> ParseResult<bool> {
    if delim.is_empty() || para.ledger.is_empty() {
        return Ok(false);
    }
    let mut styles = applied_styles(&para.items);
    let mut occurrences = scan_occurrences(para, source, delim);
    drop_leading_closers(&mut occurrences);
    if occurrences.is_empty() {
        return Ok(false);
    }

    let Pairing { pairs, bad } = pair_delims(&mut styles, &occurrences);
    if pairs.is_empty() {
        return Ok(false);
    }
    remove_bad_styles(para, &styles, &bad);
    restore_bad_text(para, source, &bad)?;
    remove_delim_text(para, &pairs, style)?;
    add_style_opt(para, &pairs, style);
    debug!(
        "{delim:?} in paragraph at {:?}: {} pairs, {} styles undone",
        para.span,
        pairs.len(),
        bad.len()
    );
    Ok(true)
}
