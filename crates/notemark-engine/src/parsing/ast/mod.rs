//! # Document Tree
//!
//! Closed sum types for blocks and inline items.
//!
//! - **`block`**: `Document`, `Block` and the container/leaf block structs
//! - **`paragraph`**: `Paragraph` with its raw text ledger (`LedgerEntry`)
//! - **`inline`**: `InlineItem` and the `ItemWithOpts` capability
//! - **`opts`**: `TextOpts` bitmask, `StyleDelim` and `Styling`

pub mod block;
pub mod inline;
pub mod opts;
pub mod paragraph;

pub use block::{
    Alignment, Block, BlockQuote, CodeBlock, Document, Footnote, Heading, HorizontalRule,
    HtmlBlock, LinkReference, List, ListItem, Table, TableCell,
};
pub use inline::{
    Emoji, HEADER_SEPARATOR, HeaderAnchor, Image, InlineCode, InlineItem, ItemWithOpts, LineBreak,
    Link, NoteLink, RawHtml, Text,
};
pub use opts::{StyleDelim, Styling, TextOpts};
pub use paragraph::{LedgerEntry, Paragraph};
