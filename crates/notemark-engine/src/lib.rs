//! Markdown note parsing for notemark.
//!
//! [`Parser`] turns a note into a [`Document`]: blocks holding paragraphs of
//! inline items, each item carrying its position in the unmodified text.
//! Content plugins (extended syntaxes, note links, header anchors, emoji)
//! rewrite paragraphs after the inline pass. [`PosCache`] answers which
//! delimiters surround a cursor, and [`editing`] turns those answers into
//! text edits.

pub mod cancel;
pub mod config;
pub mod editing;
pub mod error;
pub mod parsing;

pub use cancel::CancellationToken;
pub use config::{EmojiTone, ExtendedSyntax, ParserConfig, PluginSet};
pub use error::{ParseError, ParseResult};
pub use parsing::Parser;
pub use parsing::ast::{Block, Document, InlineItem, ItemWithOpts, Paragraph, TextOpts};
pub use parsing::mapper::{ChangeTracker, LinkedNote, NoteMapper, extract_mappings};
pub use parsing::poscache::{BlockDelimType, DelimType, DelimsInfo, PosCache};
pub use parsing::rope::{Position, Span};
