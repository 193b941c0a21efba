//! # Block Segmentation
//!
//! Splits a note into block tokens before any inline work happens.
//!
//! ## Phases
//!
//! 1. **Normalization** (`normalize`): tabs expand to four columns and
//!    non-breaking spaces become plain spaces. Each line keeps a `ColumnMap`
//!    back to its virgin columns.
//! 2. **Segmentation** (`segmenter`): a priority-ordered dispatcher matches
//!    one block at a time. Containers (lists, blockquotes, footnotes) strip
//!    their prefixes and recurse on their bodies.
//!
//! ## Modules
//!
//! - **`normalize`**: `Normalizer`, `NormalizedLine`, `WorkLine` views
//! - **`content`**: `ContentLine`/`InlineSource`, the virgin text handed to inline parsing
//! - **`kinds`**: per-block recognizers with their delimiter constants
//! - **`types`**: the `Token` tree produced by segmentation
//! - **`segmenter`**: the dispatcher itself
//!
//! ## Key Invariants
//!
//! - Every span in a token uses virgin columns, never normalized ones
//! - Fenced and indented code are raw zones: no inline parsing inside
//! - Nesting deeper than `MAX_NESTING` fails with `ParseError::NestingTooDeep`

pub mod content;
pub mod kinds;
pub mod normalize;
pub mod segmenter;
pub mod types;

pub use content::{ContentLine, InlineSource};
pub use normalize::{NormalizedLine, Normalizer, WorkLine};
pub use segmenter::{MAX_NESTING, Segmenter};
pub use types::{CellToken, ItemToken, Token};
