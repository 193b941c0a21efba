//! # Editing
//!
//! Text edits that editors build from position cache results: removing
//! the delimiters around the cursor, inserting toolbar markers, and
//! applying a batch of line/column edits to a note.
//!
//! Edits are expressed against the unedited text and applied in one go
//! through an `xi_rope` delta, so their order in the batch does not
//! matter as long as they do not overlap.

pub mod delim_edits;

pub use delim_edits::{EditError, TextEdit, apply_edits, insertion_edits, insertion_text, removal_edits};
