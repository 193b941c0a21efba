//! # Inline Kinds
//!
//! Recognizers for inline constructs, each owning its delimiter constants.
//!
//! ## Types
//!
//! - **`CodeSpan`**: `TICK` runs, a raw zone that suppresses other parsing
//! - **`LinkSyntax`**: `[text](url)`, reference links and `!` images
//! - **`Autolink`**: `<scheme:...>`, `<user@host>` and bare URLs
//! - **`InlineHtml`**: tags and comments kept verbatim
//! - **`Emphasis`**: `*`, `_` and `~~` runs with their flanking rules
//!
//! The lexer calls these constants; it never hardcodes `` ` `` or `[`.

pub mod autolink;
pub mod code_span;
pub mod emphasis;
pub mod html;
pub mod link;

pub use autolink::Autolink;
pub use code_span::CodeSpan;
pub use emphasis::Emphasis;
pub use html::InlineHtml;
pub use link::LinkSyntax;
