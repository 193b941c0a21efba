pub mod source;
pub mod span;

pub use source::SourceText;
pub use span::{Position, Span};
