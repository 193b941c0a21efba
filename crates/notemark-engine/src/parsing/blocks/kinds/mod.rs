pub mod block_quote;
pub mod code_fence;
pub mod heading;
pub mod html_block;
pub mod indented_code;
pub mod link_ref;
pub mod list;
pub mod setext;
pub mod table;
pub mod thematic_break;

pub use block_quote::BlockQuote;
pub use code_fence::{CodeFence, FenceKind, FenceOpen};
pub use heading::{AtxOpen, Heading};
pub use html_block::HtmlBlock;
pub use indented_code::IndentedCode;
pub use link_ref::{FootnoteDef, LinkRef, LinkRefDef};
pub use list::{List, ListMarker};
pub use setext::SetextUnderline;
pub use table::Table;
pub use thematic_break::ThematicBreak;
