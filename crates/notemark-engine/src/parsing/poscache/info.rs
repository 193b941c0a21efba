use serde::Serialize;

use crate::parsing::ast::TextOpts;
use crate::parsing::rope::Span;

/// Block-level delimiter kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BlockDelimType {
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Heading5,
    Heading6,
    CodeBlock,
    BlockQuote,
    OrderedList,
    UnorderedList,
}

impl BlockDelimType {
    /// Heading kind for `level`, clamped to 1..=6.
    pub fn heading(level: u8) -> Self {
        match level {
            0 | 1 => Self::Heading1,
            2 => Self::Heading2,
            3 => Self::Heading3,
            4 => Self::Heading4,
            5 => Self::Heading5,
            _ => Self::Heading6,
        }
    }

    pub fn heading_level(self) -> Option<u8> {
        match self {
            Self::Heading1 => Some(1),
            Self::Heading2 => Some(2),
            Self::Heading3 => Some(3),
            Self::Heading4 => Some(4),
            Self::Heading5 => Some(5),
            Self::Heading6 => Some(6),
            _ => None,
        }
    }
}

/// What a delimiter pair marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DelimType {
    /// Markers owned by an item, such as code backticks or emoji colons.
    Plain,
    /// An inline style bit.
    Style(TextOpts),
    Block(BlockDelimType),
}

/// A delimiter, or a pair of them, found around a position.
///
/// Equality looks at the spans only: the same markers reached from two
/// lines of a selection are one result.
#[derive(Debug, Clone, Copy, Eq, Serialize)]
pub struct DelimsInfo {
    /// Level of the heading holding the delimiters, 0 outside headings.
    pub heading_level: u8,
    pub delim_type: DelimType,
    pub open: Span,
    /// `None` for single markers such as `#` runs or list bullets.
    pub close: Option<Span>,
}

impl PartialEq for DelimsInfo {
    fn eq(&self, other: &Self) -> bool {
        self.open == other.open && self.close == other.close
    }
}

impl DelimsInfo {
    pub fn single(heading_level: u8, kind: BlockDelimType, open: Span) -> Self {
        Self {
            heading_level,
            delim_type: DelimType::Block(kind),
            open,
            close: None,
        }
    }

    pub fn pair(heading_level: u8, delim_type: DelimType, open: Span, close: Span) -> Self {
        Self {
            heading_level,
            delim_type,
            open,
            close: Some(close),
        }
    }

    /// Every marker span, opening first.
    pub fn spans(&self) -> impl Iterator<Item = Span> {
        std::iter::once(self.open).chain(self.close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_kind_and_level() {
        let a = DelimsInfo::pair(1, DelimType::Style(TextOpts::BOLD), Span::on_line(0, 0, 1), Span::on_line(0, 6, 7));
        let b = DelimsInfo::pair(0, DelimType::Plain, Span::on_line(0, 0, 1), Span::on_line(0, 6, 7));
        assert_eq!(a, b);
        assert_ne!(a, DelimsInfo::single(0, BlockDelimType::Heading1, Span::on_line(0, 0, 1)));
    }

    #[test]
    fn heading_kinds_clamp() {
        assert_eq!(BlockDelimType::heading(0), BlockDelimType::Heading1);
        assert_eq!(BlockDelimType::heading(9), BlockDelimType::Heading6);
        assert_eq!(BlockDelimType::heading(3).heading_level(), Some(3));
        assert_eq!(BlockDelimType::CodeBlock.heading_level(), None);
    }
}
