use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::Serialize;

use crate::parsing::rope::Span;

/// Bitmask of inline styles applied to an item.
///
/// The three low bits are the built-in Markdown styles. Extended syntaxes get
/// one bit each starting at `8`.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TextOpts(u32);

impl TextOpts {
    pub const NONE: Self = Self(0);
    pub const BOLD: Self = Self(1);
    pub const ITALIC: Self = Self(2);
    pub const STRIKETHROUGH: Self = Self(4);

    /// Highest extended-syntax index that still fits in the mask.
    pub const MAX_EXTENDED_INDEX: u32 = 28;

    /// The bit reserved for the extended syntax with the given index.
    ///
    /// Index 0 is `8`, index 1 is `16`, and so on.
    pub const fn extended(index: u32) -> Self {
        Self(8 << index)
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl BitOr for TextOpts {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for TextOpts {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for TextOpts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TextOpts({})", self.0)
    }
}

/// Where a style marker sits in the source.
///
/// The marker text itself is not part of any item; this records it so the
/// editor can highlight and remove it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StyleDelim {
    pub style: TextOpts,
    pub span: Span,
}

impl StyleDelim {
    pub const fn new(style: TextOpts, span: Span) -> Self {
        Self { style, span }
    }
}

/// Style state shared by every inline item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Styling {
    pub opts: TextOpts,
    pub open_styles: Vec<StyleDelim>,
    pub close_styles: Vec<StyleDelim>,
}

impl Styling {
    pub fn with_opts(opts: TextOpts) -> Self {
        Self {
            opts,
            ..Self::default()
        }
    }

    /// Keeps both delimiter lists in document order.
    pub fn sort(&mut self) {
        self.open_styles.sort_by_key(|d| d.span);
        self.close_styles.sort_by_key(|d| d.span);
    }

    pub fn has_delims(&self) -> bool {
        !self.open_styles.is_empty() || !self.close_styles.is_empty()
    }
}
