use serde::Serialize;

use super::opts::{StyleDelim, Styling, TextOpts};
use crate::parsing::rope::Span;

/// Capability shared by every inline item: a source span plus style state.
pub trait ItemWithOpts {
    fn span(&self) -> Span;
    fn set_span(&mut self, span: Span);
    fn styling(&self) -> &Styling;
    fn styling_mut(&mut self) -> &mut Styling;

    fn opts(&self) -> TextOpts {
        self.styling().opts
    }

    fn open_styles(&self) -> &[StyleDelim] {
        &self.styling().open_styles
    }

    fn close_styles(&self) -> &[StyleDelim] {
        &self.styling().close_styles
    }

    /// The span widened to the style delimiters the item holds.
    ///
    /// Adjacency between items is measured on this span: `*a*b` has `a`
    /// ending at the closing `*` and `b` starting right after it.
    fn outer_span(&self) -> Span {
        let styling = self.styling();
        let mut sp = self.span();
        if let Some(first) = styling.open_styles.first() {
            sp = Span::cover(sp, first.span);
        }
        if let Some(last) = styling.close_styles.last() {
            sp = Span::cover(sp, last.span);
        }
        sp
    }
}

/// Plain text backed by one ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Text {
    pub span: Span,
    pub styling: Styling,
    /// Display text: entities decoded, escapes removed, line edges trimmed.
    pub text: String,
}

/// Inline or reference link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub span: Span,
    pub styling: Styling,
    pub url: String,
    pub title: Option<String>,
    pub text: String,
    pub text_span: Option<Span>,
    pub url_span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    pub span: Span,
    pub styling: Styling,
    pub url: String,
    pub alt: String,
    pub title: Option<String>,
}

/// Backtick code span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineCode {
    pub span: Span,
    pub styling: Styling,
    pub text: String,
    pub start_delim: Span,
    pub end_delim: Span,
}

impl InlineCode {
    /// Content shown when no highlighter output is available.
    pub fn plain_text(&self) -> &str {
        &self.text
    }
}

/// A resolved `:name:` or `:name:qualifier:` shortcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Emoji {
    pub span: Span,
    pub styling: Styling,
    pub unicode: String,
    pub name_span: Span,
    /// Span of the tone/variant qualifier, or `name_span` when there is none.
    pub options_span: Span,
}

impl Emoji {
    /// The leading and trailing `:` markers.
    pub fn delims(&self) -> (Span, Span) {
        (
            Span::on_line(self.span.start_line, self.span.start_column, self.span.start_column),
            Span::on_line(self.span.end_line, self.span.end_column, self.span.end_column),
        )
    }
}

/// A `[[path:header|title]]` link to another note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteLink {
    pub span: Span,
    pub styling: Styling,
    /// `<sanitized path>@HEADER@<header>`.
    pub url: String,
    pub url_span: Span,
    pub text: String,
    pub text_span: Span,
    /// The link points at the note it is written in.
    pub self_reference: bool,
}

/// Separator between the note path and the header inside a note-link URL.
pub const HEADER_SEPARATOR: &str = "@HEADER@";

impl NoteLink {
    /// Splits the URL back into `(path, header)`.
    pub fn target(&self) -> (&str, &str) {
        self.url.split_once(HEADER_SEPARATOR).unwrap_or((self.url.as_str(), ""))
    }
}

/// A heading written as `N# text`, anchoring a numbered level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderAnchor {
    pub span: Span,
    pub styling: Styling,
    pub level: u8,
    pub delim_span: Span,
    pub text: String,
    pub text_span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineBreak {
    pub span: Span,
    pub styling: Styling,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawHtml {
    pub span: Span,
    pub styling: Styling,
    pub html: String,
}

/// Closed set of inline item kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum InlineItem {
    Text(Text),
    Link(Link),
    Image(Image),
    Code(InlineCode),
    Emoji(Emoji),
    NoteLink(NoteLink),
    HeaderAnchor(HeaderAnchor),
    LineBreak(LineBreak),
    RawHtml(RawHtml),
}

macro_rules! impl_with_opts {
    ($($variant:ident($ty:ident)),+ $(,)?) => {
        $(
            impl ItemWithOpts for $ty {
                fn span(&self) -> Span {
                    self.span
                }

                fn set_span(&mut self, span: Span) {
                    self.span = span;
                }

                fn styling(&self) -> &Styling {
                    &self.styling
                }

                fn styling_mut(&mut self) -> &mut Styling {
                    &mut self.styling
                }
            }
        )+

        impl ItemWithOpts for InlineItem {
            fn span(&self) -> Span {
                match self {
                    $(InlineItem::$variant(item) => item.span,)+
                }
            }

            fn set_span(&mut self, span: Span) {
                match self {
                    $(InlineItem::$variant(item) => item.span = span,)+
                }
            }

            fn styling(&self) -> &Styling {
                match self {
                    $(InlineItem::$variant(item) => &item.styling,)+
                }
            }

            fn styling_mut(&mut self) -> &mut Styling {
                match self {
                    $(InlineItem::$variant(item) => &mut item.styling,)+
                }
            }
        }
    };
}

impl_with_opts!(
    Text(Text),
    Link(Link),
    Image(Image),
    Code(InlineCode),
    Emoji(Emoji),
    NoteLink(NoteLink),
    HeaderAnchor(HeaderAnchor),
    LineBreak(LineBreak),
    RawHtml(RawHtml),
);

impl InlineItem {
    pub fn is_text(&self) -> bool {
        matches!(self, InlineItem::Text(_))
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            InlineItem::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match self {
            InlineItem::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Short kind name used in logs and dumps.
    pub fn kind_name(&self) -> &'static str {
        match self {
            InlineItem::Text(_) => "text",
            InlineItem::Link(_) => "link",
            InlineItem::Image(_) => "image",
            InlineItem::Code(_) => "code",
            InlineItem::Emoji(_) => "emoji",
            InlineItem::NoteLink(_) => "note-link",
            InlineItem::HeaderAnchor(_) => "header-anchor",
            InlineItem::LineBreak(_) => "line-break",
            InlineItem::RawHtml(_) => "raw-html",
        }
    }

    /// Start and end markers of items that carry their own delimiters.
    pub fn own_delims(&self) -> Option<(Span, Span)> {
        match self {
            InlineItem::Code(c) => Some((c.start_delim, c.end_delim)),
            InlineItem::Emoji(e) => Some(e.delims()),
            _ => None,
        }
    }
}

impl Text {
    pub fn new(span: Span, text: impl Into<String>, opts: TextOpts) -> Self {
        Self {
            span,
            styling: Styling::with_opts(opts),
            text: text.into(),
        }
    }
}
