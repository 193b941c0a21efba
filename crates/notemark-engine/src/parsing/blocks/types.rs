use crate::parsing::ast::Alignment;
use crate::parsing::rope::Span;

use super::content::InlineSource;

/// A block recognised by the segmenter, before inline construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Heading {
        span: Span,
        level: u8,
        delim: Option<Span>,
        content: InlineSource,
        label: Option<(Span, String)>,
    },
    Paragraph {
        span: Span,
        content: InlineSource,
    },
    Code {
        span: Span,
        fenced: bool,
        info: String,
        text: String,
        start_delim: Option<Span>,
        end_delim: Option<Span>,
    },
    BlockQuote {
        span: Span,
        delims: Vec<Span>,
        children: Vec<Token>,
    },
    List {
        span: Span,
        ordered: bool,
        start_number: u64,
        loose: bool,
        items: Vec<ItemToken>,
    },
    Table {
        span: Span,
        alignments: Vec<Alignment>,
        header: Vec<CellToken>,
        rows: Vec<Vec<CellToken>>,
    },
    Rule {
        span: Span,
    },
    Html {
        span: Span,
        html: String,
    },
    Footnote {
        span: Span,
        id: String,
        children: Vec<Token>,
    },
}

impl Token {
    /// Short kind name used in logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Token::Heading { .. } => "heading",
            Token::Paragraph { .. } => "paragraph",
            Token::Code { .. } => "code",
            Token::BlockQuote { .. } => "blockquote",
            Token::List { .. } => "list",
            Token::Table { .. } => "table",
            Token::Rule { .. } => "rule",
            Token::Html { .. } => "html",
            Token::Footnote { .. } => "footnote",
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Token::Heading { span, .. }
            | Token::Paragraph { span, .. }
            | Token::Code { span, .. }
            | Token::BlockQuote { span, .. }
            | Token::List { span, .. }
            | Token::Table { span, .. }
            | Token::Rule { span }
            | Token::Html { span, .. }
            | Token::Footnote { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemToken {
    pub span: Span,
    pub delim: Span,
    pub number: Option<u64>,
    pub task: Option<bool>,
    pub children: Vec<Token>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellToken {
    pub span: Span,
    pub content: InlineSource,
}
