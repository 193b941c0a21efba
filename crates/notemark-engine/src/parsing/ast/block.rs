use std::collections::BTreeMap;

use serde::Serialize;

use super::paragraph::Paragraph;
use crate::parsing::rope::Span;

/// Root of a parsed note.
///
/// Built once per parse; consumers clone it rather than keep references into
/// a parse in progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    pub blocks: Vec<Block>,
    /// Link reference definitions keyed by normalized label.
    pub references: BTreeMap<String, LinkReference>,
}

impl Document {
    /// Every paragraph of the document in source order, nested ones
    /// included.
    pub fn paragraphs(&self) -> Vec<&Paragraph> {
        let mut out = Vec::new();
        for block in &self.blocks {
            block.collect_paragraphs(&mut out);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkReference {
    pub url: String,
    pub title: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum Block {
    Heading(Heading),
    Paragraph(Paragraph),
    List(List),
    BlockQuote(BlockQuote),
    CodeBlock(CodeBlock),
    Table(Table),
    HorizontalRule(HorizontalRule),
    RawHtml(HtmlBlock),
    Footnote(Footnote),
}

impl Block {
    pub fn span(&self) -> Span {
        match self {
            Block::Heading(b) => b.span,
            Block::Paragraph(b) => b.span,
            Block::List(b) => b.span,
            Block::BlockQuote(b) => b.span,
            Block::CodeBlock(b) => b.span,
            Block::Table(b) => b.span,
            Block::HorizontalRule(b) => b.span,
            Block::RawHtml(b) => b.span,
            Block::Footnote(b) => b.span,
        }
    }

    /// Child blocks of a container block.
    pub fn children(&self) -> Vec<&Block> {
        match self {
            Block::List(l) => l.items.iter().flat_map(|i| &i.blocks).collect(),
            Block::BlockQuote(q) => q.blocks.iter().collect(),
            Block::Footnote(f) => f.blocks.iter().collect(),
            _ => Vec::new(),
        }
    }

    fn collect_paragraphs<'a>(&'a self, out: &mut Vec<&'a Paragraph>) {
        match self {
            Block::Heading(h) => out.push(&h.text),
            Block::Paragraph(p) => out.push(p),
            Block::Table(t) => out.extend(t.header.iter().chain(t.rows.iter().flatten()).map(|c| &c.content)),
            _ => {
                for child in self.children() {
                    child.collect_paragraphs(out);
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub span: Span,
    pub level: u8,
    pub text: Paragraph,
    /// The leading `#` run, or the underline of a setext heading.
    pub delim: Option<Span>,
    /// Span of an explicit `{#label}` anchor at the end of the heading.
    pub label_span: Option<Span>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct List {
    pub span: Span,
    pub ordered: bool,
    pub start_number: u64,
    pub loose: bool,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
    pub span: Span,
    /// Bullet or `N.` marker.
    pub delim: Span,
    pub number: Option<u64>,
    /// `Some(checked)` for task items.
    pub task: Option<bool>,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockQuote {
    pub span: Span,
    /// One `>` marker per quoted line.
    pub delims: Vec<Span>,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    pub span: Span,
    pub fenced: bool,
    pub info: String,
    pub text: String,
    pub start_delim: Option<Span>,
    pub end_delim: Option<Span>,
}

impl CodeBlock {
    /// Content shown when no highlighter output is available.
    pub fn plain_text(&self) -> &str {
        &self.text
    }

    pub fn language(&self) -> Option<&str> {
        self.info.split_whitespace().next()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Alignment {
    None,
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableCell {
    pub span: Span,
    pub content: Paragraph,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub span: Span,
    pub alignments: Vec<Alignment>,
    pub header: Vec<TableCell>,
    pub rows: Vec<Vec<TableCell>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HorizontalRule {
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HtmlBlock {
    pub span: Span,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Footnote {
    pub span: Span,
    pub id: String,
    pub blocks: Vec<Block>,
}
