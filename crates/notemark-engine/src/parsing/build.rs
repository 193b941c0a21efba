use std::collections::BTreeMap;

use log::trace;

use crate::cancel::CancellationToken;
use crate::config::ParserConfig;
use crate::error::ParseResult;
use crate::parsing::ast::{
    Block, BlockQuote, CodeBlock, Footnote, Heading, HorizontalRule, HtmlBlock, LinkReference, List,
    ListItem, Paragraph, Table, TableCell,
};
use crate::parsing::blocks::{CellToken, InlineSource, ItemToken, Token};
use crate::parsing::inline::parse_inline;
use crate::parsing::plugins::{ParagraphRole, PluginContext, PluginRegistry};
use crate::parsing::rope::SourceText;

/// Turns block tokens into blocks, running inline parsing and the plugin
/// pipeline on every inline-bearing block.
pub struct TreeBuilder<'a> {
    pub source: &'a SourceText,
    pub config: &'a ParserConfig,
    pub registry: &'a PluginRegistry,
    pub references: &'a BTreeMap<String, LinkReference>,
    pub cancel: &'a CancellationToken,
    pub collecting_references: bool,
}

impl TreeBuilder<'_> {
    pub fn blocks(&self, tokens: &[Token]) -> ParseResult<Vec<Block>> {
        let mut out = Vec::with_capacity(tokens.len());
        for token in tokens {
            self.cancel.check()?;
            out.push(self.block(token)?);
        }
        Ok(out)
    }

    fn block(&self, token: &Token) -> ParseResult<Block> {
        let block = match token {
            Token::Heading {
                span,
                level,
                delim,
                content,
                label,
            } => Block::Heading(Heading {
                span: *span,
                level: *level,
                text: self.paragraph(content, ParagraphRole::HeadingText)?,
                delim: *delim,
                label_span: label.as_ref().map(|(s, _)| *s),
                label: label.as_ref().map(|(_, l)| l.clone()),
            }),
            Token::Paragraph { content, .. } => Block::Paragraph(self.paragraph(content, ParagraphRole::Body)?),
            Token::Code {
                span,
                fenced,
                info,
                text,
                start_delim,
                end_delim,
            } => Block::CodeBlock(CodeBlock {
                span: *span,
                fenced: *fenced,
                info: info.clone(),
                text: text.clone(),
                start_delim: *start_delim,
                end_delim: *end_delim,
            }),
            Token::BlockQuote { span, delims, children } => Block::BlockQuote(BlockQuote {
                span: *span,
                delims: delims.clone(),
                blocks: self.blocks(children)?,
            }),
            Token::List {
                span,
                ordered,
                start_number,
                loose,
                items,
            } => Block::List(List {
                span: *span,
                ordered: *ordered,
                start_number: *start_number,
                loose: *loose,
                items: items.iter().map(|i| self.list_item(i)).collect::<ParseResult<_>>()?,
            }),
            Token::Table {
                span,
                alignments,
                header,
                rows,
            } => Block::Table(Table {
                span: *span,
                alignments: alignments.clone(),
                header: self.cells(header)?,
                rows: rows.iter().map(|r| self.cells(r)).collect::<ParseResult<_>>()?,
            }),
            Token::Rule { span } => Block::HorizontalRule(HorizontalRule { span: *span }),
            Token::Html { span, html } => Block::RawHtml(HtmlBlock {
                span: *span,
                html: html.clone(),
            }),
            Token::Footnote { span, id, children } => Block::Footnote(Footnote {
                span: *span,
                id: id.clone(),
                blocks: self.blocks(children)?,
            }),
        };
        Ok(block)
    }

    fn list_item(&self, item: &ItemToken) -> ParseResult<ListItem> {
        Ok(ListItem {
            span: item.span,
            delim: item.delim,
            number: item.number,
            task: item.task,
            blocks: self.blocks(&item.children)?,
        })
    }

    fn cells(&self, cells: &[CellToken]) -> ParseResult<Vec<TableCell>> {
        cells
            .iter()
            .map(|c| {
                Ok(TableCell {
                    span: c.span,
                    content: self.paragraph(&c.content, ParagraphRole::Body)?,
                })
            })
            .collect()
    }

    /// Inline pass plus plugins for one paragraph.
    pub fn paragraph(&self, content: &InlineSource, role: ParagraphRole) -> ParseResult<Paragraph> {
        self.cancel.check()?;
        let mut para = parse_inline(content, self.references);
        let ctx = PluginContext {
            source: self.source,
            config: self.config,
            role,
            collecting_references: self.collecting_references,
        };
        self.registry.run(&mut para, &ctx)?;
        para.check_ledger(Some(self.source))?;
        trace!("paragraph at {:?} has {} items", para.span, para.items.len());
        Ok(para)
    }
}
