//! # Parsing
//!
//! Source text to [`Document`] in four steps:
//!
//! 1. [`blocks`]: normalization and block segmentation into tokens
//! 2. [`inline`]: per-paragraph items and raw text ledger
//! 3. [`plugins`]: the priority-ordered rewriting pipeline
//! 4. [`poscache`]: optional reverse index for editor queries, built from
//!    the finished document
//!
//! [`Parser`] drives the first three. It owns a snapshot of the
//! configuration taken at construction, so later configuration changes
//! never reach a parse in flight.

pub mod ast;
pub mod blocks;
pub mod build;
pub mod delims;
pub mod inline;
pub mod ledger;
pub mod mapper;
pub mod plugins;
pub mod poscache;
pub mod rope;

#[cfg(test)]
mod tests;

use log::debug;

use crate::cancel::CancellationToken;
use crate::config::ParserConfig;
use crate::error::ParseResult;

use ast::Document;
use blocks::{Normalizer, Segmenter};
use build::TreeBuilder;
use mapper::{NoteMapper, extract_mappings};
use plugins::PluginRegistry;
use rope::SourceText;

/// Parses notes with one configuration.
#[derive(Debug, Clone)]
pub struct Parser {
    config: ParserConfig,
    registry: PluginRegistry,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

impl Parser {
    /// A parser running the built-in plugins enabled by `config`.
    pub fn new(config: ParserConfig) -> Self {
        let registry = PluginRegistry::from_config(&config);
        Self { config, registry }
    }

    /// A parser running exactly the plugins in `registry`.
    pub fn with_registry(config: ParserConfig, registry: PluginRegistry) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    pub fn parse(&self, text: &str) -> ParseResult<Document> {
        self.parse_with_cancel(text, &CancellationToken::new())
    }

    /// Parses `text`, stopping with [`ParseError::Cancelled`] once `cancel`
    /// is set.
    ///
    /// [`ParseError::Cancelled`]: crate::error::ParseError::Cancelled
    pub fn parse_with_cancel(&self, text: &str, cancel: &CancellationToken) -> ParseResult<Document> {
        let source = SourceText::new(text);
        let lines = Normalizer::source(&source);
        let mut segmenter = Segmenter::new(&source);
        let tokens = segmenter.segment_document(&lines)?;
        let references = segmenter.into_references();
        cancel.check()?;

        let mut builder = TreeBuilder {
            source: &source,
            config: &self.config,
            registry: &self.registry,
            references: &references,
            cancel,
            collecting_references: true,
        };
        if self.registry.has_reference_pass() {
            debug!("reference pass over {} blocks", tokens.len());
            builder.blocks(&tokens)?;
        }
        builder.collecting_references = false;
        let blocks = builder.blocks(&tokens)?;
        debug!("parsed {} lines into {} blocks", source.line_count(), blocks.len());

        Ok(Document { blocks, references })
    }

    /// Parses `text` and reports its note links and headings to `mapper`.
    pub fn parse_and_map(&self, text: &str, mapper: &mut dyn NoteMapper) -> ParseResult<Document> {
        let doc = self.parse(text)?;
        let (links, headings) = extract_mappings(&doc);
        mapper.map(links, headings);
        Ok(doc)
    }
}
