//! # Inline Plugin Pipeline
//!
//! Plugins rewrite a paragraph after the inline pass, in place, through the
//! ledger primitives. Each one is registered with a priority; the registry
//! runs them in ascending priority order, one after the other, on every
//! paragraph.
//!
//! ## Built-in plugins
//!
//! | priority | plugin |
//! |---|---|
//! | 256 + n | [`ExtendedSyntaxPlugin`] for the n-th configured delimiter |
//! | 320 | [`NoteLinkPlugin`] |
//! | 321 | [`HeaderLinkPlugin`] |
//! | 322 | [`EmojiPlugin`] |
//! | 1024 | [`DataCleaner`] |
//!
//! ## Passes
//!
//! A parse runs the registry once for real and, when some plugin asks for
//! it, once before that while link references are being collected. A plugin only runs in the pass it declares
//! through [`InlinePlugin::reference_pass`]. Every built-in plugin belongs
//! to the render pass.

pub mod cleaner;
pub mod emoji;
pub mod extended_syntax;
pub mod header_link;
pub mod note_link;
pub mod note_path;

#[cfg(test)]
pub(crate) mod test_support;

use std::fmt;
use std::sync::Arc;

use log::{debug, trace, warn};

use crate::config::ParserConfig;
use crate::error::ParseResult;
use crate::parsing::ast::Paragraph;
use crate::parsing::rope::SourceText;

pub use cleaner::DataCleaner;
pub use emoji::EmojiPlugin;
pub use extended_syntax::ExtendedSyntaxPlugin;
pub use header_link::HeaderLinkPlugin;
pub use note_link::NoteLinkPlugin;
pub use note_path::{group_path, sanitize_note_path};

/// Where the paragraph handed to a plugin lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParagraphRole {
    #[default]
    Body,
    /// The text of a heading.
    HeadingText,
}

/// Read-only state shared by the plugins of one paragraph.
#[derive(Debug, Clone, Copy)]
pub struct PluginContext<'a> {
    pub source: &'a SourceText,
    pub config: &'a ParserConfig,
    pub role: ParagraphRole,
    /// Set during the reference-collection pass.
    pub collecting_references: bool,
}

/// A paragraph rewriting step.
pub trait InlinePlugin: Send + Sync {
    fn name(&self) -> &'static str;

    /// Lower runs first.
    fn priority(&self) -> i32;

    /// Whether the plugin belongs to the reference-collection pass instead
    /// of the render pass.
    fn reference_pass(&self) -> bool {
        false
    }

    /// Rewrites `para`.
    ///
    /// On return the ledger must match the items and every opening style
    /// marker must have its closing one.
    fn run(&self, para: &mut Paragraph, ctx: &PluginContext<'_>) -> ParseResult<()>;
}

/// Plugins ordered by priority.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn InlinePlugin>>,
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in plugins enabled by `config`.
    ///
    /// Extended syntaxes that are unusable or repeat an earlier delimiter
    /// are skipped with a warning.
    pub fn from_config(config: &ParserConfig) -> Self {
        let mut registry = Self::new();
        let mut seen: Vec<&str> = Vec::new();
        for (n, syntax) in config.extended_syntaxes.iter().enumerate() {
            if let Some(problem) = syntax.problem() {
                warn!("skipping extended syntax {:?}: {problem}", syntax.delimiter);
                continue;
            }
            if seen.contains(&syntax.delimiter.as_str()) {
                warn!("skipping extended syntax {:?}: delimiter repeated", syntax.delimiter);
                continue;
            }
            seen.push(&syntax.delimiter);
            registry.register(Arc::new(ExtendedSyntaxPlugin::new(syntax, n)));
        }
        if config.plugins.note_linking {
            registry.register(Arc::new(NoteLinkPlugin));
        }
        if config.plugins.header_linking {
            registry.register(Arc::new(HeaderLinkPlugin));
        }
        if config.plugins.emoji {
            registry.register(Arc::new(EmojiPlugin));
        }
        registry.register(Arc::new(DataCleaner));
        debug!("plugin order: {:?}", registry.names());
        registry
    }

    /// Adds a plugin, keeping registration order among equal priorities.
    pub fn register(&mut self, plugin: Arc<dyn InlinePlugin>) {
        let at = self.plugins.partition_point(|p| p.priority() <= plugin.priority());
        self.plugins.insert(at, plugin);
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Whether any plugin belongs to the reference-collection pass.
    pub fn has_reference_pass(&self) -> bool {
        self.plugins.iter().any(|p| p.reference_pass())
    }

    /// Runs every plugin of the current pass over `para`.
    pub fn run(&self, para: &mut Paragraph, ctx: &PluginContext<'_>) -> ParseResult<()> {
        for plugin in self.plugins.iter().filter(|p| p.reference_pass() == ctx.collecting_references) {
            trace!("running {} on paragraph at {:?}", plugin.name(), para.span);
            plugin.run(para, ctx)?;
        }
        Ok(())
    }
}
