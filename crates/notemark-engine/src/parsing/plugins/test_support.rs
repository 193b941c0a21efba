use std::collections::BTreeMap;

use crate::config::ParserConfig;
use crate::parsing::ast::Paragraph;
use crate::parsing::blocks::{ContentLine, InlineSource};
use crate::parsing::inline::parse_inline;
use crate::parsing::rope::SourceText;

use super::{InlinePlugin, ParagraphRole, PluginContext};

/// Inline-parses `md` as one paragraph line.
pub fn paragraph(md: &str) -> Paragraph {
    let inline = InlineSource::new(vec![ContentLine {
        line: 0,
        column: 0,
        text: md.into(),
    }]);
    parse_inline(&inline, &BTreeMap::new())
}

fn run(plugin: &dyn InlinePlugin, md: &str, config: &ParserConfig, collecting_references: bool) -> Paragraph {
    let source = SourceText::new(md);
    let mut para = paragraph(md);
    let ctx = PluginContext {
        source: &source,
        config,
        role: ParagraphRole::Body,
        collecting_references,
    };
    plugin.run(&mut para, &ctx).unwrap();
    para.check_ledger(Some(&source)).unwrap();
    para
}

pub fn run_plugin(plugin: &dyn InlinePlugin, md: &str, config: &ParserConfig) -> Paragraph {
    run(plugin, md, config, false)
}

pub fn run_plugin_collecting(plugin: &dyn InlinePlugin, md: &str, config: &ParserConfig) -> Paragraph {
    run(plugin, md, config, true)
}
