use std::sync::OnceLock;

use regex::Regex;

use crate::error::ParseResult;
use crate::parsing::ast::{HeaderAnchor, InlineItem, ItemWithOpts, Paragraph};
use crate::parsing::rope::Span;

use super::{InlinePlugin, ParagraphRole, PluginContext};

pub const PRIORITY: i32 = 321;

/// Deepest heading level an anchor can name.
pub const MAX_LEVEL: u8 = 6;

fn anchor_regex() -> &'static Regex {
    static ANCHOR: OnceLock<Regex> = OnceLock::new();
    ANCHOR.get_or_init(|| Regex::new(r"^([0-9]+)# (.*)").expect("Invalid header anchor regex"))
}

/// Turns a heading text written `N# text` into a [`HeaderAnchor`].
///
/// Only a heading whose text is one plain text item qualifies.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderLinkPlugin;

impl InlinePlugin for HeaderLinkPlugin {
    fn name(&self) -> &'static str {
        "header-linking"
    }

    fn priority(&self) -> i32 {
        PRIORITY
    }

    fn run(&self, para: &mut Paragraph, ctx: &PluginContext<'_>) -> ParseResult<()> {
        if ctx.collecting_references || ctx.role != ParagraphRole::HeadingText {
            return Ok(());
        }
        let [InlineItem::Text(text)] = para.items.as_slice() else {
            return Ok(());
        };
        let Some(entry) = para.ledger.first() else {
            return Ok(());
        };
        if para.ledger.len() != 1 || text.span.start() != para.span.start() {
            return Ok(());
        }
        let Some(caps) = anchor_regex().captures(&entry.text) else {
            return Ok(());
        };
        let (Some(digits), Some(rest)) = (caps.get(1), caps.get(2)) else {
            return Ok(());
        };

        let span = text.span;
        let delim_end = span.start_column + rest.start() - 1;
        let anchor = HeaderAnchor {
            span,
            styling: text.styling().clone(),
            level: anchor_level(digits.as_str()),
            delim_span: Span::on_line(span.start_line, span.start_column, delim_end),
            text: rest.as_str().trim().to_string(),
            text_span: Span::new(span.start_line, delim_end + 1, span.end_line, span.end_column),
        };
        para.replace_item(0, InlineItem::HeaderAnchor(anchor))
    }
}

/// Level named by a digit run: `0` means 1, anything past 6 means 6.
fn anchor_level(digits: &str) -> u8 {
    match digits.parse::<u32>() {
        Ok(0) => 1,
        Ok(n) => u8::try_from(n).unwrap_or(MAX_LEVEL).min(MAX_LEVEL),
        Err(_) => MAX_LEVEL,
    }
}
