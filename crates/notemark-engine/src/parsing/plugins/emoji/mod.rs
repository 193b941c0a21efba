//! `:name:` and `:name:qualifier:` shortcodes.
//!
//! The qualifier is a skin tone label, a variant (`blond hair`), or both
//! separated by a comma. Without a tone in the qualifier the configured
//! tone applies. Shortcodes that resolve to nothing stay text.

mod table;

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::EmojiTone;
use crate::error::{ParseError, ParseResult};
use crate::parsing::ast::{Emoji, InlineItem, Paragraph, Styling};
use crate::parsing::rope::{Position, Span};

use super::{InlinePlugin, PluginContext};

pub use table::{EmojiEntry, EmojiTable};

pub const PRIORITY: i32 = 322;

fn emoji_regex() -> &'static Regex {
    static EMOJI: OnceLock<Regex> = OnceLock::new();
    EMOJI.get_or_init(|| Regex::new(r":([^:]*)(:?)([^:]*):").expect("Invalid emoji regex"))
}

/// A resolved shortcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<'t> {
    pub entry: &'t EmojiEntry,
    /// Whether the qualifier was used and belongs to the emoji.
    pub qualified: bool,
}

/// Looks `name` up with the raw `qualifier` text and the configured tone.
pub fn resolve<'t>(table: &'t EmojiTable, name: &str, qualifier: &str, configured: EmojiTone) -> Option<Resolution<'t>> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let mut options = qualifier.split(',').map(str::trim);
    let mut tone = configured;
    let mut tone_given = false;
    let mut variant = String::new();
    if let Some(first) = options.next().filter(|o| !o.is_empty()) {
        match EmojiTone::from_label(first) {
            Some(t) => {
                tone = t;
                tone_given = true;
            }
            None => variant = first.to_lowercase(),
        }
    }
    if let Some(second) = options.next() {
        variant = second.to_lowercase();
    }
    let default_tone = tone == EmojiTone::Default;

    if !default_tone {
        let marker = format!(" {}", tone.label());
        let candidates: Vec<&EmojiEntry> = table
            .tones(name)
            .into_iter()
            .filter(|e| e.short_name.contains(&marker))
            .collect();
        let by_variant = (!variant.is_empty())
            .then(|| candidates.iter().copied().find(|e| e.short_name.ends_with(&variant)))
            .flatten();
        if let Some(entry) = by_variant {
            return Some(Resolution { entry, qualified: true });
        }
        if let Some(&entry) = candidates.first() {
            return Some(Resolution {
                entry,
                qualified: tone_given,
            });
        }
    } else {
        let term = if variant.is_empty() {
            name.to_string()
        } else {
            format!("{name}: {variant}")
        };
        if let Some(entry) = table.exact(&term) {
            return Some(Resolution {
                entry,
                qualified: !variant.is_empty() || tone_given,
            });
        }
    }

    table.exact(name).map(|entry| Resolution {
        entry,
        qualified: tone_given && default_tone,
    })
}

/// Replaces emoji shortcodes with [`Emoji`] items.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmojiPlugin;

impl InlinePlugin for EmojiPlugin {
    fn name(&self) -> &'static str {
        "emoji"
    }

    fn priority(&self) -> i32 {
        PRIORITY
    }

    fn run(&self, para: &mut Paragraph, ctx: &PluginContext<'_>) -> ParseResult<()> {
        if ctx.collecting_references {
            return Ok(());
        }
        let mut slot = 0;
        while slot < para.ledger.len() {
            slot = emoji_in_slot(para, slot, ctx)?;
        }
        Ok(())
    }
}

/// Replaces the first resolvable shortcode of ledger slot `slot`.
///
/// Returns the slot to look at next.
fn emoji_in_slot(para: &mut Paragraph, slot: usize, ctx: &PluginContext<'_>) -> ParseResult<usize> {
    let entry = &para.ledger[slot];
    let (src, base) = (entry.text.clone(), entry.pos);
    let at = |off: usize| Position::new(base.line, base.column + off);
    let table = EmojiTable::global();

    let mut offset = 0;
    while let Some(caps) = emoji_regex().captures_at(&src, offset) {
        let whole = caps.get(0).map_or(offset..src.len(), |m| m.range());
        let name = caps.get(1).map_or(whole.start + 1..whole.start + 1, |m| m.range());
        let qualifier = caps.get(3).map_or(name.end..name.end, |m| m.range());

        if src[name.clone()].starts_with(char::is_whitespace) {
            offset = whole.start + 1;
            continue;
        }
        if ctx.source.char_before(at(whole.start)) == Some('\\') {
            offset = whole.start + 1;
            continue;
        }
        let Some(found) = resolve(table, &src[name.clone()], &src[qualifier.clone()], ctx.config.emoji_tone) else {
            offset = name.end;
            continue;
        };

        let end = if found.qualified { whole.end } else { name.end + 1 };
        let span_of = |r: &Range<usize>| Span::from_len(at(r.start), r.len());
        let name_span = span_of(&name);
        let options_span = if found.qualified && !qualifier.is_empty() {
            span_of(&qualifier)
        } else {
            name_span
        };
        let span = span_of(&(whole.start..end));
        let emoji = Emoji {
            span,
            styling: Styling::default(),
            unicode: found.entry.unicode.clone(),
            name_span,
            options_span,
        };
        let idx = para
            .text_item_index(slot)
            .ok_or_else(|| ParseError::internal(base, "ledger slot without text item"))?;
        let splice = para.splice_item(idx, span, InlineItem::Emoji(emoji))?;
        return Ok(splice.resume_slot(slot));
    }
    Ok(slot + 1)
}
