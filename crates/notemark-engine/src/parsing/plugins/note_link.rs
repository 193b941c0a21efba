use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::error::{ParseError, ParseResult};
use crate::parsing::ast::{HEADER_SEPARATOR, InlineItem, NoteLink, Paragraph, Styling};
use crate::parsing::rope::{Position, Span};

use super::{InlinePlugin, PluginContext, sanitize_note_path};

pub const PRIORITY: i32 = 320;

fn note_link_regex() -> &'static Regex {
    static NOTE_LINK: OnceLock<Regex> = OnceLock::new();
    NOTE_LINK.get_or_init(|| {
        Regex::new(r"\[\[ *([^:\]|\r\n]*)( *: *)?([^:\]|\r\n]*)( *\| *)?([^:\]|\r\n]*) *\]\]")
            .expect("Invalid note link regex")
    })
}

/// Turns `[[path:header|title]]` into [`NoteLink`] items.
///
/// Links whose path does not resolve stay plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoteLinkPlugin;

impl InlinePlugin for NoteLinkPlugin {
    fn name(&self) -> &'static str {
        "note-linking"
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
            slot = link_in_slot(para, slot, ctx)?;
        }
        Ok(())
    }
}

/// Replaces the first resolvable note link of ledger slot `slot`.
///
/// Returns the slot to look at next.
fn link_in_slot(para: &mut Paragraph, slot: usize, ctx: &PluginContext<'_>) -> ParseResult<usize> {
    let entry = &para.ledger[slot];
    let (src, base) = (entry.text.clone(), entry.pos);
    let mut offset = 0;
    while let Some(caps) = note_link_regex().captures_at(&src, offset) {
        let (start, end) = caps.get(0).map_or((offset, src.len()), |m| (m.start(), m.end()));
        let href = caps.get(1).map_or("", |m| m.as_str().trim());
        let own_path = ctx.config.note_path.trim_end_matches('/');
        let sanitized = if href.is_empty() {
            None
        } else if href == ctx.config.note_file_name && !own_path.is_empty() {
            Some(own_path.to_string())
        } else {
            sanitize_note_path(href, &ctx.config.note_path, &ctx.config.default_category)
        };
        let Some(path) = sanitized else {
            offset = end;
            continue;
        };

        let at = |off: usize| Position::new(base.line, base.column + off);
        let mut link = build_link(&caps, &path, href, at);
        link.self_reference = path == own_path;
        let idx = para
            .text_item_index(slot)
            .ok_or_else(|| ParseError::internal(base, "ledger slot without text item"))?;
        let span = Span::new(base.line, base.column + start, base.line, base.column + end - 1);
        let splice = para.splice_item(idx, span, InlineItem::NoteLink(link))?;
        return Ok(splice.resume_slot(slot));
    }
    Ok(slot + 1)
}

fn build_link(caps: &Captures<'_>, path: &str, href: &str, at: impl Fn(usize) -> Position) -> NoteLink {
    let group = |n: usize| caps.get(n).map_or("", |m| m.as_str());
    let whole = caps.get(0).map_or(0..0, |m| m.range());
    let href_start = caps.get(1).map_or(whole.start, |m| m.start());
    let header = group(3).trim();
    let title = group(5).trim();
    let has_pipe = caps.get(4).is_some();

    let url_end = if header.is_empty() {
        href_start + href.len()
    } else {
        caps.get(2).map_or(href_start + href.len(), |m| m.end()) + header.len()
    };
    let url_span = Span::from_len(at(href_start), url_end - href_start);
    let text_span = match caps.get(5) {
        Some(m) if has_pipe && !title.is_empty() => Span::from_len(at(m.start()), title.len()),
        _ => url_span,
    };
    let text = if has_pipe && !title.is_empty() {
        title.to_string()
    } else {
        path.rsplit('/').next().unwrap_or(path).to_string()
    };

    NoteLink {
        span: Span::from_len(at(whole.start), whole.len()),
        styling: Styling::default(),
        url: format!("{path}{HEADER_SEPARATOR}{header}"),
        url_span,
        text,
        text_span,
        self_reference: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;
    use crate::parsing::ast::{ItemWithOpts, TextOpts};
    use crate::parsing::plugins::test_support::{run_plugin, run_plugin_collecting};
    use pretty_assertions::assert_eq;

    fn config() -> ParserConfig {
        ParserConfig::default().with_note_path("/home/dummy/")
    }

    fn link(p: &Paragraph) -> &NoteLink {
        p.items
            .iter()
            .find_map(|i| match i {
                InlineItem::NoteLink(l) => Some(l),
                _ => None,
            })
            .expect("note link")
    }

    #[test]
    fn link_without_text_uses_note_name() {
        let p = run_plugin(&NoteLinkPlugin, "My [[/link]] with no specific text", &config());
        let kinds: Vec<_> = p.items.iter().map(|i| (i.kind_name(), i.span())).collect();
        assert_eq!(
            kinds,
            vec![
                ("text", Span::on_line(0, 0, 2)),
                ("note-link", Span::on_line(0, 3, 11)),
                ("text", Span::on_line(0, 12, 33)),
            ]
        );
        let l = link(&p);
        assert_eq!(l.url, "/home/link@HEADER@");
        assert_eq!(l.text, "link");
        assert_eq!(l.url_span, Span::on_line(0, 5, 9));
    }

    #[test]
    fn header_and_title() {
        let p = run_plugin(&NoteLinkPlugin, "[[Work/todo : Monday | this week]]", &config());
        assert_eq!(p.items.len(), 1);
        let l = link(&p);
        assert_eq!(l.url, "/Work/.BaseGroup/todo@HEADER@Monday");
        assert_eq!(l.text, "this week");
        assert_eq!(l.target(), ("/Work/.BaseGroup/todo", "Monday"));
        assert_eq!(l.url_span, Span::on_line(0, 2, 19));
        assert_eq!(l.text_span, Span::on_line(0, 23, 31));
        assert!(p.ledger.is_empty());
    }

    #[test]
    fn invalid_paths_stay_text() {
        for md in ["see [[]] here", "see [[a//b]] here", "see [[.hidden]] here"] {
            let p = run_plugin(&NoteLinkPlugin, md, &config());
            assert_eq!(p.items.len(), 1, "{md}");
            assert!(p.items[0].is_text());
        }
    }

    #[test]
    fn several_links_and_styles() {
        let p = run_plugin(&NoteLinkPlugin, "*[[a]] and [[b]]*", &config());
        let kinds: Vec<_> = p.items.iter().map(|i| (i.kind_name(), i.opts())).collect();
        assert_eq!(
            kinds,
            vec![
                ("note-link", TextOpts::ITALIC),
                ("text", TextOpts::ITALIC),
                ("note-link", TextOpts::ITALIC)
            ]
        );
        assert_eq!(p.items[0].open_styles().len(), 1);
        assert_eq!(p.items[2].close_styles().len(), 1);
    }

    #[test]
    fn links_back_to_the_note_are_flagged() {
        let config = config().with_note_file_name("dummy.md");
        for md in ["[[dummy]]", "[[dummy.md:Intro]]", "[[./dummy|here]]"] {
            let p = run_plugin(&NoteLinkPlugin, md, &config);
            let l = link(&p);
            assert!(l.self_reference, "{md}");
            assert_eq!(l.target().0, "/home/dummy", "{md}");
        }
        let p = run_plugin(&NoteLinkPlugin, "[[other]] [[note.md]]", &config);
        let flags: Vec<_> = p
            .items
            .iter()
            .filter_map(|i| match i {
                InlineItem::NoteLink(l) => Some((l.url.as_str(), l.self_reference)),
                _ => None,
            })
            .collect();
        assert_eq!(flags, vec![("/home/other@HEADER@", false), ("/home/note.md@HEADER@", false)]);
    }

    #[test]
    fn reference_pass_is_a_no_op() {
        let p = run_plugin_collecting(&NoteLinkPlugin, "[[a]]", &config());
        assert!(p.items[0].is_text());
    }
}
