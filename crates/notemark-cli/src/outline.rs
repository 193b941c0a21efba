//! Plain-text dumps of a parsed note.

use notemark_engine::parsing::ast::{Block, InlineItem, ItemWithOpts, Paragraph};
use notemark_engine::{DelimType, DelimsInfo, LinkedNote, Span};

pub fn span(sp: Span) -> String {
    format!("{}:{}-{}:{}", sp.start_line, sp.start_column, sp.end_line, sp.end_column)
}

/// One line per block and inline item, indented by nesting depth.
pub fn document_lines(blocks: &[Block]) -> Vec<String> {
    let mut out = Vec::new();
    for block in blocks {
        block_lines(block, 0, &mut out);
    }
    out
}

fn block_lines(block: &Block, depth: usize, out: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    let at = span(block.span());
    match block {
        Block::Heading(h) => {
            out.push(format!("{indent}heading {} [{at}]", h.level));
            paragraph_lines(&h.text, depth + 1, out);
        }
        Block::Paragraph(p) => {
            out.push(format!("{indent}paragraph [{at}]"));
            paragraph_lines(p, depth + 1, out);
        }
        Block::List(l) => {
            let kind = if l.ordered { "ordered list" } else { "list" };
            out.push(format!("{indent}{kind} [{at}]"));
            for item in &l.items {
                out.push(format!("{indent}  item [{}]", span(item.span)));
                for child in &item.blocks {
                    block_lines(child, depth + 2, out);
                }
            }
        }
        Block::BlockQuote(q) => {
            out.push(format!("{indent}quote [{at}]"));
            for child in &q.blocks {
                block_lines(child, depth + 1, out);
            }
        }
        Block::CodeBlock(c) => {
            out.push(format!("{indent}code {:?} [{at}]", c.language().unwrap_or_default()));
            for line in c.plain_text().lines() {
                out.push(format!("{indent}  | {line}"));
            }
        }
        Block::Table(t) => {
            out.push(format!("{indent}table {} columns [{at}]", t.alignments.len()));
            for cell in t.header.iter().chain(t.rows.iter().flatten()) {
                out.push(format!("{indent}  cell [{}]", span(cell.span)));
                paragraph_lines(&cell.content, depth + 2, out);
            }
        }
        Block::HorizontalRule(_) => out.push(format!("{indent}rule [{at}]")),
        Block::RawHtml(h) => out.push(format!("{indent}html {:?} [{at}]", h.html)),
        Block::Footnote(f) => {
            out.push(format!("{indent}footnote {:?} [{at}]", f.id));
            for child in &f.blocks {
                block_lines(child, depth + 1, out);
            }
        }
    }
}

fn paragraph_lines(para: &Paragraph, depth: usize, out: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    for item in &para.items {
        let label = match item {
            InlineItem::Text(t) => format!("{:?}", t.text),
            InlineItem::Link(l) => format!("{:?} -> {}", l.text, l.url),
            InlineItem::Image(i) => format!("{:?} -> {}", i.alt, i.url),
            InlineItem::Code(c) => format!("{:?}", c.plain_text()),
            InlineItem::Emoji(e) => e.unicode.clone(),
            InlineItem::NoteLink(n) if n.self_reference => format!("{:?} -> {} (self)", n.text, n.url),
            InlineItem::NoteLink(n) => format!("{:?} -> {}", n.text, n.url),
            InlineItem::HeaderAnchor(h) => format!("{:?} level {}", h.text, h.level),
            InlineItem::LineBreak(_) => String::new(),
            InlineItem::RawHtml(h) => format!("{:?}", h.html),
        };
        let opts = item.opts();
        let styled = if opts.is_empty() { String::new() } else { format!(" opts={}", opts.bits()) };
        out.push(format!("{indent}{} {label} [{}]{styled}", item.kind_name(), span(item.span())));
    }
}

pub fn mapping_lines(links: &[LinkedNote], headings: &[String]) -> Vec<String> {
    let links = links.iter().map(|l| {
        if l.header.is_empty() {
            format!("link {} ({:?})", l.path, l.title)
        } else {
            format!("link {}#{} ({:?})", l.path, l.header, l.title)
        }
    });
    let headings = headings.iter().map(|h| format!("heading {h:?}"));
    links.chain(headings).collect()
}

pub fn delim_lines(delims: &[DelimsInfo]) -> Vec<String> {
    delims
        .iter()
        .map(|d| {
            let kind = match d.delim_type {
                DelimType::Plain => "plain".to_string(),
                DelimType::Style(opts) => format!("style {}", opts.bits()),
                DelimType::Block(b) => format!("{b:?}"),
            };
            let close = d.close.map(|c| format!(" .. [{}]", span(c))).unwrap_or_default();
            format!("{kind} [{}]{close} heading level {}", span(d.open), d.heading_level)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use notemark_engine::{Parser, PosCache, Position};
    use pretty_assertions::assert_eq;

    #[test]
    fn outlines_nested_blocks() {
        let doc = Parser::default().parse("# Hi\n\n> text\n").unwrap();
        let lines = document_lines(&doc.blocks);
        let kinds: Vec<&str> = lines.iter().map(|l| l.split(" [").next().unwrap_or_default()).collect();
        assert_eq!(
            kinds,
            vec!["heading 1", "  text \"Hi\"", "quote", "  paragraph", "    text \"text\""]
        );
    }

    #[test]
    fn describes_delimiters() {
        let doc = Parser::default().parse("a **b** c").unwrap();
        let delims = PosCache::build(&doc).delims_surrounding(Position::new(0, 4), None);
        assert_eq!(delim_lines(&delims), vec!["style 1 [0:2-0:3] .. [0:5-0:6] heading level 0"]);
    }

    #[test]
    fn lists_mappings() {
        let links = vec![LinkedNote {
            path: "/a".into(),
            header: "Top".into(),
            title: "A".into(),
        }];
        assert_eq!(
            mapping_lines(&links, &["Intro".to_string()]),
            vec!["link /a#Top (\"A\")", "heading \"Intro\""]
        );
    }
}
