use std::collections::BTreeMap;

use log::{debug, trace};

use crate::error::{ParseError, ParseResult};
use crate::parsing::ast::LinkReference;
use crate::parsing::rope::{Position, SourceText, Span};

use super::{
    content::{ContentLine, InlineSource},
    kinds::{
        AtxOpen, BlockQuote, CodeFence, FenceOpen, Heading, HtmlBlock, IndentedCode, LinkRef, List,
        ListMarker, SetextUnderline, Table, ThematicBreak,
    },
    normalize::{NormalizedLine, WorkLine},
    types::{CellToken, ItemToken, Token},
};

/// Deepest container nesting accepted before giving up on a note.
pub const MAX_NESTING: usize = 64;

/// Splits normalized lines into block tokens.
///
/// Blocks are tried in a fixed priority order against the remaining lines;
/// the first match consumes its lines. Lists and blockquotes strip their
/// prefixes and run the same loop on their bodies.
pub struct Segmenter<'s> {
    source: &'s SourceText,
    references: BTreeMap<String, LinkReference>,
}

impl<'s> Segmenter<'s> {
    pub fn new(source: &'s SourceText) -> Self {
        Self {
            source,
            references: BTreeMap::new(),
        }
    }

    /// Link reference definitions collected so far.
    pub fn into_references(self) -> BTreeMap<String, LinkReference> {
        self.references
    }

    pub fn segment_document(&mut self, lines: &[NormalizedLine]) -> ParseResult<Vec<Token>> {
        let work: Vec<WorkLine<'_>> = lines.iter().map(WorkLine::new).collect();
        let tokens = self.segment(&work, 0)?;
        debug!(
            "segmented {} lines into {} blocks, {} link references",
            lines.len(),
            tokens.len(),
            self.references.len()
        );
        Ok(tokens)
    }

    fn segment(&mut self, lines: &[WorkLine<'_>], depth: usize) -> ParseResult<Vec<Token>> {
        if depth > MAX_NESTING {
            let line = lines.first().map_or(0, WorkLine::number);
            return Err(ParseError::NestingTooDeep { line, depth });
        }
        let mut out = Vec::new();
        let mut i = 0;
        while i < lines.len() {
            let consumed = self.next_block(lines, i, depth, &mut out)?;
            if consumed == 0 {
                let l = &lines[i];
                return Err(ParseError::internal(
                    Position::new(l.number(), l.virgin(0)),
                    "block pattern consumed nothing",
                ));
            }
            i += consumed;
        }
        Ok(out)
    }

    /// Matches one block at `lines[i]` and returns how many lines it used.
    fn next_block(
        &mut self,
        lines: &[WorkLine<'_>],
        i: usize,
        depth: usize,
        out: &mut Vec<Token>,
    ) -> ParseResult<usize> {
        let line = lines[i];
        let text = line.text();

        if line.is_blank() {
            return Ok(lines[i..].iter().take_while(|l| l.is_blank()).count());
        }
        if IndentedCode::starts(text) {
            return Ok(self.indented_code(lines, i, out));
        }
        if let Some(open) = CodeFence::open(text) {
            return Ok(self.fenced_code(lines, i, &open, out));
        }
        if let Some(open) = Heading::open(text) {
            out.push(self.atx_heading(&line, &open));
            return Ok(1);
        }
        if let Some(n) = self.table(lines, i, out) {
            return Ok(n);
        }
        if ThematicBreak::matches(text) {
            out.push(Token::Rule {
                span: self.block_span(&line, 0, &line),
            });
            return Ok(1);
        }
        if BlockQuote::strip_one(text).is_some() {
            return self.block_quote(lines, i, depth, out);
        }
        if let Some(marker) = List::marker(text) {
            return self.list(lines, i, marker, depth, out);
        }
        if HtmlBlock::opens(text) {
            return Ok(self.html(lines, i, out));
        }
        if depth == 0
            && let Some(n) = self.definition(lines, i, depth, out)?
        {
            return Ok(n);
        }
        if let Some(n) = self.paragraph(lines, i, out) {
            return Ok(n);
        }
        Err(ParseError::internal(
            Position::new(line.number(), line.virgin(0)),
            "no block pattern matched",
        ))
    }

    fn visible(&self, line: &WorkLine<'_>, from: usize) -> ContentLine {
        ContentLine::from_work(self.source, line, from, line.text().len())
    }

    fn block_span(&self, first: &WorkLine<'_>, from: usize, last: &WorkLine<'_>) -> Span {
        let a = self.visible(first, from);
        let b = self.visible(last, 0);
        let end = if a.line == b.line {
            b.last_column().max(a.column)
        } else {
            b.last_column()
        };
        Span::new(a.line, a.column, b.line, end)
    }

    fn run_span(line: &WorkLine<'_>, from: usize, len: usize) -> Span {
        Span::on_line(line.number(), line.virgin(from), line.virgin(from + len.max(1) - 1))
    }

    fn indented_code(&self, lines: &[WorkLine<'_>], i: usize, out: &mut Vec<Token>) -> usize {
        let mut last = i;
        for (j, l) in lines.iter().enumerate().skip(i) {
            if l.is_blank() {
                continue;
            }
            if l.indent() < IndentedCode::INDENT {
                break;
            }
            last = j;
        }
        let text = lines[i..=last]
            .iter()
            .map(|l| l.dedent(IndentedCode::INDENT).text())
            .collect::<Vec<_>>()
            .join("\n");
        trace!("indented code at line {}", lines[i].number());
        out.push(Token::Code {
            span: self.block_span(&lines[i], 0, &lines[last]),
            fenced: false,
            info: String::new(),
            text,
            start_delim: None,
            end_delim: None,
        });
        last + 1 - i
    }

    fn fenced_code(&self, lines: &[WorkLine<'_>], i: usize, open: &FenceOpen, out: &mut Vec<Token>) -> usize {
        let first = lines[i];
        let start_delim = Self::run_span(&first, open.indent, open.len);
        let mut body = Vec::new();
        let mut end_delim = None;
        let mut j = i + 1;
        while j < lines.len() {
            let l = lines[j];
            j += 1;
            if let Some((off, len)) = CodeFence::closes(open, l.text()) {
                end_delim = Some(Self::run_span(&l, off, len));
                break;
            }
            body.push(l.dedent(open.indent).text());
        }
        let end = match end_delim {
            Some(d) => d.end(),
            None if j > i + 1 => {
                let last = self.visible(&lines[j - 1], 0);
                Position::new(last.line, last.last_column())
            }
            None => start_delim.end(),
        };
        let end = end.max(start_delim.end());
        trace!("fenced code at line {} ({} lines)", first.number(), body.len());
        out.push(Token::Code {
            span: Span::new(start_delim.start_line, start_delim.start_column, end.line, end.column),
            fenced: true,
            info: open.info.clone(),
            text: body.join("\n"),
            start_delim: Some(start_delim),
            end_delim,
        });
        j - i
    }

    fn atx_heading(&self, line: &WorkLine<'_>, open: &AtxOpen) -> Token {
        let n = line.number();
        let delim = Self::run_span(line, open.delim_start, open.level as usize);
        let mut lines = Vec::new();
        if open.content_end > open.content_start {
            lines.push(ContentLine::from_work(self.source, line, open.content_start, open.content_end));
        }
        let label = open.label.as_ref().map(|(from, to, name)| {
            (Span::on_line(n, line.virgin(*from), line.virgin(*to)), name.clone())
        });
        Token::Heading {
            span: self.block_span(line, open.delim_start, line),
            level: open.level,
            delim: Some(delim),
            content: InlineSource::new(lines),
            label,
        }
    }

    fn table(&self, lines: &[WorkLine<'_>], i: usize, out: &mut Vec<Token>) -> Option<usize> {
        let head = lines[i];
        let sep = lines.get(i + 1)?;
        if !Table::is_row(head.text()) {
            return None;
        }
        let alignments = Table::separator(sep.text())?;
        let header_ranges = Table::cells(head.text());
        if header_ranges.len() != alignments.len() {
            return None;
        }
        let header = self.cells(&head, &header_ranges);
        let mut rows = Vec::new();
        let mut j = i + 2;
        while let Some(l) = lines.get(j).filter(|l| Table::is_row(l.text())) {
            rows.push(self.cells(l, &Table::cells(l.text())));
            j += 1;
        }
        trace!("table at line {} with {} rows", head.number(), rows.len());
        out.push(Token::Table {
            span: self.block_span(&head, 0, &lines[j - 1]),
            alignments,
            header,
            rows,
        });
        Some(j - i)
    }

    fn cells(&self, line: &WorkLine<'_>, ranges: &[(usize, usize)]) -> Vec<CellToken> {
        ranges
            .iter()
            .map(|&(from, to)| {
                if to > from {
                    let cl = ContentLine::from_work(self.source, line, from, to);
                    CellToken {
                        span: Span::on_line(cl.line, cl.column, cl.last_column()),
                        content: InlineSource::new(vec![cl]),
                    }
                } else {
                    let col = line.virgin(from);
                    CellToken {
                        span: Span::on_line(line.number(), col, col),
                        content: InlineSource::default(),
                    }
                }
            })
            .collect()
    }

    fn block_quote(
        &mut self,
        lines: &[WorkLine<'_>],
        i: usize,
        depth: usize,
        out: &mut Vec<Token>,
    ) -> ParseResult<usize> {
        let mut body: Vec<WorkLine<'_>> = Vec::new();
        let mut delims = Vec::new();
        let mut last = i;
        for (j, l) in lines.iter().enumerate().skip(i) {
            if let Some((marker, content)) = BlockQuote::strip_one(l.text()) {
                delims.push(Self::run_span(l, marker, 1));
                body.push(l.advance(content));
            } else if !l.is_blank()
                && body.last().is_some_and(|b| !b.is_blank())
                && !interrupts_paragraph(l.text())
            {
                // Lazy continuation of a quoted paragraph.
                body.push(*l);
            } else {
                break;
            }
            last = j;
        }
        let children = self.segment(&body, depth + 1)?;
        let first = delims.first().copied().unwrap_or_default();
        let end = self.visible(&lines[last], 0);
        out.push(Token::BlockQuote {
            span: Span::new(first.start_line, first.start_column, end.line, end.last_column().max(first.end_column)),
            delims,
            children,
        });
        Ok(last + 1 - i)
    }

    fn list(
        &mut self,
        lines: &[WorkLine<'_>],
        i: usize,
        first: ListMarker,
        depth: usize,
        out: &mut Vec<Token>,
    ) -> ParseResult<usize> {
        let mut items = Vec::new();
        let mut loose = false;
        let mut marker = first.clone();
        let mut j = i;

        let list_last = loop {
            let start = j;
            let content_indent = marker.content_offset;
            let head = lines[start];
            let mut body = vec![head.advance(content_indent.min(head.text().len()))];
            let mut last = start;
            j += 1;
            while let Some(l) = lines.get(j) {
                if l.is_blank() {
                    body.push(*l);
                } else if l.indent() >= content_indent {
                    body.push(l.dedent(content_indent));
                    last = j;
                } else if !lines[j - 1].is_blank()
                    && !interrupts_paragraph(l.text())
                    && List::marker(l.text()).is_none()
                {
                    body.push(*l);
                    last = j;
                } else {
                    break;
                }
                j += 1;
            }
            body.truncate(last - start + 1);
            if body.iter().skip(1).any(WorkLine::is_blank) {
                loose = true;
            }

            let mut task = None;
            if let Some((checked, len)) = List::task(body[0].text()) {
                task = Some(checked);
                body[0] = body[0].advance(len);
            }
            let children = self.segment(&body, depth + 1)?;
            let delim = Self::run_span(&head, marker.indent, marker.marker_len);
            let end = self.visible(&lines[last], 0);
            items.push(ItemToken {
                span: Span::new(delim.start_line, delim.start_column, end.line, end.last_column().max(delim.end_column)),
                delim,
                number: marker.number,
                task,
                children,
            });

            // Blank lines stay unconsumed when the list ends here.
            let next = lines[last + 1..].iter().position(|l| !l.is_blank()).map(|k| last + 1 + k);
            let Some(next) = next else { break last };
            let l = lines[next];
            if ThematicBreak::matches(l.text()) {
                break last;
            }
            match List::marker(l.text()) {
                Some(m) if m.same_list(&first) => {
                    if next > last + 1 {
                        loose = true;
                    }
                    marker = m;
                    j = next;
                }
                _ => break last,
            }
        };

        let span = match (items.first(), items.last()) {
            (Some(a), Some(b)) => Span::new(a.span.start_line, a.span.start_column, b.span.end_line, b.span.end_column),
            _ => Span::default(),
        };
        trace!("list at line {} with {} items", lines[i].number(), items.len());
        out.push(Token::List {
            span,
            ordered: first.ordered,
            start_number: first.number.unwrap_or(1),
            loose,
            items,
        });
        Ok(list_last + 1 - i)
    }

    fn html(&self, lines: &[WorkLine<'_>], i: usize, out: &mut Vec<Token>) -> usize {
        let count = lines[i..].iter().take_while(|l| !l.is_blank()).count();
        let last = i + count - 1;
        let html = lines[i..=last]
            .iter()
            .map(|l| {
                let raw = self.source.line(l.number());
                raw.get(l.virgin(0).min(raw.len())..).unwrap_or("")
            })
            .collect::<Vec<_>>()
            .join("\n");
        out.push(Token::Html {
            span: self.block_span(&lines[i], 0, &lines[last]),
            html,
        });
        count
    }

    fn definition(
        &mut self,
        lines: &[WorkLine<'_>],
        i: usize,
        depth: usize,
        out: &mut Vec<Token>,
    ) -> ParseResult<Option<usize>> {
        let line = lines[i];
        if let Some(def) = LinkRef::definition(line.text()) {
            let key = LinkRef::normalize_label(&def.label);
            trace!("link reference [{key}] -> {}", def.url);
            let span = self.block_span(&line, 0, &line);
            self.references.entry(key).or_insert(LinkReference {
                url: def.url,
                title: def.title,
                span,
            });
            return Ok(Some(1));
        }
        let Some(note) = LinkRef::footnote(line.text()) else {
            return Ok(None);
        };
        let mut body = vec![line.advance(note.content_start)];
        let mut last = i;
        let mut j = i + 1;
        while let Some(l) = lines.get(j) {
            if l.is_blank() {
                body.push(*l);
            } else if l.indent() >= IndentedCode::INDENT {
                body.push(l.dedent(IndentedCode::INDENT));
                last = j;
            } else if !lines[j - 1].is_blank()
                && !interrupts_paragraph(l.text())
                && LinkRef::footnote(l.text()).is_none()
            {
                body.push(*l);
                last = j;
            } else {
                break;
            }
            j += 1;
        }
        body.truncate(last - i + 1);
        let children = self.segment(&body, depth + 1)?;
        out.push(Token::Footnote {
            span: self.block_span(&line, 0, &lines[last]),
            id: note.id,
            children,
        });
        Ok(Some(last + 1 - i))
    }

    fn paragraph(&self, lines: &[WorkLine<'_>], i: usize, out: &mut Vec<Token>) -> Option<usize> {
        let mut j = i + 1;
        let mut underline = None;
        while let Some(l) = lines.get(j) {
            if l.is_blank() {
                break;
            }
            if let Some(level) = SetextUnderline::level(l.text()) {
                underline = Some((level, j));
                break;
            }
            if interrupts_paragraph(l.text())
                || (Table::is_row(l.text())
                    && lines.get(j + 1).is_some_and(|n| Table::separator(n.text()).is_some()))
            {
                break;
            }
            j += 1;
        }
        let content = InlineSource::new(lines[i..j].iter().map(|l| self.visible(l, 0)).collect());
        let span = content.span()?;
        match underline {
            Some((level, u)) => {
                let ul = self.visible(&lines[u], 0);
                let delim = Span::on_line(ul.line, ul.column, ul.last_column());
                out.push(Token::Heading {
                    span: Span::new(span.start_line, span.start_column, delim.end_line, delim.end_column),
                    level,
                    delim: Some(delim),
                    content,
                    label: None,
                });
                Some(u + 1 - i)
            }
            None => {
                out.push(Token::Paragraph { span, content });
                Some(j - i)
            }
        }
    }
}

/// Whether a line starts a block that ends a running paragraph.
fn interrupts_paragraph(text: &str) -> bool {
    if CodeFence::open(text).is_some()
        || Heading::open(text).is_some()
        || ThematicBreak::matches(text)
        || BlockQuote::strip_one(text).is_some()
        || HtmlBlock::opens(text)
    {
        return true;
    }
    List::marker(text).is_some_and(|m| !m.empty && (!m.ordered || m.number == Some(1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::blocks::normalize::Normalizer;
    use pretty_assertions::assert_eq;

    fn segment(md: &str) -> Vec<Token> {
        let src = SourceText::new(md);
        let lines = Normalizer::source(&src);
        Segmenter::new(&src).segment_document(&lines).unwrap()
    }

    fn kinds(tokens: &[Token]) -> Vec<&'static str> {
        tokens.iter().map(Token::kind_name).collect()
    }

    #[test]
    fn paragraphs_split_on_blank_lines() {
        let t = segment("one\ntwo\n\nthree");
        assert_eq!(kinds(&t), vec!["paragraph", "paragraph"]);
        assert_eq!(t[0].span(), Span::new(0, 0, 1, 2));
        assert_eq!(t[1].span(), Span::on_line(3, 0, 4));
    }

    #[test]
    fn heading_and_rule() {
        let t = segment("# Title\n\n---\ntext");
        assert_eq!(kinds(&t), vec!["heading", "rule", "paragraph"]);
        let Token::Heading { level, delim, content, .. } = &t[0] else {
            panic!("expected heading");
        };
        assert_eq!(*level, 1);
        assert_eq!(*delim, Some(Span::on_line(0, 0, 0)));
        assert_eq!(content.lines[0].column, 2);
        assert_eq!(content.lines[0].text, "Title");
    }

    #[test]
    fn setext_heading_takes_underline() {
        let t = segment("Title\n---");
        assert_eq!(kinds(&t), vec!["heading"]);
        let Token::Heading { level, delim, .. } = &t[0] else {
            panic!("expected heading");
        };
        assert_eq!(*level, 2);
        assert_eq!(*delim, Some(Span::on_line(1, 0, 2)));
    }

    #[test]
    fn fenced_code_records_delims() {
        let t = segment("```rust\nlet x = 1;\n```");
        let Token::Code { fenced, info, text, start_delim, end_delim, span } = &t[0] else {
            panic!("expected code");
        };
        assert!(*fenced);
        assert_eq!(info, "rust");
        assert_eq!(text, "let x = 1;");
        assert_eq!(*start_delim, Some(Span::on_line(0, 0, 2)));
        assert_eq!(*end_delim, Some(Span::on_line(2, 0, 2)));
        assert_eq!(*span, Span::new(0, 0, 2, 2));
    }

    #[test]
    fn unterminated_fence_runs_to_end() {
        let t = segment("~~~\ncode");
        let Token::Code { text, end_delim, .. } = &t[0] else {
            panic!("expected code");
        };
        assert_eq!(text, "code");
        assert_eq!(*end_delim, None);
    }

    #[test]
    fn tab_indented_code_keeps_virgin_columns() {
        let t = segment("\tcode");
        let Token::Code { fenced, text, span, .. } = &t[0] else {
            panic!("expected code");
        };
        assert!(!*fenced);
        assert_eq!(text, "code");
        assert_eq!(*span, Span::on_line(0, 1, 4));
    }

    #[test]
    fn blockquote_recurses_with_delims() {
        let t = segment("> quoted\n> > nested");
        let Token::BlockQuote { delims, children, .. } = &t[0] else {
            panic!("expected blockquote");
        };
        assert_eq!(delims, &vec![Span::on_line(0, 0, 0), Span::on_line(1, 0, 0)]);
        assert_eq!(kinds(children), vec!["paragraph", "blockquote"]);
        let Token::Paragraph { content, .. } = &children[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(content.lines[0].column, 2);
    }

    #[test]
    fn lazy_quote_continuation() {
        let t = segment("> a\nb");
        assert_eq!(kinds(&t), vec!["blockquote"]);
    }

    #[test]
    fn list_items_and_tasks() {
        let t = segment("- [ ] todo\n- [x] done\n- plain");
        let Token::List { ordered, loose, items, .. } = &t[0] else {
            panic!("expected list");
        };
        assert!(!*ordered);
        assert!(!*loose);
        let tasks: Vec<_> = items.iter().map(|i| i.task).collect();
        assert_eq!(tasks, vec![Some(false), Some(true), None]);
        assert_eq!(items[0].delim, Span::on_line(0, 0, 0));
        let Token::Paragraph { content, .. } = &items[0].children[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(content.lines[0].column, 6);
    }

    #[test]
    fn nested_and_loose_lists() {
        let t = segment("1. one\n   - sub\n\n2. two");
        let Token::List { ordered, loose, items, start_number, .. } = &t[0] else {
            panic!("expected list");
        };
        assert!(*ordered);
        assert!(*loose);
        assert_eq!(*start_number, 1);
        assert_eq!(items.len(), 2);
        assert_eq!(kinds(&items[0].children), vec!["paragraph", "list"]);
        assert_eq!(items[1].number, Some(2));
    }

    #[test]
    fn different_bullet_starts_new_list() {
        let t = segment("- a\n+ b");
        assert_eq!(kinds(&t), vec!["list", "list"]);
    }

    #[test]
    fn table_with_alignments() {
        let t = segment("| a | b |\n|:--|--:|\n| 1 | 2 |");
        let Token::Table { alignments, header, rows, .. } = &t[0] else {
            panic!("expected table");
        };
        assert_eq!(alignments.len(), 2);
        assert_eq!(header[1].span, Span::on_line(0, 6, 6));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0].content.lines[0].text, "1");
    }

    #[test]
    fn definitions_are_collected_not_emitted() {
        let src = SourceText::new("[home]: https://x.org\n\ntext");
        let lines = Normalizer::source(&src);
        let mut seg = Segmenter::new(&src);
        let t = seg.segment_document(&lines).unwrap();
        assert_eq!(kinds(&t), vec!["paragraph"]);
        let refs = seg.into_references();
        assert_eq!(refs["home"].url, "https://x.org");
    }

    #[test]
    fn footnote_definition() {
        let t = segment("[^1]: the note\n    more");
        let Token::Footnote { id, children, .. } = &t[0] else {
            panic!("expected footnote");
        };
        assert_eq!(id, "1");
        assert_eq!(kinds(children), vec!["paragraph"]);
    }

    #[test]
    fn html_block_runs_to_blank_line() {
        let t = segment("<div>\nx\n</div>\n\ntext");
        assert_eq!(kinds(&t), vec!["html", "paragraph"]);
        let Token::Html { html, .. } = &t[0] else {
            panic!("expected html");
        };
        assert_eq!(html, "<div>\nx\n</div>");
    }

    #[test]
    fn deep_nesting_is_refused() {
        let md = ">".repeat(MAX_NESTING + 2) + " deep";
        let src = SourceText::new(&md);
        let lines = Normalizer::source(&src);
        let err = Segmenter::new(&src).segment_document(&lines).unwrap_err();
        assert!(matches!(err, ParseError::NestingTooDeep { line: 0, .. }));
    }
}
