//! End-to-end tests of the parsing pipeline.
//!
//! Every parsed document also goes through `invariants::check`.


use std::fmt::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::cancel::CancellationToken;
use crate::config::ParserConfig;
use crate::error::{ParseError, ParseResult};
use crate::parsing::ast::{Block, Document, InlineItem, ItemWithOpts, Paragraph, StyleDelim, TextOpts};
use crate::parsing::blocks::MAX_NESTING;
use crate::parsing::plugins::{InlinePlugin, PluginContext, PluginRegistry};
use crate::parsing::rope::Span;
use crate::parsing::Parser;

fn parse_with(parser: &Parser, md: &str) -> Document {
    let doc = parser.parse(md).unwrap();
    invariants::check(md, &doc);
    doc
}

fn parse(md: &str) -> Document {
    parse_with(&Parser::default(), md)
}

fn only_paragraph(doc: &Document) -> &Paragraph {
    match doc.blocks.as_slice() {
        [Block::Paragraph(p)] => p,
        other => panic!("expected one paragraph, got {other:?}"),
    }
}

fn outline(doc: &Document) -> String {
    let mut out = Vec::new();
    for block in &doc.blocks {
        let para = match block {
            Block::Heading(h) => {
                out.push(format!("heading {}", h.level));
                &h.text
            }
            Block::Paragraph(p) => {
                out.push("paragraph".to_string());
                p
            }
            _ => {
                out.push("other".to_string());
                continue;
            }
        };
        for item in &para.items {
            let sp = item.span();
            let mut line = format!("  {}", item.kind_name());
            if let InlineItem::Text(t) = item {
                let _ = write!(line, " {:?}", t.text);
            }
            let _ = write!(
                line,
                " {}:{}-{} opts={}",
                sp.start_line,
                sp.start_column,
                sp.end_column,
                item.opts().bits()
            );
            out.push(line);
        }
    }
    out.join("\n")
}

#[test]
fn emoji_in_the_middle() {
    let doc = parse("Simple :woman: emoji in the middle");
    let p = only_paragraph(&doc);
    assert_eq!(p.items.len(), 3);
    assert_eq!(p.items[0].span(), Span::on_line(0, 0, 6));
    let InlineItem::Emoji(e) = &p.items[1] else {
        panic!("expected emoji, got {:?}", p.items[1]);
    };
    assert_eq!(e.unicode, "\u{1F469}");
    assert_eq!(e.span, Span::on_line(0, 7, 13));
    assert_eq!(e.name_span, Span::on_line(0, 8, 12));
    assert_eq!(p.items[2].as_text().map(|t| t.text.as_str()), Some(" emoji in the middle"));
    assert_eq!(p.items[2].span(), Span::on_line(0, 14, 33));
}

#[test]
fn highlight_covers_the_line() {
    let doc = parse("==Simple highlight==");
    let p = only_paragraph(&doc);
    assert_eq!(p.items.len(), 1);
    assert_eq!(p.items[0].as_text().map(|t| t.text.as_str()), Some("Simple highlight"));
    assert_eq!(p.items[0].opts().bits(), 8);
    assert_eq!(p.items[0].open_styles(), &[StyleDelim::new(TextOpts::extended(0), Span::on_line(0, 0, 1))]);
    assert_eq!(p.items[0].close_styles(), &[StyleDelim::new(TextOpts::extended(0), Span::on_line(0, 18, 19))]);
}

#[test]
fn unknown_emoji_stays_text() {
    let doc = parse(":bad emoji:");
    let p = only_paragraph(&doc);
    assert_eq!(p.items.len(), 1);
    assert_eq!(p.items[0].as_text().map(|t| t.text.as_str()), Some(":bad emoji:"));
}

#[test]
fn note_link_without_title() {
    let parser = Parser::new(ParserConfig::default().with_note_path("/home/dummy/"));
    let doc = parse_with(&parser, "My [[/link]] with no specific text");
    let link = only_paragraph(&doc)
        .items
        .iter()
        .find_map(|i| match i {
            InlineItem::NoteLink(l) => Some(l),
            _ => None,
        })
        .expect("note link");
    assert_eq!(link.url, "/home/link@HEADER@");
    assert_eq!(link.text, "link");
}

#[test]
fn crossing_style_is_given_back_as_text() {
    let doc = parse("==*Cancelling previous style==*");
    let p = only_paragraph(&doc);
    let texts: Vec<_> = p
        .items
        .iter()
        .map(|i| (i.as_text().map(|t| t.text.clone()), i.opts().bits()))
        .collect();
    assert_eq!(
        texts,
        vec![
            (Some("*Cancelling previous style".to_string()), 8),
            (Some("*".to_string()), 0)
        ]
    );
    assert_eq!(p.items[0].open_styles()[0].span, Span::on_line(0, 0, 1));
    assert_eq!(p.items[0].close_styles()[0].span, Span::on_line(0, 28, 29));
    assert!(p.items[1].open_styles().is_empty());
    assert!(p.items[1].close_styles().is_empty());
}

#[test]
fn touching_delimiters_stay_text() {
    for md in ["-===-", "a ==== b"] {
        let doc = parse(md);
        let p = only_paragraph(&doc);
        assert_eq!(p.items.len(), 1, "{md}");
        assert_eq!(p.items[0].as_text().map(|t| t.text.as_str()), Some(md));
        assert_eq!(p.items[0].opts(), TextOpts::NONE);
    }
}

#[test]
fn malformed_syntax_falls_back_to_plain_text() {
    for md in ["see [[]] and :nope: and [link", "[[.hidden]] :a b: [x](", "  ::  [[ ]]"] {
        let doc = parse(md);
        let p = only_paragraph(&doc);
        assert!(p.items.iter().all(InlineItem::is_text), "{md}: {:?}", p.items);
        assert_eq!(p.plain_text(), md.trim(), "{md}");
    }
}

#[test]
fn empty_document() {
    let doc = parse("");
    assert!(doc.blocks.is_empty());
    assert!(parse("\n\n   \n").blocks.is_empty());
}

#[test]
fn outline_of_a_small_note() {
    let doc = parse("# Title\n\nSome **bold** :fire:\n");
    insta::assert_snapshot!(outline(&doc), @r#"
    heading 1
      text "Title" 0:2-6 opts=0
    paragraph
      text "Some " 2:0-4 opts=0
      text "bold" 2:7-10 opts=1
      emoji 2:14-19 opts=0
    "#);
}

#[test]
fn nested_containers_keep_invariants() {
    let md = "> - **one** :fire:\n>   - ==two== [[b]]\n>\n> 1. ~~three~~ `code`\n\n| a | *b* |\n|---|---|\n| :star: | c |\n";
    let doc = parse(md);
    assert!(matches!(doc.blocks.first(), Some(Block::BlockQuote(_))));
    assert!(doc.blocks.iter().any(|b| matches!(b, Block::Table(_))));
    let emoji = doc
        .paragraphs()
        .iter()
        .flat_map(|p| &p.items)
        .filter(|i| matches!(i, InlineItem::Emoji(_)))
        .count();
    assert_eq!(emoji, 2);
}

#[rstest]
#[case::crossing_styles("*a ==b* c==")]
#[case::bold_crossing_mark("**a ==b** c== d")]
#[case::multi_line_mark("==one\ntwo==")]
#[case::tabs("a\t**b**\tc ==d==\te")]
#[case::unicode("é **ü** ==ß== :fire: 日本語 ^x^")]
#[case::nested_containers("> - a **b**\n>   c ==d==\n> > *deep* :star:")]
#[case::nested_emphasis("***a** b* and **c *d* e**")]
#[case::code_and_links("`co==de` ==x== [l](http://a.b) <http://c.d>")]
#[case::line_breaks("line one  \nline two\\\nline three")]
#[case::escapes("\\*not\\* \\==x\\== &amp; ==y==")]
#[case::ordered_list("1. **one**\n2. ~~two~~ --three--")]
#[case::qualified_emoji(":woman:dark skin tone: :thumbs up: [[notes/a|A]]")]
fn tricky_inputs_keep_invariants(#[case] md: &str) {
    let doc = parse(md);
    assert!(!doc.paragraphs().is_empty(), "{md:?}");
}

const FRAGMENTS: &[&str] = &[
    "**bold**",
    "*it*",
    "==mark==",
    "--sub--",
    "^sup^",
    "~~gone~~",
    ":fire:",
    ":woman:light skin tone:",
    "`co*de`",
    "[[notes/a|A]]",
    "[l](http://x.y)",
    "é ü 日本",
    "a\tb",
    "*open",
];

#[test]
fn fragment_pairs_keep_invariants() {
    for a in FRAGMENTS {
        for b in FRAGMENTS {
            for sep in [" ", "\n", "", " ==", "** "] {
                parse(&format!("{a}{sep}{b}"));
                parse(&format!("> {a}{sep}{b}"));
            }
        }
    }
}

#[test]
fn long_lines_parse() {
    let emoji = ":fire: ".repeat(2000);
    let p = only_paragraph(&parse(&emoji)).clone();
    assert_eq!(p.items.iter().filter(|i| matches!(i, InlineItem::Emoji(_))).count(), 2000);

    let marks = "==a== ".repeat(2000);
    let p = only_paragraph(&parse(&marks)).clone();
    assert_eq!(p.items.len(), 2000);
    assert!(p.items.iter().all(|i| i.opts() == TextOpts::extended(0)));
}

#[test]
fn cancelled_parse_stops() {
    let token = CancellationToken::new();
    token.cancel();
    let err = Parser::default().parse_with_cancel("some text", &token).unwrap_err();
    assert_eq!(err, ParseError::Cancelled);
}

#[test]
fn deep_nesting_is_an_error() {
    let md = ">".repeat(MAX_NESTING + 2) + " deep";
    let err = Parser::default().parse(&md).unwrap_err();
    assert!(matches!(err, ParseError::NestingTooDeep { .. }), "{err:?}");
}

#[derive(Default)]
struct ReferenceCounter(AtomicUsize);

impl InlinePlugin for ReferenceCounter {
    fn name(&self) -> &'static str {
        "reference-counter"
    }

    fn priority(&self) -> i32 {
        0
    }

    fn reference_pass(&self) -> bool {
        true
    }

    fn run(&self, _para: &mut Paragraph, ctx: &PluginContext<'_>) -> ParseResult<()> {
        assert!(ctx.collecting_references);
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[test]
fn reference_pass_runs_before_rendering() {
    let config = ParserConfig::default();
    let counter = Arc::new(ReferenceCounter::default());
    let mut registry = PluginRegistry::from_config(&config);
    registry.register(counter.clone());
    let parser = Parser::with_registry(config, registry);

    let doc = parse_with(&parser, "one :fire:\n\ntwo\n");
    assert_eq!(counter.0.load(Ordering::SeqCst), 2);
    assert_eq!(doc.paragraphs().len(), 2);
    assert!(matches!(doc.paragraphs()[0].items[1], InlineItem::Emoji(_)));
}
