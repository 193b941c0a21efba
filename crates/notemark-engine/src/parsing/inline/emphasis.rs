use crate::parsing::ast::TextOpts;
use crate::parsing::rope::Span;

use super::{
    kinds::Emphasis,
    lexer::{DelimRun, Piece},
    text::ParaText,
};

/// A matched pair of emphasis delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmphasisMatch {
    pub style: TextOpts,
    /// Piece index of the opening run.
    pub opener: usize,
    /// Piece index of the closing run.
    pub closer: usize,
    pub open_span: Span,
    pub close_span: Span,
}

/// Pairs emphasis runs in place.
///
/// Closers are visited left to right and matched against the nearest
/// compatible opener below them. Matched characters are taken from the
/// inner edge of each run, so the left part of an opener and the right part
/// of a closer stay behind as text. Openers skipped over by a match can no
/// longer open anything.
pub fn match_emphasis(pieces: &mut [Piece], text: &ParaText) -> Vec<EmphasisMatch> {
    let mut openers: Vec<usize> = Vec::new();
    let mut matches = Vec::new();

    for c in 0..pieces.len() {
        let Piece::Delim(first) = pieces[c] else {
            continue;
        };
        if first.can_close {
            loop {
                let Piece::Delim(closer) = pieces[c] else {
                    break;
                };
                if closer.len == 0 {
                    break;
                }
                let found = openers.iter().rposition(|&o| match pieces[o] {
                    Piece::Delim(op) => {
                        op.ch == closer.ch
                            && op.len > 0
                            && !multiple_of_three(&op, &closer)
                            && has_content(pieces, o, c)
                    }
                    _ => false,
                });
                let Some(k) = found else {
                    break;
                };
                let o = openers[k];
                openers.truncate(k + 1);
                let Piece::Delim(mut op) = pieces[o] else {
                    break;
                };
                let mut cl = closer;
                let used = if op.ch == Emphasis::TILDE || (op.len >= 2 && cl.len >= 2) { 2 } else { 1 };
                let open_end = op.start + op.len;
                matches.push(EmphasisMatch {
                    style: Emphasis::style(op.ch, used),
                    opener: o,
                    closer: c,
                    open_span: text.span(open_end - used, open_end),
                    close_span: text.span(cl.start, cl.start + used),
                });
                op.len -= used;
                cl.start += used;
                cl.len -= used;
                pieces[o] = Piece::Delim(op);
                pieces[c] = Piece::Delim(cl);
                if op.len == 0 {
                    openers.pop();
                }
            }
        }
        if let Piece::Delim(d) = pieces[c]
            && d.len > 0
            && d.can_open
        {
            openers.push(c);
        }
    }
    matches
}

/// A run that can both open and close only pairs when the combined length
/// is not a multiple of three, unless both runs are.
fn multiple_of_three(op: &DelimRun, cl: &DelimRun) -> bool {
    if op.ch == Emphasis::TILDE || !(op.can_close || cl.can_open) {
        return false;
    }
    (op.orig_len + cl.orig_len) % 3 == 0 && !(op.orig_len % 3 == 0 && cl.orig_len % 3 == 0)
}

/// Whether real content sits between the two pieces.
fn has_content(pieces: &[Piece], open: usize, close: usize) -> bool {
    pieces[open + 1..close]
        .iter()
        .any(|p| matches!(p, Piece::Text { .. } | Piece::Item(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::blocks::{ContentLine, InlineSource};
    use crate::parsing::inline::lexer::lex;
    use std::collections::BTreeMap;

    fn matched(s: &str) -> Vec<(TextOpts, Span, Span)> {
        let t = ParaText::new(&InlineSource::new(vec![ContentLine {
            line: 0,
            column: 0,
            text: s.into(),
        }]));
        let mut pieces = lex(&t, &BTreeMap::new());
        match_emphasis(&mut pieces, &t)
            .into_iter()
            .map(|m| (m.style, m.open_span, m.close_span))
            .collect()
    }

    #[test]
    fn italic_and_bold() {
        assert_eq!(
            matched("*a* **b**"),
            vec![
                (TextOpts::ITALIC, Span::on_line(0, 0, 0), Span::on_line(0, 2, 2)),
                (TextOpts::BOLD, Span::on_line(0, 4, 5), Span::on_line(0, 7, 8)),
            ]
        );
    }

    #[test]
    fn triple_run_nests_bold_inside_italic() {
        assert_eq!(
            matched("***a***"),
            vec![
                (TextOpts::BOLD, Span::on_line(0, 1, 2), Span::on_line(0, 4, 5)),
                (TextOpts::ITALIC, Span::on_line(0, 0, 0), Span::on_line(0, 6, 6)),
            ]
        );
    }

    #[test]
    fn strikethrough_needs_double_tilde() {
        assert_eq!(
            matched("~~gone~~"),
            vec![(TextOpts::STRIKETHROUGH, Span::on_line(0, 0, 1), Span::on_line(0, 6, 7))]
        );
    }

    #[test]
    fn mismatched_runs_do_not_pair() {
        assert!(matched("*a_").is_empty());
        assert!(matched("**").is_empty());
    }

    #[test]
    fn leftover_opener_characters_stay() {
        assert_eq!(
            matched("**a*"),
            vec![(TextOpts::ITALIC, Span::on_line(0, 1, 1), Span::on_line(0, 3, 3))]
        );
    }
}
