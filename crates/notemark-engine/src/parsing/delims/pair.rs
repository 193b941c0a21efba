use super::scan::{DelimKind, DelimOccurrence, StylePair};

/// Result of pairing the occurrences of one delimiter.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Pairing {
    /// Accepted `(opening, closing)` pairs in the order they were made.
    pub pairs: Vec<(DelimOccurrence, DelimOccurrence)>,
    /// Existing styles that the new pairs cut through.
    pub bad: Vec<StylePair>,
}

/// Pairs delimiter occurrences, checking each candidate against `styles`.
///
/// Openers wait on a stack. A closer pops candidates from the top until one
/// is accepted, discarding the rejected ones. An occurrence usable both ways
/// first tries the waiting openers without discarding any, and waits itself
/// when none fits. Two occurrences that touch never pair. Styles crossed by
/// an accepted pair are moved from `styles` into [`Pairing::bad`].
pub fn pair_delims(styles: &mut Vec<StylePair>, occurrences: &[DelimOccurrence]) -> Pairing {
    let mut out = Pairing::default();
    let mut waiting: Vec<DelimOccurrence> = Vec::new();

    for &occ in occurrences {
        match occ.kind {
            DelimKind::Opening => waiting.push(occ),
            DelimKind::Closing => {
                while let Some(open) = waiting.pop() {
                    if accept(styles, &mut out, open, occ) {
                        break;
                    }
                }
            }
            DelimKind::Both => {
                let found = (0..waiting.len())
                    .rev()
                    .find(|&i| accept(styles, &mut out, waiting[i], occ));
                match found {
                    Some(i) => {
                        waiting.remove(i);
                    }
                    None => waiting.push(occ),
                }
            }
        }
    }
    out
}

fn accept(styles: &mut Vec<StylePair>, out: &mut Pairing, open: DelimOccurrence, close: DelimOccurrence) -> bool {
    if open.touches(&close) || !fits_styles(styles, &mut out.bad, &open, &close) {
        return false;
    }
    out.pairs.push((open.with_kind(DelimKind::Opening), close.with_kind(DelimKind::Closing)));
    true
}

/// Checks a candidate pair against the existing styles.
///
/// A pair whose opener sits inside a style and whose closer sits outside is
/// refused. The reverse case is allowed and the style is marked bad: the new
/// pair wins and the style will be undone.
fn fits_styles(
    styles: &mut Vec<StylePair>,
    bad: &mut Vec<StylePair>,
    open: &DelimOccurrence,
    close: &DelimOccurrence,
) -> bool {
    let mut i = 0;
    while i < styles.len() {
        let s = styles[i];
        let open_inside = open.span.is_between(s.open.span, s.close.span, false);
        let close_inside = close.span.is_between(s.open.span, s.close.span, false);
        match (open_inside, close_inside) {
            (true, false) => return false,
            (false, true) => bad.push(styles.remove(i)),
            _ => i += 1,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::ast::{StyleDelim, TextOpts};
    use crate::parsing::rope::Span;

    fn occ(col: usize, kind: DelimKind) -> DelimOccurrence {
        DelimOccurrence {
            span: Span::on_line(0, col, col + 1),
            kind,
        }
    }

    fn italic(open: usize, close: usize) -> StylePair {
        StylePair {
            open: StyleDelim::new(TextOpts::ITALIC, Span::on_line(0, open, open)),
            close: StyleDelim::new(TextOpts::ITALIC, Span::on_line(0, close, close)),
            open_item: 0,
            close_item: 0,
        }
    }

    #[test]
    fn opening_and_closing_pair() {
        let p = pair_delims(&mut vec![], &[occ(0, DelimKind::Opening), occ(5, DelimKind::Closing)]);
        assert_eq!(p.pairs.len(), 1);
        assert_eq!(p.pairs[0].0.span.start_column, 0);
        assert_eq!(p.pairs[0].1.span.start_column, 5);
    }

    #[test]
    fn touching_occurrences_never_pair() {
        let p = pair_delims(&mut vec![], &[occ(2, DelimKind::Opening), occ(4, DelimKind::Both)]);
        assert!(p.pairs.is_empty());
    }

    #[test]
    fn both_kinds_become_opening_then_closing() {
        let p = pair_delims(&mut vec![], &[occ(1, DelimKind::Both), occ(6, DelimKind::Both)]);
        assert_eq!(p.pairs.len(), 1);
        assert_eq!(p.pairs[0].0.kind, DelimKind::Opening);
        assert_eq!(p.pairs[0].1.kind, DelimKind::Closing);
    }

    #[test]
    fn closer_discards_rejected_openers() {
        // The inner opener sits inside the italic run, the closer outside.
        let mut styles = vec![italic(3, 8)];
        let p = pair_delims(
            &mut styles,
            &[occ(0, DelimKind::Opening), occ(4, DelimKind::Opening), occ(10, DelimKind::Closing)],
        );
        assert_eq!(p.pairs.len(), 1);
        assert_eq!(p.pairs[0].0.span.start_column, 0);
        assert!(p.bad.is_empty());
        assert_eq!(styles.len(), 1);
    }

    #[test]
    fn crossed_style_becomes_bad() {
        let mut styles = vec![italic(2, 30)];
        let p = pair_delims(&mut styles, &[occ(0, DelimKind::Opening), occ(28, DelimKind::Both)]);
        assert_eq!(p.pairs.len(), 1);
        assert_eq!(p.bad, vec![italic(2, 30)]);
        assert!(styles.is_empty());
    }
}
