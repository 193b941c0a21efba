use crate::parsing::ast::Alignment;

/// Pipe tables with a header separator row.
pub struct Table;

impl Table {
    pub const PIPE: char = '|';

    /// Alignments declared by a separator row such as `|:--|--:|`.
    pub fn separator(text: &str) -> Option<Vec<Alignment>> {
        let body = text.trim();
        if !body.contains('-') || !body.contains(Self::PIPE) && !body.starts_with([':', '-']) {
            return None;
        }
        let mut out = Vec::new();
        for (start, end) in Self::cells(text) {
            let cell = text[start..end].trim();
            let dashes = cell.trim_start_matches(':').trim_end_matches(':');
            if dashes.is_empty() || !dashes.bytes().all(|b| b == b'-') {
                return None;
            }
            out.push(match (cell.starts_with(':'), cell.ends_with(':')) {
                (true, true) => Alignment::Center,
                (true, false) => Alignment::Left,
                (false, true) => Alignment::Right,
                (false, false) => Alignment::None,
            });
        }
        (!out.is_empty()).then_some(out)
    }

    /// Byte ranges of each cell's trimmed content.
    ///
    /// Leading and trailing pipes are optional; `\|` does not split.
    pub fn cells(text: &str) -> Vec<(usize, usize)> {
        let bytes = text.as_bytes();
        let mut bounds = Vec::new();
        let mut start = 0;
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => i += 1,
                b'|' => {
                    bounds.push((start, i));
                    start = i + 1;
                }
                _ => {}
            }
            i += 1;
        }
        bounds.push((start, text.len()));

        let blank = |&(s, e): &(usize, usize)| text[s..e].trim().is_empty();
        if bounds.first().is_some_and(blank) && text.trim_start().starts_with(Self::PIPE) {
            bounds.remove(0);
        }
        if bounds.last().is_some_and(blank) && text.trim_end().ends_with(Self::PIPE) {
            bounds.pop();
        }
        bounds
            .into_iter()
            .map(|(s, e)| {
                let cell = &text[s..e];
                let lead = cell.len() - cell.trim_start().len();
                let content = cell.trim();
                (s + lead, s + lead + content.len())
            })
            .collect()
    }

    pub fn is_row(text: &str) -> bool {
        !text.trim().is_empty() && text.contains(Self::PIPE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separator_alignments() {
        assert_eq!(
            Table::separator("|:--|:-:|--:|---|"),
            Some(vec![Alignment::Left, Alignment::Center, Alignment::Right, Alignment::None])
        );
        assert_eq!(Table::separator("--- | ---"), Some(vec![Alignment::None, Alignment::None]));
    }

    #[test]
    fn not_separators() {
        assert_eq!(Table::separator("| a | b |"), None);
        assert_eq!(Table::separator("text"), None);
    }

    #[test]
    fn cells_are_trimmed() {
        let row = "| a | bc |";
        let cells = Table::cells(row);
        assert_eq!(cells, vec![(2, 3), (6, 8)]);
        assert_eq!(&row[6..8], "bc");
    }

    #[test]
    fn escaped_pipe_does_not_split() {
        assert_eq!(Table::cells(r"a \| b | c").len(), 2);
    }
}
