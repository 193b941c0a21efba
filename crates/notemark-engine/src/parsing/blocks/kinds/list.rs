/// A list item marker at the start of a line, offsets local to the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMarker {
    pub indent: usize,
    pub marker_len: usize,
    pub ordered: bool,
    pub number: Option<u64>,
    /// Bullet character, or `.`/`)` after the number.
    pub delim: u8,
    /// Offset where item content starts; continuation lines indent to here.
    pub content_offset: usize,
    pub empty: bool,
}

impl ListMarker {
    /// Whether `other` continues the same list as `self`.
    pub fn same_list(&self, other: &ListMarker) -> bool {
        self.ordered == other.ordered && self.delim == other.delim
    }
}

pub struct List;

impl List {
    pub const BULLETS: [u8; 3] = [b'-', b'+', b'*'];
    pub const ORDERED_DELIMS: [u8; 2] = [b'.', b')'];
    pub const MAX_DIGITS: usize = 9;
    pub const MAX_INDENT: usize = 3;
    /// More spaces than this after the marker make the content indented code.
    pub const MAX_GAP: usize = 4;
    pub const TASK_OPEN: &'static str = "[ ]";
    pub const TASK_DONE: [&'static str; 2] = ["[x]", "[X]"];

    pub fn marker(text: &str) -> Option<ListMarker> {
        let indent = text.len() - text.trim_start_matches(' ').len();
        if indent > Self::MAX_INDENT {
            return None;
        }
        let rest = text[indent..].as_bytes();
        let (marker_len, ordered, number, delim) = match rest.first()? {
            b if Self::BULLETS.contains(b) => (1, false, None, *b),
            b if b.is_ascii_digit() => {
                let digits = rest.iter().take_while(|b| b.is_ascii_digit()).count();
                let delim = *rest.get(digits)?;
                if digits > Self::MAX_DIGITS || !Self::ORDERED_DELIMS.contains(&delim) {
                    return None;
                }
                let number = std::str::from_utf8(&rest[..digits]).ok()?.parse().ok()?;
                (digits + 1, true, Some(number), delim)
            }
            _ => return None,
        };
        let after = &text[indent + marker_len..];
        let gap = after.len() - after.trim_start_matches(' ').len();
        let empty = after.trim().is_empty();
        if gap == 0 && !empty {
            return None;
        }
        let content_offset = if empty || gap > Self::MAX_GAP {
            indent + marker_len + 1
        } else {
            indent + marker_len + gap
        };
        Some(ListMarker {
            indent,
            marker_len,
            ordered,
            number,
            delim,
            content_offset,
            empty,
        })
    }

    /// Task checkbox at the start of item content.
    ///
    /// # Returns
    /// `(checked, len)` where `len` covers the box and the space after it.
    pub fn task(content: &str) -> Option<(bool, usize)> {
        let checked = if content.starts_with(Self::TASK_OPEN) {
            false
        } else if Self::TASK_DONE.iter().any(|m| content.starts_with(m)) {
            true
        } else {
            return None;
        };
        let after = &content[Self::TASK_OPEN.len()..];
        if !after.is_empty() && !after.starts_with(' ') {
            return None;
        }
        Some((checked, Self::TASK_OPEN.len() + usize::from(!after.is_empty())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bullet_marker() {
        let m = List::marker("- item").unwrap();
        assert!(!m.ordered);
        assert_eq!(m.delim, b'-');
        assert_eq!(m.content_offset, 2);
    }

    #[test]
    fn ordered_marker() {
        let m = List::marker("  12) item").unwrap();
        assert!(m.ordered);
        assert_eq!(m.number, Some(12));
        assert_eq!(m.marker_len, 3);
        assert_eq!(m.content_offset, 6);
    }

    #[test]
    fn wide_gap_is_one_space() {
        let m = List::marker("-      code").unwrap();
        assert_eq!(m.content_offset, 2);
    }

    #[test]
    fn empty_item() {
        let m = List::marker("*").unwrap();
        assert!(m.empty);
    }

    #[test]
    fn not_markers() {
        assert_eq!(List::marker("-item"), None);
        assert_eq!(List::marker("1.5 apples"), None);
        assert_eq!(List::marker("1234567890. x"), None);
        assert_eq!(List::marker("text"), None);
    }

    #[test]
    fn task_boxes() {
        assert_eq!(List::task("[ ] todo"), Some((false, 4)));
        assert_eq!(List::task("[x] done"), Some((true, 4)));
        assert_eq!(List::task("[X]"), Some((true, 3)));
        assert_eq!(List::task("[link](x)"), None);
    }
}
