/// An ATX heading line, offsets local to the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtxOpen {
    pub level: u8,
    /// Offset of the first `#`.
    pub delim_start: usize,
    pub content_start: usize,
    /// Offset one past the content, before any closing `#` run or label.
    pub content_end: usize,
    /// `{#label}` suffix: offsets of `{` and `}` plus the label itself.
    pub label: Option<(usize, usize, String)>,
}

pub struct Heading;

impl Heading {
    pub const MARKER: u8 = b'#';
    pub const MAX_LEVEL: usize = 6;
    pub const MAX_INDENT: usize = 3;

    pub fn open(text: &str) -> Option<AtxOpen> {
        let indent = text.len() - text.trim_start_matches(' ').len();
        if indent > Self::MAX_INDENT {
            return None;
        }
        let rest = &text[indent..];
        let level = rest.bytes().take_while(|b| *b == Self::MARKER).count();
        if level == 0 || level > Self::MAX_LEVEL {
            return None;
        }
        let after = &rest[level..];
        if !after.is_empty() && !after.starts_with(' ') {
            return None;
        }
        let content_start = indent + level + (after.len() - after.trim_start().len());
        let mut body = text[content_start..].trim_end();

        let mut label = None;
        if body.ends_with('}')
            && let Some(open) = body.rfind("{#")
        {
            let name = &body[open + 2..body.len() - 1];
            if !name.is_empty() && !name.contains(char::is_whitespace) {
                let close = content_start + body.len() - 1;
                label = Some((content_start + open, close, name.to_string()));
                body = body[..open].trim_end();
            }
        }

        // Optional closing sequence: spaces then `#`s.
        let without_hashes = body.trim_end_matches(Self::MARKER as char);
        if without_hashes.is_empty() {
            body = "";
        } else if without_hashes.len() < body.len() && without_hashes.ends_with(' ') {
            body = without_hashes.trim_end();
        }

        Some(AtxOpen {
            level: level as u8,
            delim_start: indent,
            content_start,
            content_end: content_start + body.len(),
            label,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_heading() {
        let h = Heading::open("## Title").unwrap();
        assert_eq!(h.level, 2);
        assert_eq!(h.delim_start, 0);
        assert_eq!((h.content_start, h.content_end), (3, 8));
    }

    #[test]
    fn closing_hashes_are_dropped() {
        let h = Heading::open("# Title ##").unwrap();
        assert_eq!((h.content_start, h.content_end), (2, 7));
        let h = Heading::open("# C#").unwrap();
        assert_eq!(h.content_end, 4);
    }

    #[test]
    fn empty_heading() {
        let h = Heading::open("###").unwrap();
        assert_eq!(h.level, 3);
        assert_eq!(h.content_start, h.content_end);
    }

    #[test]
    fn label_suffix() {
        let h = Heading::open("# Title {#intro}").unwrap();
        assert_eq!(h.content_end, 7);
        assert_eq!(h.label, Some((8, 15, "intro".to_string())));
    }

    #[test]
    fn not_headings() {
        assert_eq!(Heading::open("#hashtag"), None);
        assert_eq!(Heading::open("####### seven"), None);
        assert_eq!(Heading::open("    # code"), None);
    }
}
