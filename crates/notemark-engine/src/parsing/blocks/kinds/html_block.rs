/// A block that starts with an HTML tag or comment and runs to a blank line.
pub struct HtmlBlock;

impl HtmlBlock {
    pub const COMMENT_OPEN: &'static str = "<!--";

    pub fn opens(text: &str) -> bool {
        let indent = text.len() - text.trim_start_matches(' ').len();
        if indent > 3 {
            return false;
        }
        let rest = &text[indent..];
        if rest.starts_with(Self::COMMENT_OPEN) {
            return true;
        }
        let Some(tag) = rest.strip_prefix('<') else {
            return false;
        };
        let tag = tag.strip_prefix('/').unwrap_or(tag);
        let name_len = tag.bytes().take_while(|b| b.is_ascii_alphanumeric() || *b == b'-').count();
        if name_len == 0 || !tag.as_bytes()[0].is_ascii_alphabetic() {
            return tag.starts_with('!') || tag.starts_with('?');
        }
        matches!(tag.as_bytes().get(name_len), None | Some(b' ' | b'>' | b'/'))
    }
}
