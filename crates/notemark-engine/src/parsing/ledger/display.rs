use std::borrow::Cow;

/// Turns a raw ledger fragment into the text shown for its item.
///
/// Entities are decoded and backslash escapes of ASCII punctuation are
/// removed. Whitespace is trimmed only at the edges of a source line, so
/// `"Simple "` keeps its trailing space when something follows on the same
/// line.
pub fn display_text(raw: &str, trim_start: bool, trim_end: bool) -> String {
    let mut s = raw;
    if trim_start {
        s = s.trim_start();
    }
    if trim_end {
        s = s.trim_end();
    }
    let unescaped = unescape(s);
    html_escape::decode_html_entities(unescaped.as_ref()).into_owned()
}

/// Removes the backslash in front of escaped ASCII punctuation.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('\\') {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\'
            && let Some(&next) = chars.peek()
            && next.is_ascii_punctuation()
        {
            out.push(next);
            chars.next();
            continue;
        }
        out.push(c);
    }
    Cow::Owned(out)
}
