/// Underline that turns the preceding paragraph into a heading.
pub struct SetextUnderline;

impl SetextUnderline {
    /// Heading level for an underline line: `=` gives 1, `-` gives 2.
    pub fn level(text: &str) -> Option<u8> {
        let indent = text.len() - text.trim_start_matches(' ').len();
        if indent > 3 {
            return None;
        }
        let body = text.trim();
        let first = body.chars().next()?;
        let level = match first {
            '=' => 1,
            '-' => 2,
            _ => return None,
        };
        body.chars().all(|c| c == first).then_some(level)
    }
}
