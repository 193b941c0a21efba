/// Code block made of lines indented by four or more spaces.
pub struct IndentedCode;

impl IndentedCode {
    pub const INDENT: usize = 4;

    pub fn starts(text: &str) -> bool {
        let indent = text.len() - text.trim_start_matches(' ').len();
        indent >= Self::INDENT && !text.trim().is_empty()
    }
}
