/// `***`, `---` or `___`, optionally spaced.
pub struct ThematicBreak;

impl ThematicBreak {
    pub const MARKERS: [char; 3] = ['-', '*', '_'];
    pub const MIN_COUNT: usize = 3;

    pub fn matches(text: &str) -> bool {
        let indent = text.len() - text.trim_start_matches(' ').len();
        if indent > 3 {
            return false;
        }
        let body = text.trim();
        let Some(marker) = body.chars().next().filter(|c| Self::MARKERS.contains(c)) else {
            return false;
        };
        body.chars().all(|c| c == marker || c == ' ')
            && body.chars().filter(|c| *c == marker).count() >= Self::MIN_COUNT
    }
}
