#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceKind {
    Backticks,
    Tildes,
}

impl FenceKind {
    pub fn byte(self) -> u8 {
        match self {
            FenceKind::Backticks => b'`',
            FenceKind::Tildes => b'~',
        }
    }
}

/// An opening fence line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceOpen {
    pub kind: FenceKind,
    /// Spaces before the fence, stripped from content lines too.
    pub indent: usize,
    pub len: usize,
    pub info: String,
}

pub struct CodeFence;

impl CodeFence {
    pub const BACKTICKS: &'static str = "```";
    pub const TILDES: &'static str = "~~~";
    pub const MAX_INDENT: usize = 3;

    /// Recognises an opening fence.
    pub fn open(text: &str) -> Option<FenceOpen> {
        let indent = text.len() - text.trim_start_matches(' ').len();
        if indent > Self::MAX_INDENT {
            return None;
        }
        let rest = &text[indent..];
        let kind = if rest.starts_with(Self::BACKTICKS) {
            FenceKind::Backticks
        } else if rest.starts_with(Self::TILDES) {
            FenceKind::Tildes
        } else {
            return None;
        };
        let len = rest.bytes().take_while(|b| *b == kind.byte()).count();
        let info = rest[len..].trim();
        if kind == FenceKind::Backticks && info.contains('`') {
            return None;
        }
        Some(FenceOpen {
            kind,
            indent,
            len,
            info: info.to_string(),
        })
    }

    /// Offset and length of the closing run when `text` closes `open`.
    pub fn closes(open: &FenceOpen, text: &str) -> Option<(usize, usize)> {
        let indent = text.len() - text.trim_start_matches(' ').len();
        if indent > Self::MAX_INDENT {
            return None;
        }
        let rest = &text[indent..];
        let len = rest.bytes().take_while(|b| *b == open.kind.byte()).count();
        (len >= open.len && rest[len..].trim().is_empty()).then_some((indent, len))
    }
}
