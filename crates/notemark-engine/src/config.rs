//! Parser configuration.
//!
//! A [`ParserConfig`] is an owned value handed to the parser when it is
//! built. Nothing is read from global state during a parse, so changing a
//! configuration never affects a parse already running.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::parsing::ast::TextOpts;

/// Skin tone applied to emoji shortcodes that support one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum EmojiTone {
    #[default]
    Default,
    Light,
    MediumLight,
    Medium,
    MediumDark,
    Dark,
}

impl EmojiTone {
    pub const ALL: [EmojiTone; 6] = [
        EmojiTone::Default,
        EmojiTone::Light,
        EmojiTone::MediumLight,
        EmojiTone::Medium,
        EmojiTone::MediumDark,
        EmojiTone::Dark,
    ];

    /// Qualifier as it appears in emoji short names.
    pub fn label(self) -> &'static str {
        match self {
            EmojiTone::Default => "default skin tone",
            EmojiTone::Light => "light skin tone",
            EmojiTone::MediumLight => "medium-light skin tone",
            EmojiTone::Medium => "medium skin tone",
            EmojiTone::MediumDark => "medium-dark skin tone",
            EmojiTone::Dark => "dark skin tone",
        }
    }

    /// Parses a full label (`"medium skin tone"`), case-insensitively.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_lowercase();
        Self::ALL.into_iter().find(|t| t.label() == label)
    }
}

impl fmt::Display for EmojiTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EmojiTone {
    type Err = String;

    /// Accepts a full label, the label without `skin tone`, or `None` for
    /// the default tone.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("none") {
            return Ok(EmojiTone::Default);
        }
        Self::from_label(s)
            .or_else(|| Self::from_label(&format!("{s} skin tone")))
            .ok_or_else(|| format!("unknown emoji tone: {s}"))
    }
}

/// Vertical placement of text carrying an extended style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    #[default]
    Baseline,
    Sub,
    Super,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnderlineStyle {
    #[default]
    Solid,
    Double,
    Dotted,
    Dashed,
    Wavy,
}

impl UnderlineStyle {
    fn css(self) -> &'static str {
        match self {
            UnderlineStyle::Solid => "solid",
            UnderlineStyle::Double => "double",
            UnderlineStyle::Dotted => "dotted",
            UnderlineStyle::Dashed => "dashed",
            UnderlineStyle::Wavy => "wavy",
        }
    }
}

/// A user-defined symmetric delimiter bound to one opts bit, plus how
/// renderers should show the text it wraps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtendedSyntax {
    pub delimiter: String,
    pub open_tag: String,
    pub close_tag: String,
    /// Index into the extended opts bits; see [`TextOpts::extended`].
    pub opts_index: u32,
    /// Font size in percent of the surrounding text.
    pub size_scale: u16,
    pub foreground: Option<String>,
    pub background: Option<String>,
    pub vertical_align: VerticalAlign,
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub underline_style: UnderlineStyle,
}

impl ExtendedSyntax {
    pub fn new(delimiter: impl Into<String>, tag: impl Into<String>, opts_index: u32) -> Self {
        let tag = tag.into();
        Self {
            delimiter: delimiter.into(),
            open_tag: tag.clone(),
            close_tag: tag,
            opts_index,
            size_scale: 100,
            foreground: None,
            background: None,
            vertical_align: VerticalAlign::Baseline,
            bold: false,
            italic: false,
            strikethrough: false,
            underline: false,
            underline_style: UnderlineStyle::Solid,
        }
    }

    /// `==` highlight, `--` subscript and `^` superscript.
    pub fn defaults() -> Vec<Self> {
        let sub = Self {
            size_scale: 75,
            vertical_align: VerticalAlign::Sub,
            ..Self::new("--", "sub", 1)
        };
        let sup = Self {
            size_scale: 75,
            vertical_align: VerticalAlign::Super,
            ..Self::new("^", "sup", 2)
        };
        vec![Self::new("==", "mark", 0), sub, sup]
    }

    pub fn opts(&self) -> TextOpts {
        TextOpts::extended(self.opts_index)
    }

    /// Why this syntax cannot be used, if it cannot.
    pub fn problem(&self) -> Option<&'static str> {
        if self.delimiter.is_empty() {
            Some("delimiter is empty")
        } else if self.delimiter.chars().any(char::is_whitespace) {
            Some("delimiter contains whitespace")
        } else if self.delimiter.contains('\\') {
            Some("delimiter contains a backslash")
        } else if self.opts_index > TextOpts::MAX_EXTENDED_INDEX {
            Some("opts bit index out of range")
        } else if self.open_tag.is_empty() || self.close_tag.is_empty() {
            Some("html tag is empty")
        } else {
            None
        }
    }

    /// Opening HTML tag, with a `style` attribute when the appearance
    /// differs from plain text.
    pub fn html_open(&self) -> String {
        let style = self.css();
        if style.is_empty() {
            format!("<{}>", self.open_tag)
        } else {
            format!("<{} style=\"{}\">", self.open_tag, style)
        }
    }

    pub fn html_close(&self) -> String {
        format!("</{}>", self.close_tag)
    }

    fn css(&self) -> String {
        let mut rules = Vec::new();
        if self.size_scale != 100 {
            rules.push(format!("font-size: {}%;", self.size_scale));
        }
        if let Some(fg) = &self.foreground {
            rules.push(format!("color: {fg};"));
        }
        if let Some(bg) = &self.background {
            rules.push(format!("background-color: {bg};"));
        }
        match self.vertical_align {
            VerticalAlign::Baseline => {}
            VerticalAlign::Sub => rules.push("vertical-align: sub;".into()),
            VerticalAlign::Super => rules.push("vertical-align: super;".into()),
        }
        if self.bold {
            rules.push("font-weight: bold;".into());
        }
        if self.italic {
            rules.push("font-style: italic;".into());
        }
        let mut decorations = Vec::new();
        if self.underline {
            decorations.push("underline");
        }
        if self.strikethrough {
            decorations.push("line-through");
        }
        if !decorations.is_empty() {
            let style = if self.underline { format!(" {}", self.underline_style.css()) } else { String::new() };
            rules.push(format!("text-decoration: {}{style};", decorations.join(" ")));
        }
        rules.join(" ")
    }
}

/// Which built-in content plugins run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PluginSet {
    pub emoji: bool,
    pub note_linking: bool,
    pub header_linking: bool,
}

impl Default for PluginSet {
    fn default() -> Self {
        Self {
            emoji: true,
            note_linking: true,
            header_linking: true,
        }
    }
}

/// Everything a parse depends on besides the text itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParserConfig {
    pub plugins: PluginSet,
    pub emoji_tone: EmojiTone,
    /// Applied in order; later syntaxes see the styles of earlier ones.
    pub extended_syntaxes: Vec<ExtendedSyntax>,
    /// Storage-relative folder of the note being parsed, such as
    /// `/Category/Group/Note/`. Note links resolve against it.
    pub note_path: String,
    /// File the note is saved to inside its folder. A note link naming this
    /// file, or the note's own folder, points back at the note itself.
    pub note_file_name: String,
    /// Display name of the category stored in the hidden base folder.
    pub default_category: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            plugins: PluginSet::default(),
            emoji_tone: EmojiTone::Default,
            extended_syntaxes: ExtendedSyntax::defaults(),
            note_path: "/".into(),
            note_file_name: "note.md".into(),
            default_category: "Notes".into(),
        }
    }
}

impl ParserConfig {
    #[must_use]
    pub fn with_note_path(mut self, note_path: impl Into<String>) -> Self {
        self.note_path = note_path.into();
        self
    }

    #[must_use]
    pub fn with_note_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.note_file_name = file_name.into();
        self
    }
}
