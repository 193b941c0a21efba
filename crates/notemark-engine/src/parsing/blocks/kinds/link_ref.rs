use std::sync::OnceLock;

use regex::Regex;

/// A `[label]: url "title"` definition, offsets local to the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRefDef {
    pub label: String,
    pub url: String,
    pub title: Option<String>,
}

/// A `[^id]: text` footnote opener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FootnoteDef {
    pub id: String,
    /// Offset where the footnote text starts.
    pub content_start: usize,
}

fn definition_regex() -> &'static Regex {
    static DEFINITION: OnceLock<Regex> = OnceLock::new();
    DEFINITION.get_or_init(|| {
        Regex::new(
            r#"^ {0,3}\[([^\]\^][^\]]*)\]: *<?([^\s>]+)>?(?: +(?:"([^"]*)"|'([^']*)'|\(([^)]*)\)))? *$"#,
        )
        .expect("Invalid link definition regex")
    })
}

fn footnote_regex() -> &'static Regex {
    static FOOTNOTE: OnceLock<Regex> = OnceLock::new();
    FOOTNOTE.get_or_init(|| Regex::new(r"^ {0,3}\[\^([^\]\s]+)\]: ?").expect("Invalid footnote regex"))
}

pub struct LinkRef;

impl LinkRef {
    pub fn definition(text: &str) -> Option<LinkRefDef> {
        let cap = definition_regex().captures(text)?;
        let title = cap.get(3).or_else(|| cap.get(4)).or_else(|| cap.get(5));
        Some(LinkRefDef {
            label: cap[1].to_string(),
            url: cap[2].to_string(),
            title: title.map(|m| m.as_str().to_string()),
        })
    }

    pub fn footnote(text: &str) -> Option<FootnoteDef> {
        let cap = footnote_regex().captures(text)?;
        Some(FootnoteDef {
            id: cap[1].to_string(),
            content_start: cap.get(0).map_or(0, |m| m.end()),
        })
    }

    /// Case-folded, whitespace-collapsed label used as the reference key.
    pub fn normalize_label(label: &str) -> String {
        label.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
    }
}
