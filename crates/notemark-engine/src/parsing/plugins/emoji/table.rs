use std::collections::HashMap;
use std::sync::OnceLock;

use log::debug;

/// One named emoji.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiEntry {
    /// CLDR short name, e.g. `woman: medium skin tone, red hair`.
    pub short_name: String,
    pub unicode: String,
}

impl EmojiEntry {
    fn new(emoji: &emojis::Emoji) -> Self {
        Self {
            short_name: emoji.name().to_string(),
            unicode: emoji.as_str().to_string(),
        }
    }
}

/// Emoji lookup table over the Unicode emoji set, skin tone variants
/// included.
///
/// Entries are ordered by short-name length and then by name so that every
/// search has one deterministic answer.
#[derive(Debug)]
pub struct EmojiTable {
    entries: Vec<EmojiEntry>,
    by_name: HashMap<String, usize>,
}

impl EmojiTable {
    pub fn global() -> &'static EmojiTable {
        static TABLE: OnceLock<EmojiTable> = OnceLock::new();
        TABLE.get_or_init(|| EmojiTable::from_entries(unicode_entries()))
    }

    fn from_entries(mut entries: Vec<EmojiEntry>) -> Self {
        entries.sort_by(|a, b| {
            a.short_name
                .len()
                .cmp(&b.short_name.len())
                .then_with(|| a.short_name.cmp(&b.short_name))
        });
        entries.dedup_by(|a, b| a.short_name == b.short_name);
        let by_name = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.short_name.clone(), i))
            .collect();
        Self { entries, by_name }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry whose short name is exactly `short_name`.
    pub fn exact(&self, short_name: &str) -> Option<&EmojiEntry> {
        self.by_name.get(short_name).map(|&i| &self.entries[i])
    }

    /// Skin-toned entries derived from `name`, in table order.
    pub fn tones<'a>(&'a self, name: &str) -> Vec<&'a EmojiEntry> {
        self.entries
            .iter()
            .filter(|e| {
                e.short_name
                    .strip_prefix(name)
                    .and_then(|rest| rest.strip_prefix(": "))
                    .is_some_and(|rest| rest.contains("skin tone"))
            })
            .collect()
    }
}

fn unicode_entries() -> Vec<EmojiEntry> {
    let mut entries = Vec::new();
    for emoji in emojis::iter() {
        entries.push(EmojiEntry::new(emoji));
        if let Some(toned) = emoji.skin_tones() {
            entries.extend(toned.map(EmojiEntry::new));
        }
    }
    debug!("emoji table built from {} entries", entries.len());
    entries
}
