//! Note-link and heading extraction for a note map.
//!
//! A note map needs to know which notes a note links to and which headings
//! it has. [`extract_mappings`] reads both from a finished document;
//! [`ChangeTracker`] keeps a mapper from being told the same thing after
//! every keystroke.

use serde::Serialize;

use crate::parsing::ast::{Block, Document, InlineItem};

/// A note reached through a `[[path:header|title]]` link.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LinkedNote {
    pub path: String,
    pub header: String,
    pub title: String,
}

/// Receives the links and headings of a parsed note.
pub trait NoteMapper {
    fn map(&mut self, links: Vec<LinkedNote>, headings: Vec<String>);
}

/// Note links and heading texts of `doc`, first occurrence first and
/// without repeats.
pub fn extract_mappings(doc: &Document) -> (Vec<LinkedNote>, Vec<String>) {
    let mut links: Vec<LinkedNote> = Vec::new();
    for para in doc.paragraphs() {
        for item in &para.items {
            let InlineItem::NoteLink(link) = item else {
                continue;
            };
            let (path, header) = link.target();
            let note = LinkedNote {
                path: path.to_string(),
                header: header.to_string(),
                title: link.text.clone(),
            };
            if !links.contains(&note) {
                links.push(note);
            }
        }
    }

    let mut headings = Vec::new();
    collect_headings(&doc.blocks.iter().collect::<Vec<_>>(), &mut headings);
    (links, headings)
}

fn collect_headings(blocks: &[&Block], out: &mut Vec<String>) {
    for block in blocks {
        if let Block::Heading(h) = block {
            let text = h.text.plain_text();
            if !text.is_empty() && !out.contains(&text) {
                out.push(text);
            }
        }
        collect_headings(&block.children(), out);
    }
}

/// Forwards to the wrapped mapper only when the links or headings differ
/// from the previous call.
#[derive(Debug, Default)]
pub struct ChangeTracker<M> {
    inner: M,
    previous: Option<(Vec<LinkedNote>, Vec<String>)>,
}

impl<M: NoteMapper> ChangeTracker<M> {
    pub fn new(inner: M) -> Self {
        Self { inner, previous: None }
    }

    /// Forgets the previous call, so the next one is always forwarded.
    ///
    /// Used when the tracked note changes.
    pub fn reset(&mut self) {
        self.previous = None;
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    pub fn into_inner(self) -> M {
        self.inner
    }
}

impl<M: NoteMapper> NoteMapper for ChangeTracker<M> {
    fn map(&mut self, links: Vec<LinkedNote>, headings: Vec<String>) {
        let current = (links, headings);
        if self.previous.as_ref() == Some(&current) {
            return;
        }
        self.inner.map(current.0.clone(), current.1.clone());
        self.previous = Some(current);
    }
}
