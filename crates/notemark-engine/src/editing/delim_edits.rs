use thiserror::Error;
use xi_rope::Rope;
use xi_rope::delta::Builder;

use crate::config::ExtendedSyntax;
use crate::parsing::ast::TextOpts;
use crate::parsing::poscache::{BlockDelimType, DelimType, DelimsInfo};
use crate::parsing::rope::{Position, SourceText, Span};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("edit position {line}:{column} is outside the text")]
    OutOfRange { line: usize, column: usize },

    #[error("edits overlap at {line}:{column}")]
    Overlapping { line: usize, column: usize },
}

/// Replaces the text between `start` and `end` (exclusive) with `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub start: Position,
    pub end: Position,
    pub text: String,
}

impl TextEdit {
    /// Removes the characters of an inclusive span.
    pub fn delete(span: Span) -> Self {
        Self {
            start: span.start(),
            end: Position::new(span.end_line, span.end_column + 1),
            text: String::new(),
        }
    }

    pub fn insert(at: Position, text: impl Into<String>) -> Self {
        Self {
            start: at,
            end: at,
            text: text.into(),
        }
    }
}

/// Edits deleting every marker of kind `kind` among `delims`, last marker
/// first.
pub fn removal_edits(delims: &[DelimsInfo], kind: DelimType) -> Vec<TextEdit> {
    let mut spans: Vec<Span> = delims
        .iter()
        .filter(|d| d.delim_type == kind)
        .flat_map(DelimsInfo::spans)
        .collect();
    spans.sort_unstable_by(|a, b| b.cmp(a));
    spans.dedup();
    spans.into_iter().map(TextEdit::delete).collect()
}

/// Literal text a toolbar inserts for `kind`.
///
/// `number` is used by ordered lists only. Extended styles are looked up in
/// `syntaxes` by their opts bit.
pub fn insertion_text(kind: DelimType, number: u64, syntaxes: &[ExtendedSyntax]) -> Option<String> {
    let text = match kind {
        DelimType::Block(BlockDelimType::CodeBlock) => "\n```\n".to_string(),
        DelimType::Block(BlockDelimType::BlockQuote) => "> ".to_string(),
        DelimType::Block(BlockDelimType::OrderedList) => format!("{number}. "),
        DelimType::Block(BlockDelimType::UnorderedList) => "- ".to_string(),
        DelimType::Block(heading) => {
            let level = heading.heading_level().unwrap_or(1);
            format!("{} ", "#".repeat(usize::from(level)))
        }
        DelimType::Style(TextOpts::BOLD) => "**".to_string(),
        DelimType::Style(TextOpts::ITALIC) => "*".to_string(),
        DelimType::Style(TextOpts::STRIKETHROUGH) => "~~".to_string(),
        DelimType::Style(opts) => syntaxes.iter().find(|s| s.opts() == opts)?.delimiter.clone(),
        DelimType::Plain => return None,
    };
    Some(text)
}

/// One insertion of `kind` at each position; ordered list markers are
/// numbered from 1 in position order.
pub fn insertion_edits(kind: DelimType, positions: &[Position], syntaxes: &[ExtendedSyntax]) -> Vec<TextEdit> {
    let mut sorted = positions.to_vec();
    sorted.sort_unstable();
    sorted
        .into_iter()
        .zip(1..)
        .filter_map(|(at, n)| insertion_text(kind, n, syntaxes).map(|t| TextEdit::insert(at, t)))
        .collect()
}

/// Applies `edits` to `text`, all positions referring to the unedited text.
pub fn apply_edits(text: &str, edits: &[TextEdit]) -> Result<String, EditError> {
    let source = SourceText::new(text);
    let offset = |pos: Position| {
        source.offset_of(pos).ok_or(EditError::OutOfRange {
            line: pos.line,
            column: pos.column,
        })
    };

    let mut ranges = Vec::with_capacity(edits.len());
    for edit in edits {
        let (start, end) = (offset(edit.start)?, offset(edit.end)?);
        if end < start {
            return Err(EditError::OutOfRange {
                line: edit.end.line,
                column: edit.end.column,
            });
        }
        ranges.push((start, end, edit));
    }
    ranges.sort_by_key(|(start, end, _)| (*start, *end));

    let mut builder = Builder::new(source.rope().len());
    let mut last_end = 0;
    for (start, end, edit) in ranges {
        if start < last_end {
            return Err(EditError::Overlapping {
                line: edit.start.line,
                column: edit.start.column,
            });
        }
        builder.replace(start..end, Rope::from(edit.text.as_str()));
        last_end = end;
    }
    Ok(builder.build().apply(source.rope()).to_string())
}
