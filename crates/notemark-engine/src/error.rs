use thiserror::Error;

use crate::parsing::rope::Position;

/// Failures that abort a parse.
///
/// Malformed Markdown is never an error: it always degrades to plain text.
/// These variants describe bugs in the parser's own bookkeeping or a parse
/// that was stopped on purpose.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("internal parser error at {line}:{column}: {message}")]
    Internal {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("containers nested {depth} deep at line {line}")]
    NestingTooDeep { line: usize, depth: usize },

    #[error("parse cancelled")]
    Cancelled,
}

impl ParseError {
    pub fn internal(pos: Position, message: impl Into<String>) -> Self {
        Self::Internal {
            line: pos.line,
            column: pos.column,
            message: message.into(),
        }
    }

    /// Position the error refers to, when it has one.
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::Internal { line, column, .. } => Some(Position::new(*line, *column)),
            Self::NestingTooDeep { line, .. } => Some(Position::new(*line, 0)),
            Self::Cancelled => None,
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_error_message_carries_position() {
        let err = ParseError::internal(Position::new(3, 7), "ledger out of sync");
        assert_eq!(err.to_string(), "internal parser error at 3:7: ledger out of sync");
        assert_eq!(err.position(), Some(Position::new(3, 7)));
    }

    #[test]
    fn cancelled_has_no_position() {
        assert_eq!(ParseError::Cancelled.position(), None);
    }
}
